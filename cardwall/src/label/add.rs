//! AddLabel command

use super::parse_color;
use crate::action_log::{payload, ActionLog};
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::logged;
use crate::security::{authorize, Permission};
use crate::types::{BoardId, Label, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Add a label to a board
#[operation(verb = "add", noun = "label", description = "Add a label to a board")]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddLabel {
    /// The acting user (must be a board member)
    pub actor: UserId,
    /// The board
    pub board: BoardId,
    /// Label title
    pub title: String,
    /// Color as 6 hex digits; derived from the title when absent
    pub color: Option<String>,
}

impl AddLabel {
    pub fn new(
        actor: impl Into<UserId>,
        board: impl Into<BoardId>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            actor: actor.into(),
            board: board.into(),
            title: title.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(CardwallError::invalid_value("title", "label title cannot be empty"));
        }
        let mut board = authorize(ctx, &self.board, &self.actor, Permission::Edit).await?;
        if board.labels.iter().any(|l| l.title == title) {
            return Err(CardwallError::duplicate_id("label", title));
        }

        let mut label = Label::new(title);
        if let Some(color) = &self.color {
            label = label.with_color(parse_color(color)?);
        }
        board.labels.push(label.clone());
        ctx.write_board(&board).await?;

        ActionLog::for_board(board.id.clone())
            .add_history(
                ctx,
                &self.actor,
                "board_add_label",
                payload(json!({ "label": label.title })),
            )
            .await?;
        Ok(serde_json::to_value(&label)?)
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for AddLabel {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();
        let result = self.run(ctx).await;
        logged(self, &self.actor, start, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auto_color::auto_color;
    use crate::board::CreateBoard;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_add_label() {
        let temp = TempDir::new().unwrap();
        let ctx = CardwallContext::new(temp.path().join(".cardwall"));
        let board = CreateBoard::new("alice", "Tagged")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let id = board["id"].as_str().unwrap();

        let plain = AddLabel::new("alice", id, "Backend")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(plain["color"], auto_color("Backend"));

        let colored = AddLabel::new("alice", id, "Frontend")
            .with_color("#1D76DB")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(colored["color"], "1d76db");

        let duplicate = AddLabel::new("alice", id, "Backend")
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(duplicate, Err(CardwallError::DuplicateId { .. })));

        let stranger = AddLabel::new("mallory", id, "Ops").execute(&ctx).await.into_result();
        assert!(matches!(stranger, Err(CardwallError::PermissionDenied { .. })));
    }
}
