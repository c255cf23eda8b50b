//! UpdateBoard command

use crate::action_log::{payload, ActionLog};
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::logged;
use crate::security::{authorize, Permission};
use crate::types::{BoardId, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Update board title, description or card weighting
#[operation(
    verb = "update",
    noun = "board",
    description = "Update board title, description or card weighting"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateBoard {
    /// The acting user (must manage the board)
    pub actor: UserId,
    /// The board to update
    pub id: BoardId,
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// Turn card weighting on or off
    pub weighting_cards: Option<bool>,
}

impl UpdateBoard {
    pub fn new(actor: impl Into<UserId>, id: impl Into<BoardId>) -> Self {
        Self {
            actor: actor.into(),
            id: id.into(),
            title: None,
            description: None,
            weighting_cards: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_weighting(mut self, on: bool) -> Self {
        self.weighting_cards = Some(on);
        self
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let mut board = authorize(ctx, &self.id, &self.actor, Permission::Manage).await?;
        let mut events = Vec::new();

        if let Some(title) = &self.title {
            let title = title.trim();
            if title.is_empty() {
                return Err(CardwallError::invalid_value("title", "must not be empty"));
            }
            if title != board.title {
                events.push(("board_title", json!({ "from": board.title, "to": title })));
                board.title = title.to_string();
            }
        }
        if let Some(description) = &self.description {
            if *description != board.description {
                board.description = description.clone();
                events.push(("board_description", json!({ "board": board.title })));
            }
        }
        if let Some(on) = self.weighting_cards {
            if on != board.weighting_cards {
                board.weighting_cards = on;
                let state = if on { "on" } else { "off" };
                events.push(("board_weighting", json!({ "board": board.title, "state": state })));
            }
        }

        ctx.write_board(&board).await?;

        let log = ActionLog::for_board(board.id.clone());
        for (kind, values) in events {
            log.add_history(ctx, &self.actor, kind, payload(values)).await?;
        }

        Ok(serde_json::to_value(ctx.read_board(&board.id).await?)?)
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for UpdateBoard {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();
        let result = self.run(ctx).await;
        logged(self, &self.actor, start, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CreateBoard;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, CardwallContext, String) {
        let temp = TempDir::new().unwrap();
        let ctx = CardwallContext::new(temp.path().join(".cardwall"));
        let board = CreateBoard::new("alice", "Old")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        (temp, ctx, board["id"].as_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_update_title_and_weighting() {
        let (_temp, ctx, id) = setup().await;

        let result = UpdateBoard::new("alice", id.as_str())
            .with_title("New")
            .with_weighting(true)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["title"], "New");
        assert_eq!(result["weighting_cards"], true);

        let actions = ctx.read_actions(&BoardId::from_string(id)).await.unwrap();
        assert_eq!(actions[0].action, "board_weighting");
        assert_eq!(actions[1].action, "board_title");
    }

    #[tokio::test]
    async fn test_update_requires_manager() {
        let (_temp, ctx, id) = setup().await;
        let result = UpdateBoard::new("bob", id.as_str())
            .with_title("Hijacked")
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(CardwallError::PermissionDenied { .. })));
    }
}
