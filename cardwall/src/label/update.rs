//! UpdateLabel command

use super::parse_color;
use crate::action_log::{payload, ActionLog};
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::logged;
use crate::security::{authorize, Permission};
use crate::types::{BoardId, LabelId, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Rename or recolor a board label
#[operation(verb = "update", noun = "label", description = "Update a label's title or color")]
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateLabel {
    /// The acting user (must be a board member)
    pub actor: UserId,
    /// The board
    pub board: BoardId,
    /// The label
    pub id: LabelId,
    /// New title
    pub title: Option<String>,
    /// New color
    pub color: Option<String>,
}

impl UpdateLabel {
    pub fn new(
        actor: impl Into<UserId>,
        board: impl Into<BoardId>,
        id: impl Into<LabelId>,
    ) -> Self {
        Self {
            actor: actor.into(),
            board: board.into(),
            id: id.into(),
            title: None,
            color: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let mut board = authorize(ctx, &self.board, &self.actor, Permission::Edit).await?;
        let color = self.color.as_deref().map(parse_color).transpose()?;

        let label = board
            .find_label_mut(&self.id)
            .ok_or_else(|| CardwallError::LabelNotFound {
                id: self.id.to_string(),
            })?;
        let from = label.title.clone();
        if let Some(title) = &self.title {
            let title = title.trim();
            if title.is_empty() {
                return Err(CardwallError::invalid_value("title", "label title cannot be empty"));
            }
            label.title = title.to_string();
        }
        if let Some(color) = color {
            label.color = color;
        }
        let label = label.clone();
        ctx.write_board(&board).await?;

        ActionLog::for_board(board.id.clone())
            .add_history(
                ctx,
                &self.actor,
                "board_update_label",
                payload(json!({ "from": from, "to": label.title })),
            )
            .await?;
        Ok(serde_json::to_value(&label)?)
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for UpdateLabel {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();
        let result = self.run(ctx).await;
        logged(self, &self.actor, start, result)
    }
}
