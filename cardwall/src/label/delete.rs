//! DeleteLabel command

use crate::action_log::{payload, ActionLog};
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::logged;
use crate::security::{authorize, Permission};
use crate::types::{BoardId, LabelId, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

/// Delete a board label and take it off every card
#[operation(
    verb = "delete",
    noun = "label",
    description = "Delete a label from a board and its cards"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteLabel {
    /// The acting user (must be a board manager)
    pub actor: UserId,
    /// The board
    pub board: BoardId,
    /// The label
    pub id: LabelId,
}

impl DeleteLabel {
    pub fn new(
        actor: impl Into<UserId>,
        board: impl Into<BoardId>,
        id: impl Into<LabelId>,
    ) -> Self {
        Self {
            actor: actor.into(),
            board: board.into(),
            id: id.into(),
        }
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let mut board = authorize(ctx, &self.board, &self.actor, Permission::Manage).await?;
        let position = board
            .labels
            .iter()
            .position(|l| l.id == self.id)
            .ok_or_else(|| CardwallError::LabelNotFound {
                id: self.id.to_string(),
            })?;
        let label = board.labels.remove(position);

        let mut cards = Vec::new();
        for mut card in ctx.read_board_cards(&board.id).await? {
            if card.labels.remove(&label.id) {
                ctx.write_card(&card).await?;
                cards.push(card.id);
            }
        }
        debug!(label = %label.id, cards = cards.len(), "label removed from cards");
        ctx.write_board(&board).await?;

        ActionLog::for_board(board.id.clone())
            .add_history(
                ctx,
                &self.actor,
                "board_delete_label",
                payload(json!({ "label": label.title })),
            )
            .await?;
        Ok(json!({ "deleted": true, "id": label.id, "cards": cards }))
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for DeleteLabel {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();
        let result = self.run(ctx).await;
        logged(self, &self.actor, start, result)
    }
}
