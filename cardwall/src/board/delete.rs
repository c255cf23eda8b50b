//! DeleteBoard command

use super::purge_card;
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::logged;
use crate::security::{authorize, Permission};
use crate::types::{BoardId, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

/// Delete a board with its columns, cards, invitations and history
#[operation(
    verb = "delete",
    noun = "board",
    description = "Delete a board with all its columns, cards and history"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteBoard {
    /// The acting user (must manage the board)
    pub actor: UserId,
    /// The board to delete
    pub id: BoardId,
}

impl DeleteBoard {
    pub fn new(actor: impl Into<UserId>, id: impl Into<BoardId>) -> Self {
        Self {
            actor: actor.into(),
            id: id.into(),
        }
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let board = authorize(ctx, &self.id, &self.actor, Permission::Manage).await?;

        let cards = ctx.read_board_cards(&board.id).await?;
        let card_count = cards.len();
        for card in cards {
            purge_card(ctx, card).await?;
        }

        for column in &board.columns {
            ctx.delete_column_file(column).await?;
        }
        for token in &board.pending {
            ctx.delete_token_file(token).await?;
        }

        for mut user in ctx.read_all_users().await? {
            if user.last_board.as_ref() == Some(&board.id) {
                user.last_board = None;
                ctx.write_user(&user).await?;
                debug!(user = %user.username, "cleared last board");
            }
        }

        ctx.delete_board_files(&board.id).await?;
        info!(board = %board.id, cards = card_count, "deleted board");

        Ok(json!({ "deleted": true, "id": board.id, "cards": card_count }))
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for DeleteBoard {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();
        let result = self.run(ctx).await;
        logged(self, &self.actor, start, result)
    }
}
