//! ArchiveBoard and RestoreBoard commands

use crate::action_log::{payload, ActionLog};
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::logged;
use crate::security::{authorize, Permission};
use crate::types::{BoardId, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

async fn set_archived(
    ctx: &CardwallContext,
    actor: &UserId,
    id: &BoardId,
    archived: bool,
) -> Result<Value> {
    let mut board = authorize(ctx, id, actor, Permission::Manage).await?;
    if board.archived == archived {
        return Err(CardwallError::invalid_operation(if archived {
            "board is already archived"
        } else {
            "board is not archived"
        }));
    }

    board.archived = archived;
    ctx.write_board(&board).await?;

    let kind = if archived { "board_archive" } else { "board_restore" };
    ActionLog::for_board(board.id.clone())
        .add_history(ctx, actor, kind, payload(json!({ "board": board.title })))
        .await?;

    info!(board = %board.id, archived, "board archive state changed");
    Ok(json!({ "id": board.id, "archived": archived }))
}

/// Archive a board
#[operation(verb = "archive", noun = "board", description = "Archive a board")]
#[derive(Debug, Deserialize, Serialize)]
pub struct ArchiveBoard {
    /// The acting user (must manage the board)
    pub actor: UserId,
    /// The board to archive
    pub id: BoardId,
}

impl ArchiveBoard {
    pub fn new(actor: impl Into<UserId>, id: impl Into<BoardId>) -> Self {
        Self {
            actor: actor.into(),
            id: id.into(),
        }
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for ArchiveBoard {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();
        let result = set_archived(ctx, &self.actor, &self.id, true).await;
        logged(self, &self.actor, start, result)
    }
}

/// Bring an archived board back
#[operation(verb = "restore", noun = "board", description = "Restore an archived board")]
#[derive(Debug, Deserialize, Serialize)]
pub struct RestoreBoard {
    /// The acting user (must manage the board)
    pub actor: UserId,
    /// The board to restore
    pub id: BoardId,
}

impl RestoreBoard {
    pub fn new(actor: impl Into<UserId>, id: impl Into<BoardId>) -> Self {
        Self {
            actor: actor.into(),
            id: id.into(),
        }
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for RestoreBoard {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();
        let result = set_archived(ctx, &self.actor, &self.id, false).await;
        logged(self, &self.actor, start, result)
    }
}
