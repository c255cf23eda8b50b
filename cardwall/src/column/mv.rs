//! MoveColumn command

use super::authorize_column;
use crate::action_log::{payload, ActionLog};
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::logged;
use crate::security::Permission;
use crate::types::{ColumnId, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Move a column to another position
#[operation(verb = "move", noun = "column", description = "Reorder a column")]
#[derive(Debug, Deserialize, Serialize)]
pub struct MoveColumn {
    /// The acting user (must be a board member)
    pub actor: UserId,
    /// The column
    pub id: ColumnId,
    /// Target position among the visible columns
    pub index: usize,
}

impl MoveColumn {
    pub fn new(actor: impl Into<UserId>, id: impl Into<ColumnId>, index: usize) -> Self {
        Self {
            actor: actor.into(),
            id: id.into(),
            index,
        }
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let (mut board, column) =
            authorize_column(ctx, &self.id, &self.actor, Permission::Edit).await?;
        if column.archive {
            return Err(CardwallError::invalid_operation(
                "the archive column cannot be moved",
            ));
        }

        board.columns.retain(|id| *id != column.id);
        let index = self.index.min(board.count_columns());
        board.insert_column(index, column.id.clone());
        ctx.write_board(&board).await?;

        ActionLog::for_board(board.id.clone())
            .add_history(
                ctx,
                &self.actor,
                "column_move",
                payload(json!({ "column": column.title, "index": index })),
            )
            .await?;

        Ok(json!({ "id": column.id, "index": index }))
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for MoveColumn {
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
    use crate::types::BoardId;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_move_last_to_first() {
        let temp = TempDir::new().unwrap();
        let ctx = CardwallContext::new(temp.path().join(".cardwall"));
        let board = CreateBoard::new("alice", "Order")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let done = board["columns"][2]["id"].as_str().unwrap();

        MoveColumn::new("alice", done, 0)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let board = ctx
            .read_board(&BoardId::from_string(board["id"].as_str().unwrap()))
            .await
            .unwrap();
        assert_eq!(board.columns[0].as_str(), done);
        assert_eq!(board.columns.last(), Some(&board.archive_column));
        assert_eq!(board.count_columns(), 3);
    }
}
