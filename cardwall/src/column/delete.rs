//! DeleteColumn command

use super::authorize_column;
use crate::action_log::{payload, ActionLog};
use crate::board::purge_card;
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::logged;
use crate::security::Permission;
use crate::types::{ColumnId, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

/// Delete a column, archiving or purging its cards
#[operation(
    verb = "delete",
    noun = "column",
    description = "Delete a column; its cards move to the archive column unless purged"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteColumn {
    /// The acting user (must be a board member)
    pub actor: UserId,
    /// The column to delete
    pub id: ColumnId,
    /// Delete the cards instead of archiving them
    #[serde(default)]
    pub purge: bool,
}

impl DeleteColumn {
    pub fn new(actor: impl Into<UserId>, id: impl Into<ColumnId>) -> Self {
        Self {
            actor: actor.into(),
            id: id.into(),
            purge: false,
        }
    }

    pub fn purging(mut self) -> Self {
        self.purge = true;
        self
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let (mut board, column) =
            authorize_column(ctx, &self.id, &self.actor, Permission::Edit).await?;
        if column.archive {
            return Err(CardwallError::invalid_operation(
                "the archive column cannot be deleted",
            ));
        }

        let cards = ctx.read_column_cards(&column.id).await?;
        let count = cards.len();
        if self.purge {
            for card in cards {
                purge_card(ctx, card).await?;
            }
        } else {
            let mut next = ctx.read_column_cards(&board.archive_column).await?.len();
            for mut card in cards {
                card.column = board.archive_column.clone();
                card.archived = true;
                card.index = next;
                next += 1;
                ctx.write_card(&card).await?;
            }
        }

        board.columns.retain(|id| *id != column.id);
        ctx.write_board(&board).await?;
        ctx.delete_column_file(&column.id).await?;

        ActionLog::for_board(board.id.clone())
            .add_history(
                ctx,
                &self.actor,
                "column_delete",
                payload(json!({ "column": column.title })),
            )
            .await?;

        info!(
            column = %column.id,
            board = %board.id,
            cards = count,
            purged = self.purge,
            "deleted column",
        );
        Ok(json!({
            "deleted": true,
            "id": column.id,
            "cards": count,
            "purged": self.purge,
        }))
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for DeleteColumn {
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
    use crate::card::AddCard;
    use crate::types::BoardId;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, CardwallContext, BoardId, String) {
        let temp = TempDir::new().unwrap();
        let ctx = CardwallContext::new(temp.path().join(".cardwall"));
        let board = CreateBoard::new("alice", "Prune")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let column = board["columns"][0]["id"].as_str().unwrap().to_string();
        for title in ["one", "two"] {
            AddCard::new("alice", column.as_str(), title)
                .execute(&ctx)
                .await
                .into_result()
                .unwrap();
        }
        (temp, ctx, BoardId::from_string(board["id"].as_str().unwrap()), column)
    }

    #[tokio::test]
    async fn test_delete_column_archives_cards() {
        let (_temp, ctx, board_id, column) = setup().await;

        let result = DeleteColumn::new("alice", column.as_str())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["cards"], 2);

        let board = ctx.read_board(&board_id).await.unwrap();
        assert_eq!(board.count_columns(), 2);
        let archived = ctx.read_column_cards(&board.archive_column).await.unwrap();
        assert_eq!(archived.len(), 2);
        assert!(archived.iter().all(|c| c.archived));
        assert_eq!(archived[0].title, "one");
        assert_eq!(archived[1].index, 1);
    }

    #[tokio::test]
    async fn test_delete_column_purges_cards() {
        let (_temp, ctx, board_id, column) = setup().await;

        DeleteColumn::new("alice", column.as_str())
            .purging()
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert!(ctx.read_board_cards(&board_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_archive_column_is_protected() {
        let (_temp, ctx, board_id, _column) = setup().await;
        let board = ctx.read_board(&board_id).await.unwrap();

        let result = DeleteColumn::new("alice", board.archive_column)
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(CardwallError::InvalidOperation { .. })));
    }
}
