//! GetColumn command

use super::authorize_column;
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::security::Permission;
use crate::types::{ColumnId, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Get a column with its cards in order
#[operation(verb = "get", noun = "column", description = "Retrieve a column and its cards")]
#[derive(Debug, Deserialize, Serialize)]
pub struct GetColumn {
    /// The viewing user
    pub viewer: UserId,
    /// The column
    pub id: ColumnId,
}

impl GetColumn {
    pub fn new(viewer: impl Into<UserId>, id: impl Into<ColumnId>) -> Self {
        Self {
            viewer: viewer.into(),
            id: id.into(),
        }
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for GetColumn {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let result: Result<Value> = async {
            let (board, column) =
                authorize_column(ctx, &self.id, &self.viewer, Permission::View).await?;
            let cards: Vec<Value> = ctx
                .read_column_cards(&column.id)
                .await?
                .iter()
                .map(|card| json!({ "id": card.id, "title": card.title, "index": card.index }))
                .collect();

            let mut value = serde_json::to_value(&column)?;
            value["index"] = json!(board.columns.iter().position(|id| *id == column.id));
            value["count"] = json!(cards.len());
            value["cards"] = json!(cards);
            Ok(value)
        }
        .await;

        match result {
            Ok(value) => ExecutionResult::Unlogged { value },
            Err(error) => ExecutionResult::Failed {
                error,
                log_entry: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CreateBoard;
    use crate::card::AddCard;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_get_column() {
        let temp = TempDir::new().unwrap();
        let ctx = CardwallContext::new(temp.path().join(".cardwall"));
        let board = CreateBoard::new("alice", "Get")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let column = board["columns"][1]["id"].as_str().unwrap();
        AddCard::new("alice", column, "First")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let result = GetColumn::new("alice", column)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["title"], "Doing");
        assert_eq!(result["index"], 1);
        assert_eq!(result["cards"][0]["title"], "First");

        let missing = GetColumn::new("alice", "nope").execute(&ctx).await.into_result();
        assert!(matches!(missing, Err(CardwallError::ColumnNotFound { .. })));
    }
}
