//! UpdateColumn command

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

/// Rename a column or change its card limit
#[operation(
    verb = "update",
    noun = "column",
    description = "Rename a column or change its card limit"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateColumn {
    /// The acting user (must be a board member)
    pub actor: UserId,
    /// The column
    pub id: ColumnId,
    /// New title
    pub title: Option<String>,
    /// New card limit; 0 removes the limit
    pub nb_max_cards: Option<usize>,
}

impl UpdateColumn {
    pub fn new(actor: impl Into<UserId>, id: impl Into<ColumnId>) -> Self {
        Self {
            actor: actor.into(),
            id: id.into(),
            title: None,
            nb_max_cards: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_limit(mut self, nb_max_cards: usize) -> Self {
        self.nb_max_cards = Some(nb_max_cards);
        self
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let (board, mut column) =
            authorize_column(ctx, &self.id, &self.actor, Permission::Edit).await?;
        let log = ActionLog::for_board(board.id.clone());
        let mut events = Vec::new();

        if let Some(title) = &self.title {
            let title = title.trim();
            if title.is_empty() {
                return Err(CardwallError::invalid_value("title", "must not be empty"));
            }
            if title != column.title {
                events.push(("column_title", json!({ "from": column.title, "to": title })));
                column.title = title.to_string();
            }
        }
        if let Some(limit) = self.nb_max_cards {
            let limit = (limit > 0).then_some(limit);
            if limit != column.nb_max_cards {
                column.nb_max_cards = limit;
                let shown = limit.map_or_else(|| "unlimited".to_string(), |l| l.to_string());
                events.push(("column_limit", json!({ "column": column.title, "limit": shown })));
            }
        }

        ctx.write_column(&column).await?;
        for (kind, values) in events {
            log.add_history(ctx, &self.actor, kind, payload(values)).await?;
        }
        Ok(serde_json::to_value(&column)?)
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for UpdateColumn {
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

    #[tokio::test]
    async fn test_rename_and_limit() {
        let temp = TempDir::new().unwrap();
        let ctx = CardwallContext::new(temp.path().join(".cardwall"));
        let board = CreateBoard::new("alice", "Limits")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let column = board["columns"][1]["id"].as_str().unwrap();

        let result = UpdateColumn::new("alice", column)
            .with_title("In progress")
            .with_limit(2)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["title"], "In progress");
        assert_eq!(result["nb_max_cards"], 2);

        let result = UpdateColumn::new("alice", column)
            .with_limit(0)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert!(result.get("nb_max_cards").is_none());

        let rendered = ActionLog::for_board(board["id"].as_str().unwrap())
            .render(&ctx, Some(1))
            .await
            .unwrap();
        assert_eq!(
            rendered[0].message,
            "Card limit of column \"In progress\" is now unlimited"
        );
    }
}
