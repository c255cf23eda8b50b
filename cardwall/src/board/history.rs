//! GetBoardHistory command

use crate::action_log::ActionLog;
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::unlogged;
use crate::security::{has_permission, Permission};
use crate::types::{BoardId, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Rendered action log of a board, newest first
#[operation(
    verb = "history",
    noun = "board",
    description = "Show the rendered action log of a board"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct GetBoardHistory {
    /// The board
    pub id: BoardId,
    /// The viewing user
    pub viewer: Option<UserId>,
    /// Maximum number of entries
    pub limit: Option<usize>,
}

impl GetBoardHistory {
    pub fn new(id: impl Into<BoardId>) -> Self {
        Self {
            id: id.into(),
            viewer: None,
            limit: None,
        }
    }

    pub fn viewed_by(mut self, viewer: impl Into<UserId>) -> Self {
        self.viewer = Some(viewer.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for GetBoardHistory {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let result: Result<Value> = async {
            let board = ctx.read_board(&self.id).await?;
            if !has_permission(&board, self.viewer.as_ref(), Permission::View) {
                return Err(CardwallError::permission_denied(
                    self.viewer.as_ref().map_or("anonymous", UserId::as_str),
                    Permission::View.as_str(),
                ));
            }
            let entries = ActionLog::for_board(board.id.clone())
                .render(ctx, self.limit)
                .await?;
            Ok(json!({ "board": board.id, "count": entries.len(), "entries": entries }))
        }
        .await;
        unlogged(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{CreateBoard, UpdateBoard};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_board_history() {
        let temp = TempDir::new().unwrap();
        let ctx = CardwallContext::new(temp.path().join(".cardwall"));
        let board = CreateBoard::new("alice", "Storied")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let id = board["id"].as_str().unwrap();
        UpdateBoard::new("alice", id)
            .with_title("Retold")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let history = GetBoardHistory::new(id)
            .viewed_by("alice")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(history["count"], 2);
        assert_eq!(
            history["entries"][0]["message"],
            "Board \"Storied\" has been renamed to \"Retold\""
        );
        assert_eq!(
            history["entries"][1]["message"],
            "Board \"Storied\" has been created"
        );

        let denied = GetBoardHistory::new(id).execute(&ctx).await.into_result();
        assert!(matches!(denied, Err(CardwallError::PermissionDenied { .. })));
    }
}
