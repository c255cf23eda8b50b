//! ListColumns command

use crate::board::board_view;
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::security::{authorize, Permission};
use crate::types::{BoardId, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// List the columns of a board in order
#[operation(verb = "list", noun = "columns", description = "List the columns of a board")]
#[derive(Debug, Deserialize, Serialize)]
pub struct ListColumns {
    /// The viewing user
    pub viewer: UserId,
    /// The board
    pub board: BoardId,
    /// Include the archive column
    #[serde(default)]
    pub include_archive: bool,
}

impl ListColumns {
    pub fn new(viewer: impl Into<UserId>, board: impl Into<BoardId>) -> Self {
        Self {
            viewer: viewer.into(),
            board: board.into(),
            include_archive: false,
        }
    }

    pub fn with_archive(mut self) -> Self {
        self.include_archive = true;
        self
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for ListColumns {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let result: Result<Value> = async {
            let board = authorize(ctx, &self.board, &self.viewer, Permission::View).await?;
            let view = board_view(ctx, &board).await?;
            let columns: Vec<Value> = view["columns"]
                .as_array()
                .map(|columns| {
                    columns
                        .iter()
                        .filter(|c| self.include_archive || c["archive"] != true)
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();
            Ok(json!({ "columns": columns, "count": columns.len() }))
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
