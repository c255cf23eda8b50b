//! ListLabels command

use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::unlogged;
use crate::security::{authorize, Permission};
use crate::types::{BoardId, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// List the labels of a board
#[operation(verb = "list", noun = "labels", description = "List the labels of a board")]
#[derive(Debug, Deserialize, Serialize)]
pub struct ListLabels {
    /// The viewing user
    pub viewer: UserId,
    /// The board
    pub board: BoardId,
}

impl ListLabels {
    pub fn new(viewer: impl Into<UserId>, board: impl Into<BoardId>) -> Self {
        Self {
            viewer: viewer.into(),
            board: board.into(),
        }
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for ListLabels {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let result: Result<Value> = async {
            let board = authorize(ctx, &self.board, &self.viewer, Permission::View).await?;
            Ok(json!({ "labels": board.labels, "count": board.labels.len() }))
        }
        .await;
        unlogged(result)
    }
}
