//! GetBoard and ListTemplates commands

use super::{board_view, BoardsManager};
use crate::context::CardwallContext;
use crate::error::CardwallError;
use crate::types::{BoardId, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Get a board by id or uri, with its columns and card counts
#[operation(
    verb = "get",
    noun = "board",
    description = "Retrieve a board by id or uri with columns and card counts"
)]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GetBoard {
    /// The board id
    pub id: Option<BoardId>,
    /// The board uri, used when no id is given
    pub uri: Option<String>,
    /// Check that this user may view the board
    pub viewer: Option<UserId>,
}

impl GetBoard {
    pub fn by_id(id: impl Into<BoardId>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn by_uri(uri: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            ..Self::default()
        }
    }

    pub fn viewed_by(mut self, viewer: impl Into<UserId>) -> Self {
        self.viewer = Some(viewer.into());
        self
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for GetBoard {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        match async {
            let manager = BoardsManager::new(ctx);
            let board = match (&self.id, &self.uri) {
                (Some(id), _) => manager.get_by_id(id).await?,
                (None, Some(uri)) => manager.get_by_uri(uri).await?,
                (None, None) => return Err(CardwallError::missing_field("id")),
            };
            if self.viewer.is_some() {
                manager.get_by_id_for(&board.id, self.viewer.as_ref()).await?;
            }
            board_view(ctx, &board).await
        }
        .await
        {
            Ok(value) => ExecutionResult::Unlogged { value },
            Err(error) => ExecutionResult::Failed {
                error,
                log_entry: None,
            },
        }
    }
}

/// List template boards visible to a user
#[operation(verb = "list", noun = "templates", description = "List board templates")]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ListTemplates {
    /// Restrict to templates this user can see; public ones only when absent
    pub viewer: Option<UserId>,
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for ListTemplates {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        match BoardsManager::new(ctx).templates(self.viewer.as_ref()).await {
            Ok(templates) => {
                let templates: Vec<Value> = templates
                    .iter()
                    .map(|t| {
                        json!({
                            "id": t.id,
                            "title": t.title,
                            "description": t.description,
                            "visibility": t.visibility,
                        })
                    })
                    .collect();
                ExecutionResult::Unlogged {
                    value: json!({ "templates": templates, "count": templates.len() }),
                }
            }
            Err(error) => ExecutionResult::Failed {
                error,
                log_entry: None,
            },
        }
    }
}
