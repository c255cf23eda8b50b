//! SetBoardAccess command

use crate::action_log::{payload, ActionLog};
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::logged;
use crate::security::{authorize, Permission};
use crate::types::{Access, BoardId, UserId, Visibility};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

/// Change board visibility and comment/vote access
#[operation(
    verb = "set",
    noun = "access",
    description = "Change board visibility, comment access and vote access"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct SetBoardAccess {
    /// The acting user (must manage the board)
    pub actor: UserId,
    /// The board
    pub id: BoardId,
    /// New visibility, applied before the access settings
    pub visibility: Option<Visibility>,
    /// Who may comment
    pub comments: Option<Access>,
    /// Who may vote
    pub votes: Option<Access>,
}

impl SetBoardAccess {
    pub fn new(actor: impl Into<UserId>, id: impl Into<BoardId>) -> Self {
        Self {
            actor: actor.into(),
            id: id.into(),
            visibility: None,
            comments: None,
            votes: None,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn with_comments(mut self, access: Access) -> Self {
        self.comments = Some(access);
        self
    }

    pub fn with_votes(mut self, access: Access) -> Self {
        self.votes = Some(access);
        self
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let mut board = authorize(ctx, &self.id, &self.actor, Permission::Manage).await?;

        if let Some(visibility) = self.visibility {
            board.set_visibility(visibility);
        }
        if let Some(access) = self.comments {
            board.set_comments_allowed(access);
        }
        if let Some(access) = self.votes {
            board.set_votes_allowed(access);
        }
        ctx.write_board(&board).await?;

        let values = json!({
            "board": board.title,
            "visibility": board.visibility,
            "comments": board.comments_allowed,
            "votes": board.votes_allowed,
        });
        ActionLog::for_board(board.id.clone())
            .add_history(ctx, &self.actor, "board_visibility", payload(values.clone()))
            .await?;

        info!(
            board = %board.id,
            visibility = ?board.visibility,
            comments = ?board.comments_allowed,
            votes = ?board.votes_allowed,
            "board access changed"
        );
        Ok(values)
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for SetBoardAccess {
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

    async fn setup() -> (TempDir, CardwallContext, String) {
        let temp = TempDir::new().unwrap();
        let ctx = CardwallContext::new(temp.path().join(".cardwall"));
        let board = CreateBoard::new("alice", "Access")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        (temp, ctx, board["id"].as_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_public_round_trip_downgrades_public_access() {
        let (_temp, ctx, id) = setup().await;

        SetBoardAccess::new("alice", id.as_str())
            .with_visibility(Visibility::Public)
            .with_comments(Access::Public)
            .with_votes(Access::Members)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let private = SetBoardAccess::new("alice", id.as_str())
            .with_visibility(Visibility::Private)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(private["comments"], "members");
        assert_eq!(private["votes"], "members");

        let public = SetBoardAccess::new("alice", id.as_str())
            .with_visibility(Visibility::Public)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(public["visibility"], "public");
        assert_eq!(public["comments"], "members");
        assert_eq!(public["votes"], "members");
    }

    #[tokio::test]
    async fn test_history_is_rendered() {
        let (_temp, ctx, id) = setup().await;
        SetBoardAccess::new("alice", id.as_str())
            .with_votes(Access::Off)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let rendered = ActionLog::for_board(id.as_str()).render(&ctx, Some(1)).await.unwrap();
        assert_eq!(
            rendered[0].message,
            "Board \"Access\" is now private (comments: members, votes: off)"
        );
    }
}
