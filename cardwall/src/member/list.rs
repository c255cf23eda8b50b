//! ListBoardMembers command

use super::display_name;
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::unlogged;
use crate::security::{authorize, Permission};
use crate::types::{BoardId, PendingUser, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeSet;

/// Managers, members and pending invitees of a board
#[operation(verb = "list", noun = "members", description = "List the users of a board")]
#[derive(Debug, Deserialize, Serialize)]
pub struct ListBoardMembers {
    /// The viewing user
    pub viewer: UserId,
    /// The board
    pub board: BoardId,
}

impl ListBoardMembers {
    pub fn new(viewer: impl Into<UserId>, board: impl Into<BoardId>) -> Self {
        Self {
            viewer: viewer.into(),
            board: board.into(),
        }
    }
}

async fn describe(ctx: &CardwallContext, users: &BTreeSet<UserId>) -> Result<Vec<Value>> {
    let mut described = Vec::with_capacity(users.len());
    for user in users {
        described.push(json!({ "username": user, "fullname": display_name(ctx, user).await? }));
    }
    Ok(described)
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for ListBoardMembers {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let result: Result<Value> = async {
            let board = authorize(ctx, &self.board, &self.viewer, Permission::View).await?;
            let pending: Vec<Value> = ctx
                .read_board_tokens(&board)
                .await?
                .into_iter()
                .map(PendingUser::new)
                .map(|p| json!({ "token": p.token_id(), "email": p.email() }))
                .collect();
            Ok(json!({
                "managers": describe(ctx, &board.managers).await?,
                "members": describe(ctx, &board.members).await?,
                "pending": pending,
            }))
        }
        .await;
        unlogged(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CreateBoard;
    use crate::member::{AddBoardMember, InviteMember};
    use crate::types::User;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_list_members() {
        let temp = TempDir::new().unwrap();
        let ctx = CardwallContext::new(temp.path().join(".cardwall"));
        ctx.write_user(&User::external("bob", "bob@example.com", "Bob"))
            .await
            .unwrap();
        let board = CreateBoard::new("alice", "People")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let id = board["id"].as_str().unwrap();
        AddBoardMember::new("alice", id, "bob")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        InviteMember::new("alice", id, "carol@example.com")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let listed = ListBoardMembers::new("bob", id)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(listed["managers"], json!([{ "username": "alice", "fullname": "alice" }]));
        assert_eq!(listed["members"], json!([{ "username": "bob", "fullname": "Bob" }]));
        assert_eq!(listed["pending"][0]["email"], "carol@example.com");
    }
}
