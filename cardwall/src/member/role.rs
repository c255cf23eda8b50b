//! ToggleRole command

use super::display_name;
use crate::action_log::{payload, ActionLog};
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::logged;
use crate::security::{authorize, Permission};
use crate::types::{BoardId, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Promote a member to manager, or demote a manager to member
#[operation(
    verb = "toggle",
    noun = "role",
    description = "Switch a board user between member and manager"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct ToggleRole {
    /// The acting user (must be a board manager)
    pub actor: UserId,
    /// The board
    pub board: BoardId,
    /// The user whose role changes
    pub user: UserId,
}

impl ToggleRole {
    pub fn new(
        actor: impl Into<UserId>,
        board: impl Into<BoardId>,
        user: impl Into<UserId>,
    ) -> Self {
        Self {
            actor: actor.into(),
            board: board.into(),
            user: user.into(),
        }
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let mut board = authorize(ctx, &self.board, &self.actor, Permission::Manage).await?;
        if !board.has_member(&self.user) {
            return Err(CardwallError::invalid_operation(format!(
                "{} is not a member of board \"{}\"",
                self.user, board.title
            )));
        }
        let role = board.toggle_role(&self.user).ok_or_else(|| {
            CardwallError::invalid_operation("cannot demote the last manager of a board")
        })?;
        ctx.write_board(&board).await?;

        ActionLog::for_board(board.id.clone())
            .add_history(
                ctx,
                &self.actor,
                "board_role",
                payload(json!({
                    "user_id": self.user,
                    "user": display_name(ctx, &self.user).await?,
                    "role": role.as_str(),
                    "board": board.title,
                })),
            )
            .await?;
        Ok(json!({ "user": self.user, "role": role.as_str() }))
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for ToggleRole {
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
    use crate::types::{Role, User};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_toggle_twice_restores_role() {
        let temp = TempDir::new().unwrap();
        let ctx = CardwallContext::new(temp.path().join(".cardwall"));
        ctx.write_user(&User::external("bob", "bob@example.com", "Bob"))
            .await
            .unwrap();
        let board = CreateBoard::new("alice", "Roles")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let id = board["id"].as_str().unwrap();
        let board_id = BoardId::from(id);
        let mut stored = ctx.read_board(&board_id).await.unwrap();
        stored.add_member(UserId::from("bob"), Role::Member);
        ctx.write_board(&stored).await.unwrap();

        let promoted = ToggleRole::new("alice", id, "bob")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(promoted["role"], "manager");

        let demoted = ToggleRole::new("alice", id, "bob")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(demoted["role"], "member");

        let stored = ctx.read_board(&board_id).await.unwrap();
        assert_eq!(stored.role_of(&UserId::from("bob")), Some(Role::Member));
        assert_eq!(stored.managers.len(), 1);

        let last = ToggleRole::new("alice", id, "alice")
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(last, Err(CardwallError::InvalidOperation { .. })));

        let stranger = ToggleRole::new("alice", id, "mallory")
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(stranger, Err(CardwallError::InvalidOperation { .. })));
    }
}
