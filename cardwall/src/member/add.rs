//! AddBoardMember command

use super::display_name;
use crate::action_log::{payload, ActionLog};
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::logged;
use crate::security::{authorize, Permission};
use crate::types::{BoardId, Role, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Add a registered user to a board
#[operation(verb = "add", noun = "member", description = "Add a user to a board")]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddBoardMember {
    /// The acting user (must be a board manager)
    pub actor: UserId,
    /// The board
    pub board: BoardId,
    /// The user to add
    pub user: UserId,
    /// Role of the new member
    #[serde(default)]
    pub role: Role,
}

impl AddBoardMember {
    pub fn new(
        actor: impl Into<UserId>,
        board: impl Into<BoardId>,
        user: impl Into<UserId>,
    ) -> Self {
        Self {
            actor: actor.into(),
            board: board.into(),
            user: user.into(),
            role: Role::Member,
        }
    }

    pub fn as_manager(mut self) -> Self {
        self.role = Role::Manager;
        self
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let mut board = authorize(ctx, &self.board, &self.actor, Permission::AddUsers).await?;
        let user = ctx.read_user(&self.user).await?;

        if !board.add_member(user.username.clone(), self.role) {
            return Ok(json!({
                "added": false,
                "user": user.username,
                "role": board.role_of(&user.username).map(|r| r.as_str()),
            }));
        }
        ctx.write_board(&board).await?;

        ActionLog::for_board(board.id.clone())
            .add_history(
                ctx,
                &self.actor,
                "board_add_member",
                payload(json!({
                    "user_id": user.username,
                    "user": display_name(ctx, &user.username).await?,
                    "board": board.title,
                })),
            )
            .await?;
        Ok(json!({ "added": true, "user": user.username, "role": self.role.as_str() }))
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for AddBoardMember {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();
        let result = self.run(ctx).await;
        logged(self, &self.actor, start, result)
    }
}
