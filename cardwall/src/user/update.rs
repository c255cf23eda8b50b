//! User settings: password, last board, last login

use super::user_view;
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::logged;
use crate::security::{authorize, Permission};
use crate::types::{BoardId, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

/// Change the password of an application user
#[operation(verb = "password", noun = "user", description = "Change a user's password")]
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdatePassword {
    /// The user changing their password
    pub actor: UserId,
    /// Current password
    #[serde(skip_serializing)]
    pub current: String,
    /// New password
    #[serde(skip_serializing)]
    pub password: String,
}

impl UpdatePassword {
    pub fn new(
        actor: impl Into<UserId>,
        current: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            actor: actor.into(),
            current: current.into(),
            password: password.into(),
        }
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let mut user = ctx.read_user(&self.actor).await?;
        if !user.is_local() {
            return Err(CardwallError::invalid_operation(format!(
                "{} is managed by an external provider",
                user.username
            )));
        }
        if !user.check_password(&self.current) {
            return Err(CardwallError::permission_denied(&self.actor, "change password"));
        }
        if self.password.is_empty() {
            return Err(CardwallError::invalid_value("password", "password cannot be empty"));
        }
        user.set_password(&self.password)?;
        ctx.write_user(&user).await?;

        info!(user = %user.username, "password changed");
        Ok(json!({ "username": user.username, "updated": true }))
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for UpdatePassword {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();
        let result = self.run(ctx).await;
        logged(self, &self.actor, start, result)
    }
}

/// Remember the board a user last worked on
#[operation(verb = "last-board", noun = "user", description = "Set the user's last used board")]
#[derive(Debug, Deserialize, Serialize)]
pub struct SetLastBoard {
    /// The user
    pub actor: UserId,
    /// The board, or none to forget it
    pub board: Option<BoardId>,
}

impl SetLastBoard {
    pub fn new(actor: impl Into<UserId>, board: impl Into<BoardId>) -> Self {
        Self {
            actor: actor.into(),
            board: Some(board.into()),
        }
    }

    pub fn clear(actor: impl Into<UserId>) -> Self {
        Self {
            actor: actor.into(),
            board: None,
        }
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let mut user = ctx.read_user(&self.actor).await?;
        if let Some(board) = &self.board {
            authorize(ctx, board, &self.actor, Permission::View).await?;
        }
        user.last_board = self.board.clone();
        ctx.write_user(&user).await?;

        debug!(user = %user.username, board = ?user.last_board, "last board set");
        Ok(json!({ "username": user.username, "last_board": user.last_board }))
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for SetLastBoard {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();
        let result = self.run(ctx).await;
        logged(self, &self.actor, start, result)
    }
}

/// Stamp the user's last login time
#[operation(verb = "login", noun = "user", description = "Record a user login")]
#[derive(Debug, Deserialize, Serialize)]
pub struct RecordLogin {
    /// The user logging in
    pub actor: UserId,
}

impl RecordLogin {
    pub fn new(actor: impl Into<UserId>) -> Self {
        Self {
            actor: actor.into(),
        }
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let mut user = ctx.read_user(&self.actor).await?;
        user.last_login = Some(Utc::now());
        ctx.write_user(&user).await?;
        user_view(&user)
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for RecordLogin {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();
        let result = self.run(ctx).await;
        logged(self, &self.actor, start, result)
    }
}
