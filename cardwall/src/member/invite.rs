//! InviteMember and AcceptInvitation commands

use super::display_name;
use crate::action_log::{payload, ActionLog};
use crate::board::board_view;
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::logged;
use crate::security::{authorize, Permission};
use crate::types::{BoardId, InvitationToken, Role, TokenId, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

/// Invite someone to a board by email
#[operation(verb = "invite", noun = "member", description = "Invite an email address to a board")]
#[derive(Debug, Deserialize, Serialize)]
pub struct InviteMember {
    /// The acting user (must be a board manager)
    pub actor: UserId,
    /// The board
    pub board: BoardId,
    /// Address of the invitee
    pub email: String,
}

impl InviteMember {
    pub fn new(
        actor: impl Into<UserId>,
        board: impl Into<BoardId>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            actor: actor.into(),
            board: board.into(),
            email: email.into(),
        }
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let email = self.email.trim();
        if !email.contains('@') {
            return Err(CardwallError::invalid_value(
                "email",
                format!("\"{email}\" is not an email address"),
            ));
        }
        let mut board = authorize(ctx, &self.board, &self.actor, Permission::AddUsers).await?;

        if let Some(user) = ctx.find_user_by_email(email).await? {
            if board.has_member(&user.username) {
                return Err(CardwallError::invalid_operation(format!(
                    "{} is already a member of board \"{}\"",
                    user.username, board.title
                )));
            }
        }
        let existing = ctx
            .read_board_tokens(&board)
            .await?
            .into_iter()
            .find(|t| t.email.eq_ignore_ascii_case(email));
        if let Some(token) = existing {
            return Ok(json!({ "invited": false, "token": token.id, "email": token.email }));
        }

        let token = InvitationToken::new(email, board.id.clone());
        ctx.write_token(&token).await?;
        board.pending.insert(token.id.clone());
        ctx.write_board(&board).await?;

        ActionLog::for_board(board.id.clone())
            .add_history(
                ctx,
                &self.actor,
                "board_invite",
                payload(json!({ "email": token.email, "board": board.title })),
            )
            .await?;
        info!(board = %board.id, token = %token.id, "invitation sent");
        Ok(json!({ "invited": true, "token": token.id, "email": token.email }))
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for InviteMember {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();
        let result = self.run(ctx).await;
        logged(self, &self.actor, start, result)
    }
}

/// Join a board through an invitation addressed to the actor's email
#[operation(
    verb = "accept",
    noun = "invitation",
    description = "Join a board through an invitation"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct AcceptInvitation {
    /// The registered user accepting the invitation
    pub actor: UserId,
    /// The invitation token
    pub token: TokenId,
}

impl AcceptInvitation {
    pub fn new(actor: impl Into<UserId>, token: impl Into<TokenId>) -> Self {
        Self {
            actor: actor.into(),
            token: token.into(),
        }
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let token = ctx.read_token(&self.token).await?;
        let mut board = ctx.read_board(&token.board).await?;
        if !board.pending.contains(&token.id) {
            return Err(CardwallError::TokenNotFound {
                id: token.id.to_string(),
            });
        }
        let user = ctx.read_user(&self.actor).await?;
        if !user.email.eq_ignore_ascii_case(&token.email) {
            return Err(CardwallError::permission_denied(&self.actor, "accept invitation"));
        }

        board.pending.remove(&token.id);
        board.add_member(user.username.clone(), Role::Member);
        ctx.write_board(&board).await?;
        ctx.delete_token_file(&token.id).await?;

        ActionLog::for_board(board.id.clone())
            .add_history(
                ctx,
                &self.actor,
                "board_accept",
                payload(json!({
                    "user_id": user.username,
                    "user": display_name(ctx, &user.username).await?,
                    "board": board.title,
                })),
            )
            .await?;
        board_view(ctx, &board).await
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for AcceptInvitation {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();
        let result = self.run(ctx).await;
        logged(self, &self.actor, start, result)
    }
}
