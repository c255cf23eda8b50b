//! Card members: assignment, available users and favorites

use super::{authorize_card, card_log};
use crate::action_log::{payload, EventRegistry};
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::member::display_name;
use crate::processor::{logged, unlogged};
use crate::security::Permission;
use crate::types::{Board, Card, CardId, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

pub(super) fn register_events(registry: &mut EventRegistry) {
    registry.register_template(
        "card_add_member",
        "User {{ user }} has been assigned to card \"{{ card }}\"",
    );
    registry.register_template(
        "card_remove_member",
        "User {{ user }} has been unassigned from card \"{{ card }}\"",
    );
}

/// Users who can be put on `card`: board members and managers, plus
/// registered users matching a pending invitation, minus current card members.
pub async fn available_users(
    ctx: &CardwallContext,
    board: &Board,
    card: &Card,
) -> Result<BTreeSet<UserId>> {
    let mut users = board.all_members();
    for token in ctx.read_board_tokens(board).await? {
        if let Some(user) = ctx.find_user_by_email(&token.email).await? {
            users.insert(user.username);
        }
    }
    users.retain(|user| !card.has_member(user));
    Ok(users)
}

/// Board members not on `card`, ranked by how many open cards of the board
/// they are assigned to (most first, then by username), at most `limit`.
pub async fn favorites(
    ctx: &CardwallContext,
    board: &Board,
    card: &Card,
    limit: usize,
) -> Result<Vec<(UserId, usize)>> {
    let mut counts: BTreeMap<UserId, usize> = board
        .all_members()
        .into_iter()
        .filter(|user| !card.has_member(user))
        .map(|user| (user, 0))
        .collect();

    for other in ctx.read_board_cards(&board.id).await? {
        if other.archived {
            continue;
        }
        for member in &other.members {
            if let Some(count) = counts.get_mut(member) {
                *count += 1;
            }
        }
    }

    let mut ranked: Vec<(UserId, usize)> = counts.into_iter().collect();
    ranked.sort_by(|(a_user, a_count), (b_user, b_count)| {
        b_count.cmp(a_count).then_with(|| a_user.cmp(b_user))
    });
    ranked.truncate(limit);
    Ok(ranked)
}

/// Assign a user to a card
#[operation(
    verb = "assign",
    noun = "card",
    description = "Assign a user to a card by username or email"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddCardMember {
    /// The acting user (must be a board member)
    pub actor: UserId,
    /// The card
    pub id: CardId,
    /// Username of the candidate
    pub user: Option<UserId>,
    /// Email of the candidate, used when no username is given
    pub email: Option<String>,
}

impl AddCardMember {
    pub fn new(actor: impl Into<UserId>, id: impl Into<CardId>, user: impl Into<UserId>) -> Self {
        Self {
            actor: actor.into(),
            id: id.into(),
            user: Some(user.into()),
            email: None,
        }
    }

    pub fn by_email(
        actor: impl Into<UserId>,
        id: impl Into<CardId>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            actor: actor.into(),
            id: id.into(),
            user: None,
            email: Some(email.into()),
        }
    }

    async fn candidate(&self, ctx: &CardwallContext) -> Result<Option<UserId>> {
        match (&self.user, &self.email) {
            (Some(user), _) => Ok(Some(user.clone())),
            (None, Some(email)) => Ok(ctx.find_user_by_email(email).await?.map(|u| u.username)),
            (None, None) => Err(CardwallError::missing_field("user")),
        }
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for AddCardMember {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();

        let prepared: Result<Option<(Card, UserId)>> = async {
            let (board, card) = authorize_card(ctx, &self.id, &self.actor, Permission::Edit).await?;
            let Some(candidate) = self.candidate(ctx).await? else {
                return Ok(None);
            };
            let available = available_users(ctx, &board, &card).await?;
            Ok(available.contains(&candidate).then_some((card, candidate)))
        }
        .await;

        let (mut card, user) = match prepared {
            Ok(Some(found)) => found,
            Ok(None) => {
                debug!(card = %self.id, "candidate not available for card");
                return ExecutionResult::Unlogged {
                    value: json!({ "id": self.id, "added": false }),
                };
            }
            Err(error) => return logged(self, &self.actor, start, Err(error)),
        };

        let result: Result<Value> = async {
            card.members.push(user.clone());
            ctx.write_card(&card).await?;

            let values = json!({
                "user_id": user,
                "user": display_name(ctx, &user).await?,
                "card": card.title,
            });
            card_log(&card)
                .add_history(ctx, &self.actor, "card_add_member", payload(values))
                .await?;
            Ok(json!({ "id": card.id, "added": true, "user": user, "members": card.members }))
        }
        .await;

        logged(self, &self.actor, start, result)
    }
}

/// Unassign a user from a card
#[operation(verb = "unassign", noun = "card", description = "Remove a user from a card")]
#[derive(Debug, Deserialize, Serialize)]
pub struct RemoveCardMember {
    /// The acting user (must be a board member)
    pub actor: UserId,
    /// The card
    pub id: CardId,
    /// Username to remove
    pub user: UserId,
}

impl RemoveCardMember {
    pub fn new(actor: impl Into<UserId>, id: impl Into<CardId>, user: impl Into<UserId>) -> Self {
        Self {
            actor: actor.into(),
            id: id.into(),
            user: user.into(),
        }
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for RemoveCardMember {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();

        let prepared: Result<Card> = async {
            let (_board, card) =
                authorize_card(ctx, &self.id, &self.actor, Permission::Edit).await?;
            // unknown users are an error, not a silent no-op
            ctx.read_user(&self.user).await?;
            Ok(card)
        }
        .await;

        let mut card = match prepared {
            Ok(card) => card,
            Err(error) => return logged(self, &self.actor, start, Err(error)),
        };
        if !card.remove_member(&self.user) {
            return ExecutionResult::Unlogged {
                value: json!({ "id": self.id, "removed": false }),
            };
        }

        let result: Result<Value> = async {
            ctx.write_card(&card).await?;
            let values = json!({
                "user_id": self.user,
                "user": display_name(ctx, &self.user).await?,
                "card": card.title,
            });
            card_log(&card)
                .add_history(ctx, &self.actor, "card_remove_member", payload(values))
                .await?;
            Ok(json!({ "id": card.id, "removed": true, "members": card.members }))
        }
        .await;

        logged(self, &self.actor, start, result)
    }
}

/// Users who could be assigned to a card
#[operation(
    verb = "available",
    noun = "card",
    description = "List users who can be assigned to a card"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct GetAvailableUsers {
    /// The viewing user
    pub viewer: UserId,
    /// The card
    pub id: CardId,
}

impl GetAvailableUsers {
    pub fn new(viewer: impl Into<UserId>, id: impl Into<CardId>) -> Self {
        Self {
            viewer: viewer.into(),
            id: id.into(),
        }
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for GetAvailableUsers {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let result: Result<Value> = async {
            let (board, card) =
                authorize_card(ctx, &self.id, &self.viewer, Permission::View).await?;
            let users = available_users(ctx, &board, &card).await?;
            Ok(json!({ "users": users, "count": users.len() }))
        }
        .await;
        unlogged(result)
    }
}

/// Most likely assignees for a card
#[operation(
    verb = "favorites",
    noun = "card",
    description = "Suggest board members to assign, most active first"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct GetFavorites {
    /// The viewing user
    pub viewer: UserId,
    /// The card
    pub id: CardId,
}

impl GetFavorites {
    pub fn new(viewer: impl Into<UserId>, id: impl Into<CardId>) -> Self {
        Self {
            viewer: viewer.into(),
            id: id.into(),
        }
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for GetFavorites {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let result: Result<Value> = async {
            let (board, card) =
                authorize_card(ctx, &self.id, &self.viewer, Permission::View).await?;
            let ranked = favorites(ctx, &board, &card, ctx.config().favorites_limit).await?;
            let favorites: Vec<Value> = ranked
                .into_iter()
                .map(|(user, count)| json!({ "user": user, "cards": count }))
                .collect();
            Ok(json!({ "favorites": favorites }))
        }
        .await;
        unlogged(result)
    }
}
