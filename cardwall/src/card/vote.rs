//! ToggleVote command

use super::{authorize_card, card_log};
use crate::action_log::{payload, EventRegistry};
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::logged;
use crate::security::Permission;
use crate::types::{CardId, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub(super) fn register_events(registry: &mut EventRegistry) {
    registry.register_template(
        "card_vote",
        "User {{ user }} has {{ vote }} a vote on card \"{{ card }}\"",
    );
}

/// Vote for a card, or take the vote back
#[operation(verb = "vote", noun = "card", description = "Toggle the actor's vote on a card")]
#[derive(Debug, Deserialize, Serialize)]
pub struct ToggleVote {
    /// The voting user
    pub actor: UserId,
    /// The card
    pub id: CardId,
}

impl ToggleVote {
    pub fn new(actor: impl Into<UserId>, id: impl Into<CardId>) -> Self {
        Self {
            actor: actor.into(),
            id: id.into(),
        }
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let (_board, mut card) =
            authorize_card(ctx, &self.id, &self.actor, Permission::Vote).await?;

        let voted = if card.votes.remove(&self.actor) {
            false
        } else {
            card.votes.insert(self.actor.clone());
            true
        };
        ctx.write_card(&card).await?;

        let vote = if voted { "added" } else { "removed" };
        card_log(&card)
            .add_history(
                ctx,
                &self.actor,
                "card_vote",
                payload(json!({ "user": self.actor, "vote": vote, "card": card.title })),
            )
            .await?;
        Ok(json!({ "id": card.id, "voted": voted, "votes": card.votes.len() }))
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for ToggleVote {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();
        let result = self.run(ctx).await;
        logged(self, &self.actor, start, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{CreateBoard, SetBoardAccess};
    use crate::card::AddCard;
    use crate::types::Access;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_toggle_vote() {
        let temp = TempDir::new().unwrap();
        let ctx = CardwallContext::new(temp.path().join(".cardwall"));
        let board = CreateBoard::new("alice", "Votes")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let card = AddCard::new("alice", board["columns"][0]["id"].as_str().unwrap(), "Idea")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let id = card["id"].as_str().unwrap();

        let first = ToggleVote::new("alice", id).execute(&ctx).await.into_result().unwrap();
        assert_eq!(first["voted"], true);
        assert_eq!(first["votes"], 1);

        let second = ToggleVote::new("alice", id).execute(&ctx).await.into_result().unwrap();
        assert_eq!(second["voted"], false);
        assert_eq!(second["votes"], 0);

        let outsider = ToggleVote::new("mallory", id).execute(&ctx).await.into_result();
        assert!(matches!(outsider, Err(CardwallError::PermissionDenied { .. })));

        SetBoardAccess::new("alice", board["id"].as_str().unwrap())
            .with_votes(Access::Off)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let closed = ToggleVote::new("alice", id).execute(&ctx).await.into_result();
        assert!(matches!(closed, Err(CardwallError::PermissionDenied { .. })));
    }
}
