//! SetCardCover and RemoveCardCover commands

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
    registry.register_template("card_cover", "Cover of card \"{{ card }}\" has been {{ state }}");
}

/// Upload an image and make it the card's cover
#[operation(verb = "cover", noun = "card", description = "Set a card's cover image")]
#[derive(Debug, Deserialize, Serialize)]
pub struct SetCardCover {
    /// The acting user (must be a board member)
    pub actor: UserId,
    /// The card
    pub id: CardId,
    /// Original file name
    pub name: String,
    /// File content
    #[serde(default, skip_serializing)]
    pub data: Vec<u8>,
}

impl SetCardCover {
    pub fn new(
        actor: impl Into<UserId>,
        id: impl Into<CardId>,
        name: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            actor: actor.into(),
            id: id.into(),
            name: name.into(),
            data,
        }
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let (_board, mut card) =
            authorize_card(ctx, &self.id, &self.actor, Permission::Edit).await?;
        if self.data.is_empty() {
            return Err(CardwallError::invalid_value("data", "cover image is empty"));
        }

        let asset = ctx.assets().put(&self.name, &self.data).await?;
        if let Some(previous) = card.cover.replace(asset) {
            ctx.assets().remove(&previous).await?;
        }
        ctx.write_card(&card).await?;

        card_log(&card)
            .add_history(
                ctx,
                &self.actor,
                "card_cover",
                payload(json!({ "card": card.title, "state": "set" })),
            )
            .await?;
        Ok(json!({ "id": card.id, "cover": card.cover }))
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for SetCardCover {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();
        let result = self.run(ctx).await;
        logged(self, &self.actor, start, result)
    }
}

/// Remove a card's cover and release the image
#[operation(verb = "uncover", noun = "card", description = "Remove a card's cover image")]
#[derive(Debug, Deserialize, Serialize)]
pub struct RemoveCardCover {
    /// The acting user (must be a board member)
    pub actor: UserId,
    /// The card
    pub id: CardId,
}

impl RemoveCardCover {
    pub fn new(actor: impl Into<UserId>, id: impl Into<CardId>) -> Self {
        Self {
            actor: actor.into(),
            id: id.into(),
        }
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let (_board, mut card) =
            authorize_card(ctx, &self.id, &self.actor, Permission::Edit).await?;
        let Some(cover) = card.cover.take() else {
            return Err(CardwallError::invalid_operation("card has no cover"));
        };
        ctx.assets().remove(&cover).await?;
        ctx.write_card(&card).await?;

        card_log(&card)
            .add_history(
                ctx,
                &self.actor,
                "card_cover",
                payload(json!({ "card": card.title, "state": "removed" })),
            )
            .await?;
        Ok(json!({ "id": card.id, "cover": null }))
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for RemoveCardCover {
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
    use crate::card::AddCard;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_replace_and_remove_cover() {
        let temp = TempDir::new().unwrap();
        let ctx = CardwallContext::new(temp.path().join(".cardwall"));
        let board = CreateBoard::new("alice", "Covers")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let card = AddCard::new("alice", board["columns"][0]["id"].as_str().unwrap(), "Pretty")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let id = card["id"].as_str().unwrap();

        let first = SetCardCover::new("alice", id, "a.png", b"a".to_vec())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let first_asset = first["cover"].as_str().unwrap().to_string();

        let second = SetCardCover::new("alice", id, "b.png", b"b".to_vec())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let second_asset = second["cover"].as_str().unwrap().to_string();
        assert!(!ctx.assets().exists(&first_asset.as_str().into()).await);

        RemoveCardCover::new("alice", id)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert!(!ctx.assets().exists(&second_asset.as_str().into()).await);

        let again = RemoveCardCover::new("alice", id).execute(&ctx).await.into_result();
        assert!(matches!(again, Err(CardwallError::InvalidOperation { .. })));
    }
}
