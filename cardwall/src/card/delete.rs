//! DeleteCard command

use super::{authorize_card, card_log, reindex_column};
use crate::action_log::payload;
use crate::board::purge_card;
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::logged;
use crate::security::Permission;
use crate::types::{CardId, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

/// Delete a card; every extension releases what it owns first
#[operation(verb = "delete", noun = "card", description = "Delete a card")]
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteCard {
    /// The acting user (must be a board member)
    pub actor: UserId,
    /// The card
    pub id: CardId,
}

impl DeleteCard {
    pub fn new(actor: impl Into<UserId>, id: impl Into<CardId>) -> Self {
        Self {
            actor: actor.into(),
            id: id.into(),
        }
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let (_board, card) = authorize_card(ctx, &self.id, &self.actor, Permission::Edit).await?;
        let log = card_log(&card);
        let column = card.column.clone();

        let card = purge_card(ctx, card).await?;
        reindex_column(ctx, &column).await?;

        log.add_history(ctx, &self.actor, "card_delete", payload(json!({ "card": card.title })))
            .await?;

        info!(card = %card.id, "deleted card");
        Ok(json!({ "deleted": true, "id": card.id }))
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for DeleteCard {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();
        let result = self.run(ctx).await;
        logged(self, &self.actor, start, result)
    }
}
