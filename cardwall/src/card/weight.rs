//! SetCardWeight command

use super::{authorize_card, card_log};
use crate::action_log::payload;
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::logged;
use crate::security::Permission;
use crate::types::{CardId, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Set or clear a card's weight
#[operation(
    verb = "weight",
    noun = "card",
    description = "Set or clear a card's weight (board weighting must be on)"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct SetCardWeight {
    /// The acting user (must be a board member)
    pub actor: UserId,
    /// The card
    pub id: CardId,
    /// New weight; clears the weight when absent
    pub weight: Option<i64>,
}

impl SetCardWeight {
    pub fn new(actor: impl Into<UserId>, id: impl Into<CardId>, weight: Option<i64>) -> Self {
        Self {
            actor: actor.into(),
            id: id.into(),
            weight,
        }
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let (board, mut card) = authorize_card(ctx, &self.id, &self.actor, Permission::Edit).await?;
        if !board.weighting_cards {
            return Err(CardwallError::invalid_value(
                "weight",
                "card weighting is off for this board",
            ));
        }

        let values = json!({ "from": card.weight, "to": self.weight, "card": card.title });
        card.weight = self.weight;
        ctx.write_card(&card).await?;

        card_log(&card)
            .add_history(ctx, &self.actor, "card_weight", payload(values))
            .await?;
        Ok(json!({ "id": card.id, "weight": card.weight }))
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for SetCardWeight {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();
        let result = self.run(ctx).await;
        logged(self, &self.actor, start, result)
    }
}
