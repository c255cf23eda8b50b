//! SetCardDueDate command

use super::{authorize_card, card_log};
use crate::action_log::{payload, EventRegistry};
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::logged;
use crate::security::Permission;
use crate::types::{CardId, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub(super) fn register_events(registry: &mut EventRegistry) {
    registry.register_template(
        "card_due_date",
        "Due date of card \"{{ card }}\" has been changed from ({{ from }}) to ({{ to }})",
    );
}

/// Set or clear a card's due date
#[operation(verb = "due", noun = "card", description = "Set or clear a card's due date")]
#[derive(Debug, Deserialize, Serialize)]
pub struct SetCardDueDate {
    /// The acting user (must be a board member)
    pub actor: UserId,
    /// The card
    pub id: CardId,
    /// New due date (YYYY-MM-DD); clears the date when absent
    pub due_date: Option<NaiveDate>,
}

impl SetCardDueDate {
    pub fn new(
        actor: impl Into<UserId>,
        id: impl Into<CardId>,
        due_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            actor: actor.into(),
            id: id.into(),
            due_date,
        }
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let (_board, mut card) =
            authorize_card(ctx, &self.id, &self.actor, Permission::Edit).await?;
        if card.due_date == self.due_date {
            return Ok(json!({ "id": card.id, "due_date": card.due_date, "changed": false }));
        }

        let values = json!({ "from": card.due_date, "to": self.due_date, "card": card.title });
        card.due_date = self.due_date;
        ctx.write_card(&card).await?;

        card_log(&card)
            .add_history(ctx, &self.actor, "card_due_date", payload(values))
            .await?;
        Ok(json!({ "id": card.id, "due_date": card.due_date, "changed": true }))
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for SetCardDueDate {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();
        let result = self.run(ctx).await;
        logged(self, &self.actor, start, result)
    }
}
