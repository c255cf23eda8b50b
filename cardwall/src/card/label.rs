//! ToggleCardLabel command

use super::{authorize_card, card_log};
use crate::action_log::{payload, EventRegistry};
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::logged;
use crate::security::Permission;
use crate::types::{CardId, LabelId, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub(super) fn register_events(registry: &mut EventRegistry) {
    registry.register_template(
        "card_add_label",
        "Label \"{{ label }}\" has been added to card \"{{ card }}\"",
    );
    registry.register_template(
        "card_remove_label",
        "Label \"{{ label }}\" has been removed from card \"{{ card }}\"",
    );
}

/// Put a board label on a card, or take it off
#[operation(
    verb = "label",
    noun = "card",
    description = "Toggle a board label on a card"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct ToggleCardLabel {
    /// The acting user (must be a board member)
    pub actor: UserId,
    /// The card
    pub id: CardId,
    /// The board label
    pub label: LabelId,
}

impl ToggleCardLabel {
    pub fn new(actor: impl Into<UserId>, id: impl Into<CardId>, label: impl Into<LabelId>) -> Self {
        Self {
            actor: actor.into(),
            id: id.into(),
            label: label.into(),
        }
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let (board, mut card) = authorize_card(ctx, &self.id, &self.actor, Permission::Edit).await?;
        let label = board
            .find_label(&self.label)
            .ok_or_else(|| CardwallError::LabelNotFound {
                id: self.label.to_string(),
            })?;

        let added = if card.labels.remove(&label.id) {
            false
        } else {
            card.labels.insert(label.id.clone());
            true
        };
        ctx.write_card(&card).await?;

        let kind = if added { "card_add_label" } else { "card_remove_label" };
        card_log(&card)
            .add_history(
                ctx,
                &self.actor,
                kind,
                payload(json!({ "label": label.title, "card": card.title })),
            )
            .await?;
        Ok(json!({ "id": card.id, "label": label.id, "added": added, "labels": card.labels }))
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for ToggleCardLabel {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();
        let result = self.run(ctx).await;
        logged(self, &self.actor, start, result)
    }
}
