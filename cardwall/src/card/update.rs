//! UpdateCard command

use super::{authorize_card, card_log};
use crate::action_log::payload;
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::extension::CardView;
use crate::processor::logged;
use crate::security::Permission;
use crate::types::{CardId, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Rename a card or change its description
#[operation(
    verb = "update",
    noun = "card",
    description = "Change a card's title or description"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateCard {
    /// The acting user (must be a board member)
    pub actor: UserId,
    /// The card
    pub id: CardId,
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
}

impl UpdateCard {
    pub fn new(actor: impl Into<UserId>, id: impl Into<CardId>) -> Self {
        Self {
            actor: actor.into(),
            id: id.into(),
            title: None,
            description: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let (_board, mut card) =
            authorize_card(ctx, &self.id, &self.actor, Permission::Edit).await?;
        let mut events = Vec::new();

        if let Some(title) = &self.title {
            let title = title.trim();
            if title.is_empty() {
                return Err(CardwallError::invalid_value("title", "must not be empty"));
            }
            if title != card.title {
                events.push(("card_title", json!({ "from": card.title, "to": title })));
                card.title = title.to_string();
            }
        }
        if let Some(description) = &self.description {
            if *description != card.description {
                card.description = description.clone();
                events.push(("card_description", json!({ "card": card.title })));
            }
        }

        ctx.write_card(&card).await?;
        let log = card_log(&card);
        for (kind, values) in events {
            log.add_history(ctx, &self.actor, kind, payload(values)).await?;
        }
        Ok(CardView::new(ctx, card).render())
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for UpdateCard {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();
        let result = self.run(ctx).await;
        logged(self, &self.actor, start, result)
    }
}
