//! GetCard command

use super::authorize_card;
use crate::context::CardwallContext;
use crate::error::CardwallError;
use crate::extension::CardView;
use crate::processor::unlogged;
use crate::security::Permission;
use crate::types::{CardId, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Get a card rendered through its extensions
#[operation(verb = "get", noun = "card", description = "Retrieve a card")]
#[derive(Debug, Deserialize, Serialize)]
pub struct GetCard {
    /// The viewing user
    pub viewer: UserId,
    /// The card
    pub id: CardId,
}

impl GetCard {
    pub fn new(viewer: impl Into<UserId>, id: impl Into<CardId>) -> Self {
        Self {
            viewer: viewer.into(),
            id: id.into(),
        }
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for GetCard {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let result = authorize_card(ctx, &self.id, &self.viewer, Permission::View)
            .await
            .map(|(_, card)| CardView::new(ctx, card).render());
        unlogged(result)
    }
}
