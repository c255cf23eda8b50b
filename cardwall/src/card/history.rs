//! GetCardHistory command

use super::{authorize_card, card_log};
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::unlogged;
use crate::security::Permission;
use crate::types::{CardId, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Rendered history of a single card, newest first
#[operation(verb = "history", noun = "card", description = "Show what happened to a card")]
#[derive(Debug, Deserialize, Serialize)]
pub struct GetCardHistory {
    /// The viewing user
    pub viewer: UserId,
    /// The card
    pub id: CardId,
    /// Maximum number of entries
    pub limit: Option<usize>,
}

impl GetCardHistory {
    pub fn new(viewer: impl Into<UserId>, id: impl Into<CardId>) -> Self {
        Self {
            viewer: viewer.into(),
            id: id.into(),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for GetCardHistory {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let result: Result<Value> = async {
            let (_board, card) =
                authorize_card(ctx, &self.id, &self.viewer, Permission::View).await?;
            let entries = card_log(&card).render(ctx, self.limit).await?;
            Ok(json!({ "card": card.id, "count": entries.len(), "entries": entries }))
        }
        .await;
        unlogged(result)
    }
}
