//! AddCard command

use super::{card_log, place_card};
use crate::action_log::payload;
use crate::column::authorize_column;
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::extension::CardView;
use crate::processor::logged;
use crate::security::Permission;
use crate::types::{Card, ColumnId, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

/// Add a card to a column
#[operation(verb = "add", noun = "card", description = "Create a new card in a column")]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddCard {
    /// The acting user (must be a board member)
    pub actor: UserId,
    /// The column receiving the card
    pub column: ColumnId,
    /// The card title
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Position in the column, appended when absent
    pub index: Option<usize>,
}

impl AddCard {
    pub fn new(
        actor: impl Into<UserId>,
        column: impl Into<ColumnId>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            actor: actor.into(),
            column: column.into(),
            title: title.into(),
            description: None,
            index: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    async fn run(&self, ctx: &CardwallContext, title: &str) -> Result<Value> {
        let (_board, column) =
            authorize_column(ctx, &self.column, &self.actor, Permission::Edit).await?;
        if column.archive {
            return Err(CardwallError::invalid_operation(
                "cards cannot be created in the archive column",
            ));
        }
        let count = ctx.read_column_cards(&column.id).await?.len();
        if !column.accepts(count) {
            return Err(CardwallError::invalid_operation(format!(
                "column \"{}\" is full",
                column.title
            )));
        }

        let mut card = Card::new(column.board.clone(), column.id.clone(), title);
        if let Some(description) = &self.description {
            card.description = description.clone();
        }
        place_card(ctx, &mut card, &column.id, self.index).await?;

        card_log(&card)
            .add_history(
                ctx,
                &self.actor,
                "card_create",
                payload(json!({ "card": card.title, "column": column.title })),
            )
            .await?;

        info!(card = %card.id, column = %column.id, index = card.index, "added card");
        let mut value = CardView::new(ctx, card).render();
        value["created"] = json!(true);
        Ok(value)
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for AddCard {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();

        let title = self.title.trim();
        if title.is_empty() {
            debug!(column = %self.column, "refusing card with empty title");
            return ExecutionResult::Unlogged {
                value: json!({ "created": false }),
            };
        }

        let result = self.run(ctx, title).await;
        logged(self, &self.actor, start, result)
    }
}
