//! MoveCard and ArchiveCard commands

use super::{authorize_card, card_log, place_card, reindex_column};
use crate::action_log::payload;
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::extension::CardView;
use crate::processor::logged;
use crate::security::Permission;
use crate::types::{CardId, ColumnId, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

/// Move a card to another column or position
#[operation(
    verb = "move",
    noun = "card",
    description = "Move a card to another column or position"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct MoveCard {
    /// The acting user (must be a board member)
    pub actor: UserId,
    /// The card
    pub id: CardId,
    /// Destination column, on the same board
    pub column: ColumnId,
    /// Position in the destination, appended when absent
    pub index: Option<usize>,
}

impl MoveCard {
    pub fn new(
        actor: impl Into<UserId>,
        id: impl Into<CardId>,
        column: impl Into<ColumnId>,
    ) -> Self {
        Self {
            actor: actor.into(),
            id: id.into(),
            column: column.into(),
            index: None,
        }
    }

    pub fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let (board, mut card) = authorize_card(ctx, &self.id, &self.actor, Permission::Edit).await?;
        let target = ctx.read_column(&self.column).await?;
        if target.board != board.id {
            return Err(CardwallError::invalid_operation(
                "cards can only move within their board",
            ));
        }

        let source = ctx.read_column(&card.column).await?;
        let same_column = source.id == target.id;
        if !same_column {
            let count = ctx.read_column_cards(&target.id).await?.len();
            if !target.accepts(count) {
                return Err(CardwallError::invalid_operation(format!(
                    "column \"{}\" is full",
                    target.title
                )));
            }
        }

        card.archived = target.archive;
        place_card(ctx, &mut card, &target.id, self.index).await?;
        if !same_column {
            reindex_column(ctx, &source.id).await?;
        }

        let kind = if target.archive && !source.archive {
            "card_archive"
        } else {
            "card_move"
        };
        card_log(&card)
            .add_history(
                ctx,
                &self.actor,
                kind,
                payload(json!({ "card": card.title, "from": source.title, "to": target.title })),
            )
            .await?;

        info!(
            card = %card.id,
            from = %source.id,
            to = %target.id,
            index = card.index,
            "moved card",
        );
        Ok(CardView::new(ctx, card).render())
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for MoveCard {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();
        let result = self.run(ctx).await;
        logged(self, &self.actor, start, result)
    }
}

/// Move a card to its board's archive column
#[operation(verb = "archive", noun = "card", description = "Archive a card")]
#[derive(Debug, Deserialize, Serialize)]
pub struct ArchiveCard {
    /// The acting user (must be a board member)
    pub actor: UserId,
    /// The card
    pub id: CardId,
}

impl ArchiveCard {
    pub fn new(actor: impl Into<UserId>, id: impl Into<CardId>) -> Self {
        Self {
            actor: actor.into(),
            id: id.into(),
        }
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for ArchiveCard {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();
        let result: Result<Value> = async {
            let card = ctx.read_card(&self.id).await?;
            if card.archived {
                return Err(CardwallError::invalid_operation("card is already archived"));
            }
            let board = ctx.read_board(&card.board).await?;
            MoveCard::new(self.actor.clone(), self.id.clone(), board.archive_column)
                .run(ctx)
                .await
        }
        .await;
        logged(self, &self.actor, start, result)
    }
}
