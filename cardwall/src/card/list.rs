//! ListCards command

use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::unlogged;
use crate::security::{authorize, Permission};
use crate::types::{BoardId, ColumnId, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// List the cards of a board, column by column
#[operation(verb = "list", noun = "cards", description = "List cards of a board or column")]
#[derive(Debug, Deserialize, Serialize)]
pub struct ListCards {
    /// The viewing user
    pub viewer: UserId,
    /// The board
    pub board: BoardId,
    /// Restrict to one column
    pub column: Option<ColumnId>,
    /// Include archived cards
    #[serde(default)]
    pub include_archived: bool,
    /// Only cards assigned to this user
    pub member: Option<UserId>,
}

impl ListCards {
    pub fn new(viewer: impl Into<UserId>, board: impl Into<BoardId>) -> Self {
        Self {
            viewer: viewer.into(),
            board: board.into(),
            column: None,
            include_archived: false,
            member: None,
        }
    }

    pub fn in_column(mut self, column: impl Into<ColumnId>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn with_archived(mut self) -> Self {
        self.include_archived = true;
        self
    }

    pub fn assigned_to(mut self, member: impl Into<UserId>) -> Self {
        self.member = Some(member.into());
        self
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let board = authorize(ctx, &self.board, &self.viewer, Permission::View).await?;
        let today = Utc::now().date_naive();

        let mut cards = ctx.read_board_cards(&board.id).await?;
        cards.retain(|card| {
            self.column.as_ref().map_or(true, |c| card.column == *c)
                && (self.include_archived || !card.archived)
                && self.member.as_ref().map_or(true, |m| card.has_member(m))
        });
        let position = |column: &ColumnId| board.columns.iter().position(|c| c == column);
        cards.sort_by_key(|card| (position(&card.column), card.index));

        let cards: Vec<Value> = cards
            .iter()
            .map(|card| {
                json!({
                    "id": card.id,
                    "title": card.title,
                    "column": card.column,
                    "index": card.index,
                    "archived": card.archived,
                    "due_date": card.due_date,
                    "overdue": card.is_overdue(today),
                    "members": card.members,
                })
            })
            .collect();
        Ok(json!({ "cards": cards, "count": cards.len() }))
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for ListCards {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        unlogged(self.run(ctx).await)
    }
}
