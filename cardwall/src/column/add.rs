//! AddColumn command

use crate::action_log::{payload, ActionLog};
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::logged;
use crate::security::{authorize, Permission};
use crate::types::{BoardId, Column, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

/// Add a column to a board
#[operation(
    verb = "add",
    noun = "column",
    description = "Add a column to a board"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddColumn {
    /// The acting user (must be a board member)
    pub actor: UserId,
    /// The board receiving the column
    pub board: BoardId,
    /// The column title
    pub title: String,
    /// Position among the board's columns, appended when absent
    pub index: Option<usize>,
    /// Maximum number of cards
    pub nb_max_cards: Option<usize>,
}

impl AddColumn {
    pub fn new(
        actor: impl Into<UserId>,
        board: impl Into<BoardId>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            actor: actor.into(),
            board: board.into(),
            title: title.into(),
            index: None,
            nb_max_cards: None,
        }
    }

    pub fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_limit(mut self, nb_max_cards: usize) -> Self {
        self.nb_max_cards = Some(nb_max_cards);
        self
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for AddColumn {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();

        let title = self.title.trim();
        if title.is_empty() {
            debug!(board = %self.board, "refusing column with empty title");
            return ExecutionResult::Unlogged {
                value: json!({ "created": false }),
            };
        }

        let result: Result<Value> = async {
            let mut board = authorize(ctx, &self.board, &self.actor, Permission::Edit).await?;

            let mut column = Column::new(board.id.clone(), title);
            column.nb_max_cards = self.nb_max_cards.filter(|&max| max > 0);
            let index = self.index.unwrap_or(usize::MAX).min(board.count_columns());
            board.insert_column(index, column.id.clone());

            ctx.write_column(&column).await?;
            ctx.write_board(&board).await?;

            ActionLog::for_board(board.id.clone())
                .add_history(
                    ctx,
                    &self.actor,
                    "column_create",
                    payload(json!({ "column": column.title })),
                )
                .await?;

            info!(board = %board.id, column = %column.id, index, "added column");
            Ok(json!({
                "created": true,
                "id": column.id,
                "title": column.title,
                "index": index,
                "nb_max_cards": column.nb_max_cards,
            }))
        }
        .await;

        logged(self, &self.actor, start, result)
    }
}
