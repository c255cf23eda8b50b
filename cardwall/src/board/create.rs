//! CreateBoard command

use super::{copy_cards, mirror_columns, mirror_labels, write_scaffold};
use crate::action_log::{payload, ActionLog};
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::Pretty;
use crate::processor::logged;
use crate::security::{require, Permission};
use crate::types::{Board, BoardId, Column, Label, Role, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

/// Create a board, optionally from a template
#[operation(
    verb = "create",
    noun = "board",
    description = "Create a board with default columns, or from a template"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct CreateBoard {
    /// The creating user; becomes the board's manager
    pub actor: UserId,
    /// The board title
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Template board to copy columns, labels and cards from
    pub template: Option<BoardId>,
}

impl CreateBoard {
    pub fn new(actor: impl Into<UserId>, title: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            title: title.into(),
            description: None,
            template: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn from_template(mut self, template: impl Into<BoardId>) -> Self {
        self.template = Some(template.into());
        self
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(CardwallError::invalid_value("title", "must not be empty"));
        }

        let mut board = Board::new(title);
        if let Some(description) = &self.description {
            board.description = description.clone();
        }
        board.add_member(self.actor.clone(), Role::Manager);

        match &self.template {
            Some(template_id) => {
                let template = ctx.read_board(template_id).await?;
                if !template.is_template {
                    return Err(CardwallError::invalid_operation(format!(
                        "board {} is not a template",
                        template_id
                    )));
                }
                require(&template, &self.actor, Permission::View)?;

                board.labels = mirror_labels(&template);
                board.weighting_cards = template.weighting_cards;
                if self.description.is_none() {
                    board.description = template.description.clone();
                }

                let pairs = mirror_columns(ctx, &template, &board).await?;
                let columns: Vec<Column> = pairs.iter().map(|(_, to)| to.clone()).collect();
                write_scaffold(ctx, &mut board, &columns).await?;
                copy_cards(ctx, &template, &board, &pairs).await?;
            }
            None => {
                let config = ctx.config();
                board.labels = config
                    .default_labels
                    .iter()
                    .map(|title| Label::new(title.clone()))
                    .collect();
                let columns: Vec<Column> = config
                    .default_columns
                    .iter()
                    .map(|title| Column::new(board.id.clone(), title.clone()))
                    .collect();
                write_scaffold(ctx, &mut board, &columns).await?;
            }
        }

        ActionLog::for_board(board.id.clone())
            .add_history(ctx, &self.actor, "board_create", payload(json!({ "board": board.title })))
            .await?;

        info!(board = %board.id, uri = %board.uri, actor = %self.actor, "created board");
        tracing::debug!("{}", Pretty(&board));

        let board = ctx.read_board(&board.id).await?;
        super::board_view(ctx, &board).await
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for CreateBoard {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();
        let result = self.run(ctx).await;
        logged(self, &self.actor, start, result)
    }
}
