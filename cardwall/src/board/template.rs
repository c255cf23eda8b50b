//! Board templates: save a board as a template, install the builtin ones

use super::{board_view, copy_cards, mirror_columns, mirror_labels, write_scaffold};
use crate::action_log::{payload, ActionLog};
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::logged;
use crate::security::{authorize, Permission};
use crate::types::{Board, BoardId, Column, Label, Role, UserId, Visibility};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

/// Title of the builtin template without columns
pub const EMPTY_TEMPLATE: &str = "Empty board";
/// Title of the builtin to-do template
pub const TODO_TEMPLATE: &str = "Todo";

const TODO_COLUMNS: [&str; 2] = ["To Do", "Done"];

/// Save a board as a template
#[operation(
    verb = "save",
    noun = "template",
    description = "Save a board as a template (columns, labels and cards, without people)"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct SaveAsTemplate {
    /// The acting user (must be a board member)
    pub actor: UserId,
    /// The source board
    pub board: BoardId,
    /// Template title
    pub title: String,
    /// Template description
    pub description: Option<String>,
    /// Public template visible to every user
    #[serde(default)]
    pub shared: bool,
}

impl SaveAsTemplate {
    pub fn new(
        actor: impl Into<UserId>,
        board: impl Into<BoardId>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            actor: actor.into(),
            board: board.into(),
            title: title.into(),
            description: None,
            shared: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn shared(mut self, shared: bool) -> Self {
        self.shared = shared;
        self
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let source = authorize(ctx, &self.board, &self.actor, Permission::Edit).await?;
        let title = self.title.trim();
        if title.is_empty() {
            return Err(CardwallError::invalid_value("title", "must not be empty"));
        }

        let mut template = Board::new(title);
        template.is_template = true;
        template.description = self.description.clone().unwrap_or_default();
        template.visibility = if self.shared {
            Visibility::Public
        } else {
            Visibility::Private
        };
        template.weighting_cards = source.weighting_cards;
        template.labels = mirror_labels(&source);
        template.add_member(self.actor.clone(), Role::Manager);

        let pairs = mirror_columns(ctx, &source, &template).await?;
        let columns: Vec<Column> = pairs.iter().map(|(_, to)| to.clone()).collect();
        write_scaffold(ctx, &mut template, &columns).await?;
        let cards = copy_cards(ctx, &source, &template, &pairs).await?;

        ActionLog::for_board(template.id.clone())
            .add_history(
                ctx,
                &self.actor,
                "board_create",
                payload(json!({ "board": template.title })),
            )
            .await?;

        info!(source = %source.id, template = %template.id, cards, "saved board as template");
        let template = ctx.read_board(&template.id).await?;
        board_view(ctx, &template).await
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for SaveAsTemplate {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();
        let result = self.run(ctx).await;
        logged(self, &self.actor, start, result)
    }
}

/// Install the builtin public templates; existing ones are skipped
#[operation(
    verb = "install",
    noun = "templates",
    description = "Install the builtin board templates"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct InstallTemplates {
    /// The user owning the installed templates
    pub actor: UserId,
}

impl InstallTemplates {
    pub fn new(actor: impl Into<UserId>) -> Self {
        Self {
            actor: actor.into(),
        }
    }

    async fn install(
        &self,
        ctx: &CardwallContext,
        title: &str,
        columns: &[&str],
    ) -> Result<BoardId> {
        let mut template = Board::new(title);
        template.is_template = true;
        template.visibility = Visibility::Public;
        template.add_member(self.actor.clone(), Role::Manager);
        template.labels = ctx
            .config()
            .default_labels
            .iter()
            .map(|label| Label::new(label.clone()))
            .collect();

        let columns: Vec<Column> = columns
            .iter()
            .map(|title| Column::new(template.id.clone(), *title))
            .collect();
        write_scaffold(ctx, &mut template, &columns).await?;
        Ok(template.id)
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let existing: Vec<String> = ctx
            .read_all_boards()
            .await?
            .into_iter()
            .filter(|board| board.is_template)
            .map(|board| board.title)
            .collect();

        let mut installed = Vec::new();
        let mut skipped = Vec::new();
        let builtins = [
            (EMPTY_TEMPLATE, &[] as &[&str]),
            (TODO_TEMPLATE, &TODO_COLUMNS[..]),
        ];
        for (title, columns) in builtins {
            if existing.iter().any(|t| t == title) {
                skipped.push(title);
                continue;
            }
            installed.push(self.install(ctx, title, columns).await?);
        }

        info!(installed = installed.len(), skipped = skipped.len(), "installed templates");
        Ok(json!({ "installed": installed, "skipped": skipped }))
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for InstallTemplates {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();
        let result = self.run(ctx).await;
        logged(self, &self.actor, start, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CreateBoard;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, CardwallContext, String) {
        let temp = TempDir::new().unwrap();
        let ctx = CardwallContext::new(temp.path().join(".cardwall"));
        let board = CreateBoard::new("alice", "Source")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        (temp, ctx, board["id"].as_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_save_as_template_visibility() {
        let (_temp, ctx, id) = setup().await;

        let private = SaveAsTemplate::new("alice", id.as_str(), "Mine")
            .with_description("desc")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(private["title"], "Mine");
        assert_eq!(private["description"], "desc");
        assert_eq!(private["is_template"], true);
        assert_eq!(private["visibility"], "private");

        let public = SaveAsTemplate::new("alice", id.as_str(), "Ours")
            .shared(true)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(public["visibility"], "public");
        assert_eq!(public["count_columns"], 3);
    }

    #[tokio::test]
    async fn test_install_templates_is_idempotent() {
        let (_temp, ctx, _id) = setup().await;

        let first = InstallTemplates::new("admin")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(first["installed"].as_array().unwrap().len(), 2);

        let second = InstallTemplates::new("admin")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert!(second["installed"].as_array().unwrap().is_empty());
        assert_eq!(second["skipped"], json!(["Empty board", "Todo"]));

        let todo = ctx
            .read_board(&BoardId::from_string(first["installed"][1].as_str().unwrap()))
            .await
            .unwrap();
        assert_eq!(todo.title, "Todo");
        assert_eq!(todo.count_columns(), 2);
    }
}
