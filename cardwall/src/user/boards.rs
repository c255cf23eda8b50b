//! Boards of a user, grouped the way a board list page shows them

use crate::board::BoardsManager;
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::unlogged;
use crate::types::{Board, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A user's boards split into managed, guest and archived boards.
///
/// Templates never appear here. The lists are a snapshot; call
/// [`UserBoards::reload_boards`] after changes.
#[derive(Debug, Clone)]
pub struct UserBoards {
    user: UserId,
    my_boards: Vec<Board>,
    guest_boards: Vec<Board>,
    archived_boards: Vec<Board>,
    last_modified_boards: Vec<Board>,
}

impl UserBoards {
    pub async fn load(ctx: &CardwallContext, user: impl Into<UserId>) -> Result<Self> {
        let mut boards = Self {
            user: user.into(),
            my_boards: Vec::new(),
            guest_boards: Vec::new(),
            archived_boards: Vec::new(),
            last_modified_boards: Vec::new(),
        };
        boards.reload_boards(ctx).await?;
        Ok(boards)
    }

    /// Recompute every list from storage
    pub async fn reload_boards(&mut self, ctx: &CardwallContext) -> Result<()> {
        let mut boards = BoardsManager::new(ctx).boards_of(&self.user).await?;
        boards.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));

        self.my_boards.clear();
        self.guest_boards.clear();
        self.archived_boards.clear();
        for board in boards {
            if board.archived {
                self.archived_boards.push(board);
            } else if board.has_manager(&self.user) {
                self.my_boards.push(board);
            } else {
                self.guest_boards.push(board);
            }
        }

        let mut recent: Vec<Board> = self
            .my_boards
            .iter()
            .chain(&self.guest_boards)
            .cloned()
            .collect();
        recent.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
        self.last_modified_boards = recent;
        Ok(())
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    /// Boards the user manages
    pub fn my_boards(&self) -> &[Board] {
        &self.my_boards
    }

    /// Boards the user is a plain member of
    pub fn guest_boards(&self) -> &[Board] {
        &self.guest_boards
    }

    pub fn archived_boards(&self) -> &[Board] {
        &self.archived_boards
    }

    /// Active boards, most recently modified first
    pub fn last_modified_boards(&self) -> &[Board] {
        &self.last_modified_boards
    }

    pub fn to_value(&self) -> Value {
        json!({
            "user": self.user,
            "my_boards": summaries(&self.my_boards),
            "guest_boards": summaries(&self.guest_boards),
            "archived_boards": summaries(&self.archived_boards),
            "last_modified_boards": summaries(&self.last_modified_boards),
        })
    }
}

fn summaries(boards: &[Board]) -> Vec<Value> {
    boards
        .iter()
        .map(|board| {
            json!({
                "id": board.id,
                "uri": board.uri,
                "title": board.title,
                "modified_at": board.modified_at,
            })
        })
        .collect()
}

/// Boards of a user, grouped
#[operation(verb = "boards", noun = "user", description = "List a user's boards by group")]
#[derive(Debug, Deserialize, Serialize)]
pub struct GetUserBoards {
    /// The user
    pub user: UserId,
}

impl GetUserBoards {
    pub fn new(user: impl Into<UserId>) -> Self {
        Self { user: user.into() }
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for GetUserBoards {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let result = UserBoards::load(ctx, &self.user)
            .await
            .map(|boards| boards.to_value());
        unlogged(result)
    }
}
