//! Kanban board engine with file-backed storage
//!
//! Boards hold ordered columns of cards. Cards carry members, labels, due
//! dates, weights, covers, comments and votes, each owned by a pluggable
//! [`CardExtension`](extension::CardExtension). Every change to a board is
//! recorded in an append-only action log that renders into human-readable
//! history through an [`EventRegistry`](action_log::EventRegistry).
//!
//! ## Overview
//!
//! - **Commands** - Every operation is a struct implementing [`Execute`];
//!   mutations name their `actor` and return a logged result
//! - **Permissions** - Board visibility, membership and manager roles gate
//!   every command through [`security::has_permission`]
//! - **File-per-entity** - Boards, columns, cards, users and invitations are
//!   individual JSON files
//! - **History** - One JSONL action log per board, plus a global activity log
//!   of executed operations
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use cardwall::{board::CreateBoard, card::AddCard, CardwallContext, Execute};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = CardwallContext::new("/path/to/data/.cardwall");
//!
//! let board = CreateBoard::new("alice", "Launch")
//!     .execute(&ctx)
//!     .await
//!     .into_result()?;
//!
//! let todo = board["columns"][0]["id"].as_str().unwrap_or_default();
//! let card = AddCard::new("alice", todo, "Write the announcement")
//!     .with_description("Draft and review")
//!     .execute(&ctx)
//!     .await
//!     .into_result()?;
//!
//! println!("Created card: {}", card["id"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Storage Structure
//!
//! ```text
//! .cardwall/
//! ├── boards/
//! │   ├── {id}.json        # Board state
//! │   └── {id}.jsonl       # Board action log
//! ├── columns/{id}.json
//! ├── cards/{id}.json
//! ├── users/{username}.json
//! ├── tokens/{id}.json     # Pending invitations
//! ├── assets/              # Card covers
//! └── activity/
//!     └── current.jsonl    # Global operation log
//! ```

pub mod assets;
pub mod auto_color;
pub mod config;
mod context;
mod error;
mod logging;
mod processor;
pub mod security;
pub mod types;

pub mod action_log;
pub mod extension;

// Command modules
pub mod board;
pub mod card;
pub mod column;
pub mod comment;
pub mod label;
pub mod member;
pub mod user;

// Re-export Execute trait and types from operations crate
pub use cardwall_operations::{
    async_trait, Execute, ExecutionResult, LogEntry, Operation, OperationProcessor,
};

pub use assets::{AssetStore, FileAssetStore};
pub use config::CardwallConfig;
pub use context::{CardwallContext, CardwallLock, STORE_DIR};
pub use error::{CardwallError, Result};
pub use logging::Pretty;
pub use processor::CardwallOperationProcessor;

// Re-export commonly used types
pub use types::{
    Access, ActionLogEntry, Board, BoardId, Card, CardId, Column, ColumnId, Comment, CommentId,
    InvitationToken, Label, LabelId, Role, User, UserId, Visibility,
};
