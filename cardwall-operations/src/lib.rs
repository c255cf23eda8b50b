//! # cardwall operations
//!
//! Commands are plain structs whose fields are the parameters. The
//! `#[operation]` attribute derives the [`Operation`] metadata (verb, noun,
//! description, parameter list) and the command implements [`Execute`] for
//! the context and error type of the crate that owns it.
//!
//! ## Example
//!
//! ```ignore
//! use cardwall_operations::*;
//!
//! #[operation(verb = "add", noun = "card", description = "Create a new card")]
//! #[derive(Debug, Deserialize, Serialize)]
//! pub struct AddCard {
//!     /// The column receiving the card
//!     pub column: ColumnId,
//!     /// The card title
//!     pub title: String,
//! }
//!
//! #[async_trait]
//! impl Execute<CardwallContext, CardwallError> for AddCard {
//!     async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
//!         // mutations return ExecutionResult::Logged, reads ExecutionResult::Unlogged
//!     }
//! }
//! ```

mod execution_result;
mod log;
mod operation;
mod parameter;
mod processor;

pub use execution_result::ExecutionResult;
pub use log::LogEntry;
pub use operation::{Execute, Operation};
pub use parameter::{ParamMeta, ParamType};
pub use processor::OperationProcessor;

// Re-export proc macros
pub use cardwall_operations_macros::{operation, param};

// Re-export for use in implementations
pub use async_trait::async_trait;
pub use serde_json::Value;
