//! Operation processor: runs commands and persists their log entries

use crate::{Execute, LogEntry};
use async_trait::async_trait;
use serde_json::Value;

/// Drives command execution for a context type.
///
/// Implementations decide where log entries go (activity files, nowhere, ...)
/// and how the acting user is attributed.
#[async_trait]
pub trait OperationProcessor<C, E>
where
    C: Send + Sync,
{
    /// Execute `operation` and write its log entry if it produced one
    async fn process<T>(&self, operation: &T, ctx: &C) -> Result<Value, E>
    where
        T: Execute<C, E> + Send + Sync;

    /// Persist a log entry for the given affected resources
    async fn write_log(
        &self,
        ctx: &C,
        log_entry: &LogEntry,
        affected_resources: &[String],
    ) -> Result<(), E>;
}
