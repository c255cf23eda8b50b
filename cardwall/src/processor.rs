//! Operation processor for cardwall commands

use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::types::UserId;
use cardwall_operations::{
    async_trait, Execute, ExecutionResult, LogEntry, Operation, OperationProcessor,
};
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, warn};

/// Runs commands and appends their log entries to the activity log
#[derive(Debug, Clone, Default)]
pub struct CardwallOperationProcessor {
    actor: Option<UserId>,
}

impl CardwallOperationProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute every logged entry to `actor`
    pub fn with_actor(actor: impl Into<UserId>) -> Self {
        Self {
            actor: Some(actor.into()),
        }
    }

    pub fn actor(&self) -> Option<&UserId> {
        self.actor.as_ref()
    }
}

#[async_trait]
impl OperationProcessor<CardwallContext, CardwallError> for CardwallOperationProcessor {
    async fn process<T>(&self, operation: &T, ctx: &CardwallContext) -> Result<Value>
    where
        T: Execute<CardwallContext, CardwallError> + Send + Sync,
    {
        let (result, log_entry) = operation.execute(ctx).await.split();

        if let Some(mut entry) = log_entry {
            if let Some(actor) = &self.actor {
                entry = entry.with_actor(actor.as_str());
            }
            let affected = match &result {
                Ok(value) => operation.affected_resource_ids(value),
                Err(_) => Vec::new(),
            };
            if let Err(e) = self.write_log(ctx, &entry, &affected).await {
                warn!(op = %entry.op, error = %e, "failed to write activity log");
            }
        }

        result
    }

    async fn write_log(
        &self,
        ctx: &CardwallContext,
        log_entry: &LogEntry,
        affected_resources: &[String],
    ) -> Result<()> {
        debug!(
            op = %log_entry.op,
            affected = ?affected_resources,
            duration_ms = log_entry.duration_ms,
            "activity"
        );
        ctx.append_activity(log_entry).await
    }
}

/// Wrap the outcome of a mutation, stamping the acting user on the entry
pub(crate) fn logged<T>(
    op: &T,
    actor: &UserId,
    start: Instant,
    result: Result<Value>,
) -> ExecutionResult<Value, CardwallError>
where
    T: Operation + Serialize,
{
    let input = serde_json::to_value(op).unwrap_or(Value::Null);
    let duration_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(value) => ExecutionResult::Logged {
            value: value.clone(),
            log_entry: LogEntry::new(
                op.op_string(),
                input,
                value,
                Some(actor.to_string()),
                duration_ms,
            ),
        },
        Err(error) => {
            let error_msg = error.to_string();
            ExecutionResult::Failed {
                error,
                log_entry: Some(
                    LogEntry::failure(op.op_string(), input, &error_msg, duration_ms)
                        .with_actor(actor.as_str()),
                ),
            }
        }
    }
}

/// Wrap the outcome of a read; failures carry no entry
pub(crate) fn unlogged(result: Result<Value>) -> ExecutionResult<Value, CardwallError> {
    match result {
        Ok(value) => ExecutionResult::Unlogged { value },
        Err(error) => ExecutionResult::Failed {
            error,
            log_entry: None,
        },
    }
}
