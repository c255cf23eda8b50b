//! Operation metadata and execution traits

use crate::{ExecutionResult, ParamMeta};
use async_trait::async_trait;
use serde_json::Value;

/// Static metadata describing a command.
///
/// Implemented by the `#[operation]` attribute; never written by hand.
pub trait Operation {
    /// The action, e.g. "add"
    fn verb(&self) -> &'static str;

    /// The target entity, e.g. "card"
    fn noun(&self) -> &'static str;

    /// One-line human description
    fn description(&self) -> &'static str;

    /// Parameters derived from the struct fields
    fn parameters(&self) -> &'static [ParamMeta];

    /// Canonical op string used in logs ("add card", "toggle member")
    fn op_string(&self) -> String {
        format!("{} {}", self.verb(), self.noun())
    }
}

/// Run a command against a context `C`, failing with `E`.
#[async_trait]
pub trait Execute<C, E>: Operation
where
    C: Send + Sync,
{
    /// Execute the command
    async fn execute(&self, ctx: &C) -> ExecutionResult<Value, E>;

    /// Ids of the resources the command touched, used to fan out log entries.
    ///
    /// Defaults to the `id` field of the result when present.
    fn affected_resource_ids(&self, result: &Value) -> Vec<String> {
        result
            .get("id")
            .and_then(|v| v.as_str())
            .map(|id| vec![id.to_string()])
            .unwrap_or_default()
    }
}
