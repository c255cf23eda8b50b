//! Activity log entries written for executed commands

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One executed command, as recorded in the activity log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// ULID of the entry
    pub id: String,

    pub timestamp: DateTime<Utc>,

    /// Canonical op string, e.g. "add card"
    pub op: String,

    /// Command parameters as JSON
    pub input: Value,

    /// Command result, or `{"error": ...}`
    pub output: Value,

    /// Username of whoever ran the command
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    pub duration_ms: u64,
}

impl LogEntry {
    pub fn new(
        op: impl Into<String>,
        input: Value,
        output: Value,
        actor: Option<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            timestamp: Utc::now(),
            op: op.into(),
            input,
            output,
            actor,
            duration_ms,
        }
    }

    /// Entry for a failed command
    pub fn failure(op: impl Into<String>, input: Value, error: &str, duration_ms: u64) -> Self {
        Self::new(
            op,
            input,
            serde_json::json!({ "error": error }),
            None,
            duration_ms,
        )
    }

    /// Attribute the entry to an actor
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Whether the entry records a failure
    pub fn is_failure(&self) -> bool {
        self.output.get("error").is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failure_entry() {
        let entry = LogEntry::failure("delete column", json!({"id": "c1"}), "column not found", 3);
        assert!(entry.is_failure());
        assert_eq!(entry.output["error"], "column not found");
        assert!(entry.actor.is_none());
    }

    #[test]
    fn test_actor_attribution_roundtrip() {
        let entry = LogEntry::new("add card", json!({}), json!({"id": "x"}), None, 0)
            .with_actor("alice");
        let line = serde_json::to_string(&entry).unwrap();
        let parsed: LogEntry = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed.actor.as_deref(), Some("alice"));
        assert!(!parsed.is_failure());
        assert_eq!(parsed.id.len(), 26);
    }
}
