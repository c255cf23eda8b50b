//! Execution outcome of a command

use crate::LogEntry;

/// What a command produced.
///
/// - `Logged`: a mutation that belongs in the activity log
/// - `Unlogged`: a read, or a mutation refused by validation that changed nothing
/// - `Failed`: an error, with a log entry when the failure itself is worth auditing
#[derive(Debug)]
pub enum ExecutionResult<T, E> {
    Logged { value: T, log_entry: LogEntry },
    Unlogged { value: T },
    Failed {
        error: E,
        log_entry: Option<LogEntry>,
    },
}

impl<T, E> ExecutionResult<T, E> {
    /// Drop the log entry and keep the outcome
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Logged { value, .. } | Self::Unlogged { value } => Ok(value),
            Self::Failed { error, .. } => Err(error),
        }
    }

    /// Outcome and log entry, separately
    pub fn split(self) -> (Result<T, E>, Option<LogEntry>) {
        match self {
            Self::Logged { value, log_entry } => (Ok(value), Some(log_entry)),
            Self::Unlogged { value } => (Ok(value), None),
            Self::Failed { error, log_entry } => (Err(error), log_entry),
        }
    }

    /// Borrow the log entry, if any
    pub fn log_entry(&self) -> Option<&LogEntry> {
        match self {
            Self::Logged { log_entry, .. } => Some(log_entry),
            Self::Failed { log_entry, .. } => log_entry.as_ref(),
            Self::Unlogged { .. } => None,
        }
    }

    /// Whether a processor has something to persist
    pub fn should_log(&self) -> bool {
        self.log_entry().is_some()
    }

    /// Whether the command succeeded
    pub fn is_ok(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_logged_split() {
        let result: ExecutionResult<i32, String> = ExecutionResult::Logged {
            value: 7,
            log_entry: LogEntry::new("add card", json!({}), json!(7), None, 1),
        };
        assert!(result.should_log());
        assert!(result.is_ok());
        let (value, entry) = result.split();
        assert_eq!(value, Ok(7));
        assert_eq!(entry.unwrap().op, "add card");
    }

    #[test]
    fn test_unlogged_has_no_entry() {
        let result: ExecutionResult<i32, String> = ExecutionResult::Unlogged { value: 1 };
        assert!(!result.should_log());
        assert_eq!(result.into_result(), Ok(1));
    }

    #[test]
    fn test_failed_without_entry() {
        let result: ExecutionResult<i32, String> = ExecutionResult::Failed {
            error: "boom".into(),
            log_entry: None,
        };
        assert!(!result.is_ok());
        assert!(!result.should_log());
        assert_eq!(result.into_result(), Err("boom".to_string()));
    }
}
