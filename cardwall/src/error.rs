//! Error types for the board engine

use std::path::PathBuf;
use thiserror::Error;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, CardwallError>;

/// Errors that can occur in board operations
#[derive(Debug, Error)]
pub enum CardwallError {
    /// Storage root has not been initialized
    #[error("store not initialized at {path}")]
    NotInitialized { path: PathBuf },

    #[error("board not found: {id}")]
    BoardNotFound { id: String },

    #[error("column not found: {id}")]
    ColumnNotFound { id: String },

    #[error("card not found: {id}")]
    CardNotFound { id: String },

    #[error("user not found: {id}")]
    UserNotFound { id: String },

    #[error("label not found: {id}")]
    LabelNotFound { id: String },

    #[error("comment not found: {id}")]
    CommentNotFound { id: String },

    #[error("invitation not found: {id}")]
    TokenNotFound { id: String },

    /// Generic resource not found (assets, ...)
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    /// The entity exists but the user may not act on it
    #[error("permission denied: {user} may not {permission}")]
    PermissionDenied { user: String, permission: String },

    #[error("invalid operation: {message}")]
    InvalidOperation { message: String },

    /// No formatter is registered for an action kind
    #[error("no formatter registered for action '{action}'")]
    UnknownAction { action: String },

    #[error("duplicate {item_type} ID: {id}")]
    DuplicateId { item_type: String, id: String },

    #[error("missing required field: {field}")]
    MissingField { field: String },

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// Lock is held by another process
    #[error("lock busy - another operation in progress")]
    LockBusy,

    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CardwallError {
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    pub fn permission_denied(user: impl ToString, permission: impl Into<String>) -> Self {
        Self::PermissionDenied {
            user: user.to_string(),
            permission: permission.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn duplicate_id(item_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::DuplicateId {
            item_type: item_type.into(),
            id: id.into(),
        }
    }

    /// Lookup failures, as opposed to refusals or broken input
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::BoardNotFound { .. }
                | Self::ColumnNotFound { .. }
                | Self::CardNotFound { .. }
                | Self::UserNotFound { .. }
                | Self::LabelNotFound { .. }
                | Self::CommentNotFound { .. }
                | Self::TokenNotFound { .. }
                | Self::NotFound { .. }
        )
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LockBusy)
    }
}

impl From<figment::Error> for CardwallError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CardwallError::CardNotFound {
            id: "abc123".into(),
        };
        assert_eq!(err.to_string(), "card not found: abc123");
    }

    #[test]
    fn test_not_found_is_distinct_from_denied() {
        let missing = CardwallError::BoardNotFound { id: "b".into() };
        let denied = CardwallError::permission_denied("bob", "view board");
        assert!(missing.is_not_found());
        assert!(!denied.is_not_found());
        assert_eq!(denied.to_string(), "permission denied: bob may not view board");
    }

    #[test]
    fn test_retryable() {
        assert!(CardwallError::LockBusy.is_retryable());
        assert!(!CardwallError::UnknownAction {
            action: "x".into()
        }
        .is_retryable());
    }
}
