//! User commands and per-user board views

mod boards;
mod create;
mod get;
mod update;

pub use boards::{GetUserBoards, UserBoards};
pub use create::CreateUser;
pub use get::GetUser;
pub use update::{RecordLogin, SetLastBoard, UpdatePassword};

use crate::error::{CardwallError, Result};
use crate::types::User;
use serde_json::Value;

/// A user as shown to callers; the password hash never leaves the store
pub(crate) fn user_view(user: &User) -> Result<Value> {
    let mut value = serde_json::to_value(user)?;
    if let Some(fields) = value.as_object_mut() {
        fields.remove("password_hash");
    }
    Ok(value)
}

/// Usernames are ids and file names: letters, digits, `-`, `_` and `.`
pub(crate) fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() {
        return Err(CardwallError::invalid_value("username", "username cannot be empty"));
    }
    let valid = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && !username.starts_with('.');
    if !valid {
        return Err(CardwallError::invalid_value(
            "username",
            format!("\"{username}\" may only contain letters, digits, '-', '_' and '.'"),
        ));
    }
    Ok(())
}
