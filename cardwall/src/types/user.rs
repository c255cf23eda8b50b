//! Users and pending invitations

use super::ids::{BoardId, TokenId, UserId};
use crate::error::{CardwallError, Result};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where an identity comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserSource {
    /// Registered in this application, has a password
    #[default]
    Application,
    /// Authenticated by an external provider
    External,
}

/// A user of the application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: UserId,
    pub email: String,
    pub fullname: String,
    #[serde(default)]
    pub source: UserSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    password_hash: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_board: Option<BoardId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

fn default_language() -> String {
    "en".to_string()
}

impl User {
    /// A user registered in the application
    pub fn application(
        username: impl Into<UserId>,
        email: impl Into<String>,
        fullname: impl Into<String>,
        password: &str,
    ) -> Result<Self> {
        let mut user = Self::external(username, email, fullname);
        user.source = UserSource::Application;
        user.set_password(password)?;
        Ok(user)
    }

    /// A user authenticated elsewhere; no password is stored
    pub fn external(
        username: impl Into<UserId>,
        email: impl Into<String>,
        fullname: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            fullname: fullname.into(),
            source: UserSource::External,
            password_hash: None,
            language: default_language(),
            last_board: None,
            last_login: None,
            created_at: Utc::now(),
        }
    }

    /// Application users are the only ones with a local password
    pub fn is_local(&self) -> bool {
        self.source == UserSource::Application
    }

    /// Store an argon2id hash of `password` under a fresh random salt
    pub fn set_password(&mut self, password: &str) -> Result<()> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CardwallError::invalid_value("password", e.to_string()))?;
        self.password_hash = Some(hash.to_string());
        Ok(())
    }

    pub fn check_password(&self, password: &str) -> bool {
        let Some(stored) = self.password_hash.as_deref() else {
            return false;
        };
        PasswordHash::new(stored).is_ok_and(|hash| {
            Argon2::default()
                .verify_password(password.as_bytes(), &hash)
                .is_ok()
        })
    }
}

/// An invitation to join a board, addressed to an email
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvitationToken {
    pub id: TokenId,
    pub email: String,
    pub board: BoardId,
    pub created_at: DateTime<Utc>,
}

impl InvitationToken {
    pub fn new(email: impl Into<String>, board: BoardId) -> Self {
        Self {
            id: TokenId::new(),
            email: email.into(),
            board,
            created_at: Utc::now(),
        }
    }
}

/// An invited participant who has not joined yet.
///
/// Identity comes from the invitation token: until registration the
/// invited email doubles as the username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUser {
    token: InvitationToken,
}

impl PendingUser {
    pub fn new(token: InvitationToken) -> Self {
        Self { token }
    }

    pub fn token_id(&self) -> &TokenId {
        &self.token.id
    }

    pub fn username(&self) -> &str {
        &self.token.email
    }

    pub fn email(&self) -> &str {
        &self.token.email
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_user_password() {
        let mut user = User::application("alice", "alice@example.com", "Alice", "s3cret").unwrap();
        assert!(user.is_local());
        assert!(user.check_password("s3cret"));
        assert!(!user.check_password("wrong"));

        user.set_password("changed").unwrap();
        assert!(user.check_password("changed"));
        assert!(!user.check_password("s3cret"));
    }

    #[test]
    fn test_password_hash_is_salted_argon2() {
        let first = User::application("alice", "alice@example.com", "Alice", "same").unwrap();
        let second = User::application("bob", "bob@example.com", "Bob", "same").unwrap();
        let first_hash = first.password_hash.as_deref().unwrap();
        let second_hash = second.password_hash.as_deref().unwrap();

        assert!(first_hash.starts_with("$argon2id$"));
        assert_ne!(first_hash, second_hash);
        assert!(first.check_password("same"));
        assert!(second.check_password("same"));
    }

    #[test]
    fn test_unparseable_hash_never_matches() {
        let mut user = User::external("carol", "carol@example.com", "Carol");
        user.password_hash = Some("not-a-phc-string".to_string());
        assert!(!user.check_password("not-a-phc-string"));
    }

    #[test]
    fn test_external_user_has_no_password() {
        let user = User::external("bob", "bob@example.com", "Bob");
        assert!(!user.is_local());
        assert!(!user.check_password(""));
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_pending_user_proxies_token() {
        let token = InvitationToken::new("carol@example.com", BoardId::new());
        let pending = PendingUser::new(token.clone());
        assert_eq!(pending.username(), "carol@example.com");
        assert_eq!(pending.email(), "carol@example.com");
        assert_eq!(pending.token_id(), &token.id);
    }
}
