//! CreateUser command

use super::{user_view, validate_username};
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::logged;
use crate::types::{User, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Register a user.
///
/// With a password the user is an application user; without one the
/// identity is assumed to be managed by an external provider.
#[operation(verb = "create", noun = "user", description = "Register a new user")]
#[derive(Debug, Deserialize, Serialize)]
pub struct CreateUser {
    /// Unique username
    pub username: UserId,
    /// Email address
    pub email: String,
    /// Display name; the username when empty
    #[serde(default)]
    pub fullname: String,
    /// Password of an application user
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    /// Preferred language
    pub language: Option<String>,
}

impl CreateUser {
    pub fn new(username: impl Into<UserId>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            fullname: String::new(),
            password: None,
            language: None,
        }
    }

    pub fn with_fullname(mut self, fullname: impl Into<String>) -> Self {
        self.fullname = fullname.into();
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        validate_username(self.username.as_str())?;
        let email = self.email.trim();
        if !email.contains('@') {
            return Err(CardwallError::invalid_value(
                "email",
                format!("\"{email}\" is not an email address"),
            ));
        }
        if ctx.user_exists(&self.username).await {
            return Err(CardwallError::duplicate_id("user", self.username.as_str()));
        }
        if ctx.find_user_by_email(email).await?.is_some() {
            return Err(CardwallError::duplicate_id("email", email));
        }

        let fullname = match self.fullname.trim() {
            "" => self.username.to_string(),
            name => name.to_string(),
        };
        let mut user = match &self.password {
            Some(password) => User::application(&self.username, email, fullname, password)?,
            None => User::external(&self.username, email, fullname),
        };
        if let Some(language) = &self.language {
            user.language = language.clone();
        }
        ctx.write_user(&user).await?;

        info!(user = %user.username, local = user.is_local(), "created user");
        user_view(&user)
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for CreateUser {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();
        let result = self.run(ctx).await;
        logged(self, &self.username, start, result)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.username.to_string()]
    }
}
