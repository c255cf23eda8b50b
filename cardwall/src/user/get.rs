//! GetUser command

use super::user_view;
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::unlogged;
use crate::types::UserId;
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Look a user up by username or by email
#[operation(verb = "get", noun = "user", description = "Retrieve a user by username or email")]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GetUser {
    /// Username to look up
    pub username: Option<UserId>,
    /// Email to look up when no username is given
    pub email: Option<String>,
}

impl GetUser {
    pub fn by_username(username: impl Into<UserId>) -> Self {
        Self {
            username: Some(username.into()),
            email: None,
        }
    }

    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            username: None,
            email: Some(email.into()),
        }
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let user = match (&self.username, &self.email) {
            (Some(username), _) => ctx.read_user(username).await?,
            (None, Some(email)) => ctx.find_user_by_email(email).await?.ok_or_else(|| {
                CardwallError::UserNotFound {
                    id: email.clone(),
                }
            })?,
            (None, None) => return Err(CardwallError::missing_field("username")),
        };
        user_view(&user)
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for GetUser {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        unlogged(self.run(ctx).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::User;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_get_user() {
        let temp = TempDir::new().unwrap();
        let ctx = CardwallContext::new(temp.path().join(".cardwall"));
        ctx.write_user(&User::external("bob", "Bob@Example.com", "Bob"))
            .await
            .unwrap();

        let by_name = GetUser::by_username("bob")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(by_name["email"], "Bob@Example.com");

        let by_email = GetUser::by_email("bob@example.com")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(by_email["username"], "bob");

        let missing = GetUser::by_email("nobody@example.com")
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(missing, Err(CardwallError::UserNotFound { .. })));

        let neither = GetUser::default().execute(&ctx).await.into_result();
        assert!(matches!(neither, Err(CardwallError::MissingField { .. })));
    }
}
