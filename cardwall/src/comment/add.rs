//! AddComment command

use super::comment_text;
use crate::action_log::payload;
use crate::card::{authorize_card, card_log};
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::logged;
use crate::security::Permission;
use crate::types::{CardId, Comment, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Add a comment to a card
#[operation(verb = "add", noun = "comment", description = "Add a comment to a card")]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddComment {
    /// The author of the comment
    pub actor: UserId,
    /// The card to comment on
    pub card: CardId,
    /// The comment text
    pub text: String,
}

impl AddComment {
    pub fn new(
        actor: impl Into<UserId>,
        card: impl Into<CardId>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            actor: actor.into(),
            card: card.into(),
            text: text.into(),
        }
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let text = comment_text(&self.text)?;
        let (_board, mut card) =
            authorize_card(ctx, &self.card, &self.actor, Permission::Comment).await?;

        let comment = Comment::new(self.actor.clone(), text);
        let result = serde_json::to_value(&comment)?;
        card.comments.push(comment);
        ctx.write_card(&card).await?;

        card_log(&card)
            .add_history(
                ctx,
                &self.actor,
                "card_add_comment",
                payload(json!({ "author": self.actor, "card": card.title, "comment": text })),
            )
            .await?;
        Ok(result)
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for AddComment {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();
        let result = self.run(ctx).await;
        logged(self, &self.actor, start, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{CreateBoard, SetBoardAccess};
    use crate::card::AddCard;
    use crate::types::{Access, User, Visibility};
    use tempfile::TempDir;

    async fn setup() -> (TempDir, CardwallContext, String, String) {
        let temp = TempDir::new().unwrap();
        let ctx = CardwallContext::new(temp.path().join(".cardwall"));
        let board = CreateBoard::new("alice", "Talk")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let column = board["columns"][0]["id"].as_str().unwrap();
        let card = AddCard::new("alice", column, "Topic")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        (
            temp,
            ctx,
            board["id"].as_str().unwrap().to_string(),
            card["id"].as_str().unwrap().to_string(),
        )
    }

    #[tokio::test]
    async fn test_add_comment() {
        let (_temp, ctx, _board, card) = setup().await;

        let comment = AddComment::new("alice", card.as_str(), "  looks good  ")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(comment["text"], "looks good");
        assert_eq!(comment["author"], "alice");

        let stored = ctx.read_card(&CardId::from(card.as_str())).await.unwrap();
        assert_eq!(stored.comments.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_comment_rejected() {
        let (_temp, ctx, _board, card) = setup().await;
        let result = AddComment::new("alice", card.as_str(), "   ")
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(CardwallError::InvalidValue { .. })));
    }

    #[tokio::test]
    async fn test_comment_access() {
        let (_temp, ctx, board, card) = setup().await;
        ctx.write_user(&User::external("bob", "bob@example.com", "Bob"))
            .await
            .unwrap();

        // private boards only let members comment
        let outsider = AddComment::new("bob", card.as_str(), "hi")
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(outsider, Err(CardwallError::PermissionDenied { .. })));

        SetBoardAccess::new("alice", board.as_str())
            .with_visibility(Visibility::Public)
            .with_comments(Access::Public)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        AddComment::new("bob", card.as_str(), "hi")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        SetBoardAccess::new("alice", board.as_str())
            .with_comments(Access::Off)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let closed = AddComment::new("alice", card.as_str(), "again")
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(closed, Err(CardwallError::PermissionDenied { .. })));
    }
}
