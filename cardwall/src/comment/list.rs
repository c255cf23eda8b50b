//! ListComments command

use crate::card::authorize_card;
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::unlogged;
use crate::security::Permission;
use crate::types::{CardId, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// List the comments of a card, oldest first
#[operation(verb = "list", noun = "comments", description = "List comments on a card")]
#[derive(Debug, Deserialize, Serialize)]
pub struct ListComments {
    /// The viewing user
    pub viewer: UserId,
    /// The card
    pub card: CardId,
}

impl ListComments {
    pub fn new(viewer: impl Into<UserId>, card: impl Into<CardId>) -> Self {
        Self {
            viewer: viewer.into(),
            card: card.into(),
        }
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for ListComments {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let result: Result<Value> = async {
            let (_board, card) =
                authorize_card(ctx, &self.card, &self.viewer, Permission::View).await?;
            Ok(json!({
                "card": card.id,
                "count": card.comments.len(),
                "comments": card.comments,
            }))
        }
        .await;
        unlogged(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CreateBoard;
    use crate::card::AddCard;
    use crate::comment::AddComment;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_list_comments_in_order() {
        let temp = TempDir::new().unwrap();
        let ctx = CardwallContext::new(temp.path().join(".cardwall"));
        let board = CreateBoard::new("alice", "Chat")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let column = board["columns"][0]["id"].as_str().unwrap();
        let card = AddCard::new("alice", column, "Agenda")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let card = card["id"].as_str().unwrap();
        for text in ["one", "two"] {
            AddComment::new("alice", card, text)
                .execute(&ctx)
                .await
                .into_result()
                .unwrap();
        }

        let listed = ListComments::new("alice", card)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(listed["count"], 2);
        assert_eq!(listed["comments"][0]["text"], "one");
        assert_eq!(listed["comments"][1]["text"], "two");

        let stranger = ListComments::new("mallory", card).execute(&ctx).await.into_result();
        assert!(matches!(stranger, Err(CardwallError::PermissionDenied { .. })));
    }
}
