//! DeleteComment command

use super::authorize_comment;
use crate::action_log::payload;
use crate::card::card_log;
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::logged;
use crate::types::{CardId, CommentId, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Delete a comment
#[operation(verb = "delete", noun = "comment", description = "Delete a comment")]
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteComment {
    /// The acting user (author or board manager)
    pub actor: UserId,
    /// The card holding the comment
    pub card: CardId,
    /// The comment
    pub id: CommentId,
}

impl DeleteComment {
    pub fn new(
        actor: impl Into<UserId>,
        card: impl Into<CardId>,
        id: impl Into<CommentId>,
    ) -> Self {
        Self {
            actor: actor.into(),
            card: card.into(),
            id: id.into(),
        }
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let (_board, mut card) = authorize_comment(ctx, &self.card, &self.id, &self.actor).await?;

        let position = card
            .comments
            .iter()
            .position(|c| c.id == self.id)
            .ok_or_else(|| CardwallError::CommentNotFound {
                id: self.id.to_string(),
            })?;
        let comment = card.comments.remove(position);
        ctx.write_card(&card).await?;

        card_log(&card)
            .add_history(
                ctx,
                &self.actor,
                "card_delete_comment",
                payload(json!({ "author": comment.author, "card": card.title })),
            )
            .await?;
        Ok(json!({ "deleted": true, "id": comment.id, "card": card.id }))
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for DeleteComment {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();
        let result = self.run(ctx).await;
        logged(self, &self.actor, start, result)
    }
}
