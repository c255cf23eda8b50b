//! UpdateComment command

use super::{authorize_comment, comment_text};
use crate::action_log::payload;
use crate::card::card_log;
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::processor::logged;
use crate::types::{CardId, CommentId, UserId};
use cardwall_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Edit the text of a comment
#[operation(verb = "update", noun = "comment", description = "Edit a comment")]
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateComment {
    /// The acting user (author or board manager)
    pub actor: UserId,
    /// The card holding the comment
    pub card: CardId,
    /// The comment
    pub id: CommentId,
    /// New text
    pub text: String,
}

impl UpdateComment {
    pub fn new(
        actor: impl Into<UserId>,
        card: impl Into<CardId>,
        id: impl Into<CommentId>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            actor: actor.into(),
            card: card.into(),
            id: id.into(),
            text: text.into(),
        }
    }

    async fn run(&self, ctx: &CardwallContext) -> Result<Value> {
        let text = comment_text(&self.text)?;
        let (_board, mut card) = authorize_comment(ctx, &self.card, &self.id, &self.actor).await?;

        let comment = card
            .find_comment_mut(&self.id)
            .ok_or_else(|| CardwallError::CommentNotFound {
                id: self.id.to_string(),
            })?;
        comment.edit(text);
        let author = comment.author.clone();
        let result = serde_json::to_value(&*comment)?;
        ctx.write_card(&card).await?;

        card_log(&card)
            .add_history(
                ctx,
                &self.actor,
                "card_update_comment",
                payload(json!({ "author": author, "card": card.title, "comment": text })),
            )
            .await?;
        Ok(result)
    }
}

#[async_trait]
impl Execute<CardwallContext, CardwallError> for UpdateComment {
    async fn execute(&self, ctx: &CardwallContext) -> ExecutionResult<Value, CardwallError> {
        let start = std::time::Instant::now();
        let result = self.run(ctx).await;
        logged(self, &self.actor, start, result)
    }
}
