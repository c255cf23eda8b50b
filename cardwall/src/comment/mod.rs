//! Comment commands
//!
//! Comments live inside their card. Anyone allowed by the board's
//! `comments_allowed` setting may comment; only the author or a board manager
//! may edit or delete a comment afterwards.

mod add;
mod delete;
mod list;
mod update;

pub use add::AddComment;
pub use delete::DeleteComment;
pub use list::ListComments;
pub use update::UpdateComment;

use crate::action_log::EventRegistry;
use crate::card::authorize_card;
use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::security::Permission;
use crate::types::{Board, Card, CardId, CommentId, UserId};

pub(crate) fn register_events(registry: &mut EventRegistry) {
    registry.register_template(
        "card_add_comment",
        "User {{ author }} has commented on card \"{{ card }}\"",
    );
    registry.register_template(
        "card_update_comment",
        "Comment of {{ author }} on card \"{{ card }}\" has been edited",
    );
    registry.register_template(
        "card_delete_comment",
        "Comment of {{ author }} on card \"{{ card }}\" has been deleted",
    );
}

/// Load a card for changing one of its comments. The actor must be the
/// comment's author or a manager of the board.
pub(crate) async fn authorize_comment(
    ctx: &CardwallContext,
    card: &CardId,
    comment: &CommentId,
    actor: &UserId,
) -> Result<(Board, Card)> {
    let (board, card) = authorize_card(ctx, card, actor, Permission::View).await?;
    let found = card
        .find_comment(comment)
        .ok_or_else(|| CardwallError::CommentNotFound {
            id: comment.to_string(),
        })?;
    if found.author != *actor && !board.has_manager(actor) {
        return Err(CardwallError::permission_denied(actor, "edit comment"));
    }
    Ok((board, card))
}

/// Comment text with surrounding whitespace removed; empty text is rejected
pub(crate) fn comment_text(text: &str) -> Result<&str> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CardwallError::invalid_value("text", "comment cannot be empty"));
    }
    Ok(text)
}
