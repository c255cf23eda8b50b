//! Append-only per-board history
//!
//! Every mutation of a board, column or card appends an [`ActionLogEntry`]
//! to `boards/{id}.jsonl`. An [`ActionLog`] is scoped to a board; the card
//! projection filters to the entries targeting one card and stamps that card
//! on the entries it appends. Entries are turned into text through the
//! [`EventRegistry`].

mod registry;
mod translator;

pub use registry::{interpolate, EventRegistry, Formatter};
pub use translator::{CatalogTranslator, IdentityTranslator, Translator};

use crate::context::CardwallContext;
use crate::error::{CardwallError, Result};
use crate::types::{ActionLogEntry, ActionTarget, BoardId, CardId, Payload, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// History of a board, optionally projected to one card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionLog {
    board: BoardId,
    card: Option<CardId>,
}

/// A log entry with its rendered message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedAction {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub actor: UserId,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<CardId>,
    pub message: String,
}

impl ActionLog {
    pub fn for_board(board: impl Into<BoardId>) -> Self {
        Self {
            board: board.into(),
            card: None,
        }
    }

    /// Projection of this log onto one card
    pub fn for_card(&self, card: impl Into<CardId>) -> Self {
        Self {
            board: self.board.clone(),
            card: Some(card.into()),
        }
    }

    pub fn board(&self) -> &BoardId {
        &self.board
    }

    pub fn card(&self) -> Option<&CardId> {
        self.card.as_ref()
    }

    /// Append an entry and bump the board's modification time
    pub async fn add_history(
        &self,
        ctx: &CardwallContext,
        actor: &UserId,
        action: &str,
        payload: Payload,
    ) -> Result<ActionLogEntry> {
        let entry = ActionLogEntry::new(
            actor.clone(),
            action,
            payload,
            ActionTarget {
                board: self.board.clone(),
                card: self.card.clone(),
            },
        );
        ctx.append_action(&entry).await?;

        match ctx.read_board(&self.board).await {
            Ok(mut board) => {
                board.modified_at = entry.timestamp;
                ctx.write_board(&board).await?;
            }
            Err(CardwallError::BoardNotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        debug!(
            board = %self.board,
            card = ?self.card.as_ref().map(CardId::as_str),
            actor = %actor,
            action,
            "history"
        );
        Ok(entry)
    }

    /// Entries in scope, newest first
    pub async fn entries(&self, ctx: &CardwallContext) -> Result<Vec<ActionLogEntry>> {
        let mut entries = ctx.read_actions(&self.board).await?;
        if let Some(card) = &self.card {
            entries.retain(|entry| entry.is_for_card(card));
        }
        Ok(entries)
    }

    /// Entries in scope with their messages, newest first
    pub async fn render(
        &self,
        ctx: &CardwallContext,
        limit: Option<usize>,
    ) -> Result<Vec<RenderedAction>> {
        let mut entries = self.entries(ctx).await?;
        if let Some(limit) = limit {
            entries.truncate(limit);
        }

        entries
            .into_iter()
            .map(|entry| {
                let message = ctx.events().render(&entry, ctx.translator())?;
                Ok(RenderedAction {
                    id: entry.id.to_string(),
                    timestamp: entry.timestamp,
                    actor: entry.actor,
                    action: entry.action,
                    card: entry.target.card,
                    message,
                })
            })
            .collect()
    }
}

/// Payload from a `json!` object; anything else yields an empty payload
pub(crate) fn payload(value: Value) -> Payload {
    match value {
        Value::Object(map) => map,
        _ => Payload::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Board;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_card_projection() {
        let temp = TempDir::new().unwrap();
        let ctx = CardwallContext::new(temp.path().join(".cardwall"));
        let board = Board::new("History");
        ctx.write_board(&board).await.unwrap();

        let log = ActionLog::for_board(board.id.clone());
        let card_log = log.for_card("card-1");
        let actor = UserId::from("alice");

        log.add_history(&ctx, &actor, "board_create", payload(json!({"board": "History"})))
            .await
            .unwrap();
        let entry = card_log
            .add_history(
                &ctx,
                &actor,
                "card_create",
                payload(json!({"card": "One", "column": "Todo"})),
            )
            .await
            .unwrap();
        assert_eq!(entry.target.card.as_ref().map(CardId::as_str), Some("card-1"));

        assert_eq!(log.entries(&ctx).await.unwrap().len(), 2);
        let card_entries = card_log.entries(&ctx).await.unwrap();
        assert_eq!(card_entries.len(), 1);
        assert_eq!(card_entries[0].action, "card_create");

        let stored = ctx.read_board(&board.id).await.unwrap();
        assert_eq!(stored.modified_at, entry.timestamp);
    }

    #[tokio::test]
    async fn test_render_unknown_action_fails() {
        let temp = TempDir::new().unwrap();
        let ctx = CardwallContext::new(temp.path().join(".cardwall"));
        let log = ActionLog::for_board("b");

        log.add_history(&ctx, &UserId::from("bob"), "mystery", Payload::new())
            .await
            .unwrap();

        let err = log.render(&ctx, None).await.unwrap_err();
        assert!(matches!(err, CardwallError::UnknownAction { .. }));
    }
}
