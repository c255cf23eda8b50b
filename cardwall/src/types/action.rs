//! Action log entries: the per-board audit trail

use super::ids::{ActionId, BoardId, CardId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structured payload of an action (`{from, to, card}`, `{user_id, user, card}`, ...)
pub type Payload = Map<String, Value>;

/// What an action applies to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionTarget {
    pub board: BoardId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<CardId>,
}

/// One recorded mutation. Never modified once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLogEntry {
    pub id: ActionId,
    pub timestamp: DateTime<Utc>,
    pub actor: UserId,
    /// Action kind, e.g. "card_add_member"
    pub action: String,
    pub payload: Payload,
    pub target: ActionTarget,
}

impl ActionLogEntry {
    pub fn new(
        actor: UserId,
        action: impl Into<String>,
        payload: Payload,
        target: ActionTarget,
    ) -> Self {
        Self {
            id: ActionId::new(),
            timestamp: Utc::now(),
            actor,
            action: action.into(),
            payload,
            target,
        }
    }

    pub fn is_for_card(&self, card: &CardId) -> bool {
        self.target.card.as_ref() == Some(card)
    }
}
