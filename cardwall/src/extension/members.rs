//! Card members facet

use super::{CardExtension, BOARD_MEMBER_REMOVED};
use crate::types::{Card, Payload, UserId};
use serde_json::{json, Value};

/// Assigned users, with the overflow beyond `max_shown`
#[derive(Debug, Clone)]
pub struct MembersExtension {
    max_shown: usize,
    members: Vec<UserId>,
}

impl MembersExtension {
    pub fn new(max_shown: usize) -> Self {
        Self {
            max_shown,
            members: Vec::new(),
        }
    }
}

impl CardExtension for MembersExtension {
    fn name(&self) -> &'static str {
        "members"
    }

    fn on_attach(&mut self, card: &Card) {
        self.members = card.members.clone();
    }

    fn on_render(&self) -> Value {
        let shown: Vec<_> = self.members.iter().take(self.max_shown).collect();
        json!({
            "shown": shown,
            "overflow": self.members.len().saturating_sub(self.max_shown),
            "all": self.members,
        })
    }

    fn handle_event(&mut self, card: &mut Card, kind: &str, payload: &Payload) -> bool {
        if kind != BOARD_MEMBER_REMOVED {
            return false;
        }
        let Some(user) = payload.get("user_id").and_then(Value::as_str) else {
            return false;
        };
        let user = UserId::from(user);
        if card.remove_member(&user) {
            self.members.retain(|m| *m != user);
            true
        } else {
            false
        }
    }
}
