//! Single-field card facets

use super::CardExtension;
use crate::context::CardwallContext;
use crate::error::Result;
use crate::types::{AssetId, Card, Comment, LabelId, UserId};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde_json::{json, Value};
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct DescriptionExtension {
    text: String,
}

impl CardExtension for DescriptionExtension {
    fn name(&self) -> &'static str {
        "description"
    }

    fn on_attach(&mut self, card: &Card) {
        self.text = card.description.clone();
    }

    fn on_render(&self) -> Value {
        json!({ "text": self.text, "empty": self.text.trim().is_empty() })
    }
}

#[derive(Debug, Clone, Default)]
pub struct DueDateExtension {
    due_date: Option<NaiveDate>,
}

impl CardExtension for DueDateExtension {
    fn name(&self) -> &'static str {
        "due_date"
    }

    fn on_attach(&mut self, card: &Card) {
        self.due_date = card.due_date;
    }

    fn on_render(&self) -> Value {
        let today = Utc::now().date_naive();
        json!({
            "date": self.due_date,
            "overdue": self.due_date.is_some_and(|d| d < today),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct LabelsExtension {
    labels: BTreeSet<LabelId>,
}

impl CardExtension for LabelsExtension {
    fn name(&self) -> &'static str {
        "labels"
    }

    fn on_attach(&mut self, card: &Card) {
        self.labels = card.labels.clone();
    }

    fn on_render(&self) -> Value {
        json!(self.labels)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommentsExtension {
    comments: Vec<Comment>,
}

impl CardExtension for CommentsExtension {
    fn name(&self) -> &'static str {
        "comments"
    }

    fn on_attach(&mut self, card: &Card) {
        self.comments = card.comments.clone();
    }

    fn on_render(&self) -> Value {
        json!({ "count": self.comments.len(), "items": self.comments })
    }
}

#[derive(Debug, Clone, Default)]
pub struct VotesExtension {
    voters: BTreeSet<UserId>,
}

impl CardExtension for VotesExtension {
    fn name(&self) -> &'static str {
        "votes"
    }

    fn on_attach(&mut self, card: &Card) {
        self.voters = card.votes.clone();
    }

    fn on_render(&self) -> Value {
        json!({ "count": self.voters.len(), "voters": self.voters })
    }
}

#[derive(Debug, Clone, Default)]
pub struct WeightExtension {
    weight: Option<i64>,
}

impl CardExtension for WeightExtension {
    fn name(&self) -> &'static str {
        "weight"
    }

    fn on_attach(&mut self, card: &Card) {
        self.weight = card.weight;
    }

    fn on_render(&self) -> Value {
        json!(self.weight)
    }
}

/// Cover image; owns the asset and releases it with the card
#[derive(Debug, Clone, Default)]
pub struct CoverExtension {
    cover: Option<AssetId>,
}

#[async_trait]
impl CardExtension for CoverExtension {
    fn name(&self) -> &'static str {
        "cover"
    }

    fn on_attach(&mut self, card: &Card) {
        self.cover = card.cover.clone();
    }

    async fn on_delete(&self, ctx: &CardwallContext, card: &Card) -> Result<()> {
        if let Some(cover) = &card.cover {
            debug!(card = %card.id, asset = %cover, "releasing cover");
            ctx.assets().remove(cover).await?;
        }
        Ok(())
    }

    fn on_render(&self) -> Value {
        json!(self.cover)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BoardId, ColumnId};
    use chrono::Duration;

    #[test]
    fn test_due_date_overdue() {
        let mut card = Card::new(BoardId::new(), ColumnId::new(), "Late");
        card.due_date = Some(Utc::now().date_naive() - Duration::days(2));

        let mut ext = DueDateExtension::default();
        ext.on_attach(&card);
        assert_eq!(ext.on_render()["overdue"], true);

        card.due_date = None;
        ext.on_attach(&card);
        assert_eq!(ext.on_render()["overdue"], false);
    }

    #[test]
    fn test_votes_count() {
        let mut card = Card::new(BoardId::new(), ColumnId::new(), "Popular");
        card.votes.insert(UserId::from("a"));
        card.votes.insert(UserId::from("b"));

        let mut ext = VotesExtension::default();
        ext.on_attach(&card);
        assert_eq!(ext.on_render()["count"], 2);
    }

    #[tokio::test]
    async fn test_cover_released_on_delete() {
        let temp = tempfile::TempDir::new().unwrap();
        let ctx = CardwallContext::new(temp.path().join(".cardwall"));
        let asset = ctx.assets().put("cover.png", b"img").await.unwrap();

        let mut card = Card::new(BoardId::new(), ColumnId::new(), "Covered");
        card.cover = Some(asset.clone());

        let mut ext = CoverExtension::default();
        ext.on_attach(&card);
        ext.on_delete(&ctx, &card).await.unwrap();
        assert!(!ctx.assets().exists(&asset).await);
    }
}
