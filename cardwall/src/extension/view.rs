//! Card composed from its extensions

use super::CardExtension;
use crate::context::CardwallContext;
use crate::error::Result;
use crate::types::{Card, CardId, Payload};
use serde_json::{json, Value};
use tracing::debug;

/// A card together with its attached extensions
pub struct CardView {
    card: Card,
    extensions: Vec<Box<dyn CardExtension>>,
}

impl std::fmt::Debug for CardView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.extensions.iter().map(|e| e.name()).collect();
        f.debug_struct("CardView")
            .field("card", &self.card.id)
            .field("extensions", &names)
            .finish()
    }
}

impl CardView {
    /// Attach the context's extensions to an in-memory card
    pub fn new(ctx: &CardwallContext, card: Card) -> Self {
        let mut extensions = ctx.extensions().instantiate(ctx.config());
        for extension in &mut extensions {
            extension.on_attach(&card);
        }
        Self { card, extensions }
    }

    pub async fn load(ctx: &CardwallContext, id: &CardId) -> Result<Self> {
        let card = ctx.read_card(id).await?;
        Ok(Self::new(ctx, card))
    }

    pub fn card(&self) -> &Card {
        &self.card
    }

    pub fn into_card(self) -> Card {
        self.card
    }

    /// Re-read the card and re-attach every extension. Idempotent.
    pub async fn refresh(&mut self, ctx: &CardwallContext) -> Result<()> {
        self.card = ctx.read_card(&self.card.id).await?;
        for extension in &mut self.extensions {
            extension.on_attach(&self.card);
        }
        Ok(())
    }

    /// Card fields plus one key per extension
    pub fn render(&self) -> Value {
        let mut view = json!({
            "id": self.card.id,
            "board": self.card.board,
            "column": self.card.column,
            "index": self.card.index,
            "title": self.card.title,
            "archived": self.card.archived,
        });
        for extension in &self.extensions {
            view[extension.name()] = extension.on_render();
        }
        view
    }

    /// Offer an event to every extension; persists the card when one changed it
    pub async fn emit_event(
        &mut self,
        ctx: &CardwallContext,
        kind: &str,
        payload: &Payload,
    ) -> Result<bool> {
        let mut changed = false;
        for extension in &mut self.extensions {
            changed |= extension.handle_event(&mut self.card, kind, payload);
        }
        if changed {
            ctx.write_card(&self.card).await?;
            debug!(card = %self.card.id, kind, "card updated by event");
        }
        Ok(changed)
    }

    /// Run every extension's delete hook, then remove the card
    pub async fn delete(self, ctx: &CardwallContext) -> Result<Card> {
        for extension in &self.extensions {
            extension.on_delete(ctx, &self.card).await?;
        }
        ctx.delete_card_file(&self.card.id).await?;
        debug!(card = %self.card.id, "deleted card");
        Ok(self.card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action_log::payload;
    use crate::extension::BOARD_MEMBER_REMOVED;
    use crate::types::{BoardId, ColumnId, UserId};
    use tempfile::TempDir;

    fn setup() -> (TempDir, CardwallContext) {
        let temp = TempDir::new().unwrap();
        let ctx = CardwallContext::new(temp.path().join(".cardwall"));
        (temp, ctx)
    }

    #[tokio::test]
    async fn test_render_has_extension_keys() {
        let (_temp, ctx) = setup();
        let card = Card::new(BoardId::new(), ColumnId::new(), "Render me").with_description("body");
        let view = CardView::new(&ctx, card);

        let rendered = view.render();
        assert_eq!(rendered["title"], "Render me");
        assert_eq!(rendered["description"]["text"], "body");
        for key in ["due_date", "members", "labels", "comments", "votes", "weight", "cover"] {
            assert!(rendered.get(key).is_some(), "missing {key}");
        }
    }

    #[tokio::test]
    async fn test_refresh_is_idempotent() {
        let (_temp, ctx) = setup();
        let card = Card::new(BoardId::new(), ColumnId::new(), "Before");
        ctx.write_card(&card).await.unwrap();

        let mut view = CardView::load(&ctx, &card.id).await.unwrap();
        let mut changed = card.clone();
        changed.title = "After".into();
        ctx.write_card(&changed).await.unwrap();

        view.refresh(&ctx).await.unwrap();
        let once = view.render();
        view.refresh(&ctx).await.unwrap();
        assert_eq!(view.render(), once);
        assert_eq!(once["title"], "After");
    }

    #[tokio::test]
    async fn test_emit_event_persists_change() {
        let (_temp, ctx) = setup();
        let mut card = Card::new(BoardId::new(), ColumnId::new(), "Shared");
        card.members.push(UserId::from("alice"));
        ctx.write_card(&card).await.unwrap();

        let mut view = CardView::load(&ctx, &card.id).await.unwrap();
        let changed = view
            .emit_event(&ctx, BOARD_MEMBER_REMOVED, &payload(json!({"user_id": "alice"})))
            .await
            .unwrap();
        assert!(changed);
        assert!(ctx.read_card(&card.id).await.unwrap().members.is_empty());
    }

    #[tokio::test]
    async fn test_delete_releases_cover() {
        let (_temp, ctx) = setup();
        let asset = ctx.assets().put("c.png", b"x").await.unwrap();
        let mut card = Card::new(BoardId::new(), ColumnId::new(), "Doomed");
        card.cover = Some(asset.clone());
        ctx.write_card(&card).await.unwrap();

        CardView::load(&ctx, &card.id).await.unwrap().delete(&ctx).await.unwrap();
        assert!(!ctx.assets().exists(&asset).await);
        assert!(ctx.read_card(&card.id).await.unwrap_err().is_not_found());
    }
}
