//! Card extensions
//!
//! A card is composed from a fixed, ordered list of extensions. Each one owns
//! a slice of the card (members, cover, labels, ...), contributes to the
//! rendered view, reacts to board events and cleans up after itself when the
//! card is deleted. [`CardView`] drives the iteration.

mod fields;
mod members;
mod view;

pub use fields::{
    CommentsExtension, CoverExtension, DescriptionExtension, DueDateExtension, LabelsExtension,
    VotesExtension, WeightExtension,
};
pub use members::MembersExtension;
pub use view::CardView;

use crate::config::CardwallConfig;
use crate::context::CardwallContext;
use crate::error::Result;
use crate::types::{Card, Payload};
use async_trait::async_trait;
use serde_json::Value;

/// Event sent to every card of a board when a member leaves it
pub const BOARD_MEMBER_REMOVED: &str = "board_member_removed";

/// One pluggable facet of a card
#[async_trait]
pub trait CardExtension: Send + Sync {
    /// Key of this extension in the rendered card
    fn name(&self) -> &'static str;

    /// Capture state from the card. Called again on every refresh.
    fn on_attach(&mut self, card: &Card);

    /// Release resources owned by the card before it is removed
    async fn on_delete(&self, _ctx: &CardwallContext, _card: &Card) -> Result<()> {
        Ok(())
    }

    /// View model contributed to [`CardView::render`]
    fn on_render(&self) -> Value;

    /// React to a board event. Returns true when the card changed.
    fn handle_event(&mut self, _card: &mut Card, _kind: &str, _payload: &Payload) -> bool {
        false
    }
}

/// Builds a fresh extension instance
pub type ExtensionFactory = fn(&CardwallConfig) -> Box<dyn CardExtension>;

/// Ordered list of extension factories
#[derive(Clone, Default)]
pub struct ExtensionSet {
    factories: Vec<(&'static str, ExtensionFactory)>,
}

impl std::fmt::Debug for ExtensionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl ExtensionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every extension shipped with the engine
    pub fn builtin() -> Self {
        Self::new()
            .with("description", |_| Box::new(DescriptionExtension::default()))
            .with("due_date", |_| Box::new(DueDateExtension::default()))
            .with("members", |config| {
                Box::new(MembersExtension::new(config.max_shown_members))
            })
            .with("labels", |_| Box::new(LabelsExtension::default()))
            .with("comments", |_| Box::new(CommentsExtension::default()))
            .with("votes", |_| Box::new(VotesExtension::default()))
            .with("weight", |_| Box::new(WeightExtension::default()))
            .with("cover", |_| Box::new(CoverExtension::default()))
    }

    /// Append a factory; a factory with the same name is replaced in place
    pub fn with(mut self, name: &'static str, factory: ExtensionFactory) -> Self {
        match self.factories.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = factory,
            None => self.factories.push((name, factory)),
        }
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.iter().map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Fresh instances in registration order
    pub fn instantiate(&self, config: &CardwallConfig) -> Vec<Box<dyn CardExtension>> {
        self.factories
            .iter()
            .map(|(_, factory)| factory(config))
            .collect()
    }
}
