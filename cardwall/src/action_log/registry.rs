//! Registry of action formatters

use super::translator::Translator;
use crate::error::{CardwallError, Result};
use crate::types::{ActionLogEntry, Payload};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Turns an action payload into a human-readable message
pub type Formatter = Arc<dyn Fn(&Payload, &dyn Translator) -> Result<String> + Send + Sync>;

/// Action kind -> formatter.
///
/// Feature modules contribute their own formatters through a
/// `register_events` function; [`EventRegistry::builtin`] collects them all.
#[derive(Clone, Default)]
pub struct EventRegistry {
    formatters: HashMap<String, Formatter>,
}

impl fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.formatters.keys().collect();
        kinds.sort();
        f.debug_struct("EventRegistry").field("kinds", &kinds).finish()
    }
}

impl EventRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every formatter shipped by the engine
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        crate::board::register_events(&mut registry);
        crate::column::register_events(&mut registry);
        crate::card::register_events(&mut registry);
        crate::member::register_events(&mut registry);
        crate::label::register_events(&mut registry);
        crate::comment::register_events(&mut registry);
        registry
    }

    /// Register (or replace) the formatter for `kind`
    pub fn register<F>(&mut self, kind: impl Into<String>, formatter: F)
    where
        F: Fn(&Payload, &dyn Translator) -> Result<String> + Send + Sync + 'static,
    {
        self.formatters.insert(kind.into(), Arc::new(formatter));
    }

    /// Register a formatter that translates and interpolates a fixed template
    pub fn register_template(&mut self, kind: impl Into<String>, template: &'static str) {
        self.register(kind, move |payload, translator| {
            interpolate(translator.translate(template), payload)
        });
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.formatters.contains_key(kind)
    }

    /// Render a payload for an action kind
    pub fn render_payload(
        &self,
        kind: &str,
        payload: &Payload,
        translator: &dyn Translator,
    ) -> Result<String> {
        let formatter = self
            .formatters
            .get(kind)
            .ok_or_else(|| CardwallError::UnknownAction {
                action: kind.to_string(),
            })?;
        formatter(payload, translator)
    }

    /// Render a log entry
    pub fn render(&self, entry: &ActionLogEntry, translator: &dyn Translator) -> Result<String> {
        self.render_payload(&entry.action, &entry.payload, translator)
    }
}

/// Render a liquid template against the payload.
///
/// Payload keys are top-level variables. Null values render empty; a
/// variable absent from the payload is a [`CardwallError::MissingField`].
pub fn interpolate(template: &str, payload: &Payload) -> Result<String> {
    let parsed = liquid::ParserBuilder::with_stdlib()
        .build()
        .and_then(|parser| parser.parse(template))
        .map_err(|e| CardwallError::invalid_value("template", e.to_string()))?;

    let mut globals = liquid::Object::new();
    for (key, value) in payload {
        globals.insert(
            key.clone().into(),
            liquid::model::to_value(value).unwrap_or(liquid::model::Value::Nil),
        );
    }

    parsed.render(&globals).map_err(render_error)
}

fn render_error(error: liquid::Error) -> CardwallError {
    let message = error.to_string();
    if !message.contains("Unknown variable") {
        return CardwallError::invalid_value("template", message);
    }
    let field = message
        .lines()
        .find_map(|line| line.trim().strip_prefix("requested variable="))
        .unwrap_or("template");
    CardwallError::missing_field(field.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action_log::{CatalogTranslator, IdentityTranslator};
    use serde_json::{json, Value};

    fn payload(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            _ => panic!("payload must be an object"),
        }
    }

    #[test]
    fn test_interpolate() {
        let p = payload(json!({"card": "Fix bug", "from": null, "to": 3}));
        let text = interpolate(
            "Card \"{{ card }}\" weighted from ({{ from }}) to ({{ to }})",
            &p,
        )
        .unwrap();
        assert_eq!(text, "Card \"Fix bug\" weighted from () to (3)");
    }

    #[test]
    fn test_interpolate_raw_braces() {
        let p = Payload::new();
        assert_eq!(
            interpolate("{% raw %}{{ literal }}{% endraw %}", &p).unwrap(),
            "{{ literal }}"
        );
    }

    #[test]
    fn test_interpolate_filters() {
        let p = payload(json!({"user": "alice"}));
        assert_eq!(interpolate("{{ user | upcase }}", &p).unwrap(), "ALICE");
    }

    #[test]
    fn test_interpolate_missing_field() {
        let p = payload(json!({"card": "x"}));
        let err = interpolate("{{ card }} by {{ user }}", &p).unwrap_err();
        assert!(matches!(err, CardwallError::MissingField { ref field } if field == "user"));
    }

    #[test]
    fn test_interpolate_syntax_error() {
        let err = interpolate("{{ card", &Payload::new()).unwrap_err();
        assert!(matches!(
            err,
            CardwallError::InvalidValue { ref field, .. } if field == "template"
        ));
    }

    #[test]
    fn test_unknown_action() {
        let registry = EventRegistry::new();
        let err = registry
            .render_payload("nope", &Payload::new(), &IdentityTranslator)
            .unwrap_err();
        assert!(matches!(err, CardwallError::UnknownAction { .. }));
    }

    #[test]
    fn test_registered_template_is_translated() {
        let mut registry = EventRegistry::new();
        registry.register_template("greet", "Hello {{ user }}");
        let translator =
            CatalogTranslator::new().with("Hello {{ user }}", "Salut {{ user }}");

        let p = payload(json!({"user": "Alice"}));
        assert_eq!(
            registry.render_payload("greet", &p, &translator).unwrap(),
            "Salut Alice"
        );
    }

    #[test]
    fn test_builtin_covers_card_kinds() {
        let registry = EventRegistry::builtin();
        for kind in [
            "card_create",
            "card_title",
            "card_weight",
            "card_move",
            "card_archive",
            "card_delete",
            "card_due_date",
            "card_add_member",
            "card_remove_member",
            "card_add_label",
            "card_remove_label",
            "card_add_comment",
            "card_vote",
            "card_cover",
            "board_create",
            "board_add_member",
            "column_create",
        ] {
            assert!(registry.contains(kind), "missing formatter for {kind}");
        }
    }
}
