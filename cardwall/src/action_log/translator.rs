//! Localization hook for rendered events

use std::collections::HashMap;

/// Maps a message template to its localized form.
///
/// Templates are liquid; a translation must keep their `{{ name }}` variables.
pub trait Translator: Send + Sync {
    fn translate<'a>(&'a self, template: &'a str) -> &'a str;
}

/// Returns templates unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn translate<'a>(&'a self, template: &'a str) -> &'a str {
        template
    }
}

/// Translator backed by an in-memory catalog; unknown templates pass through
#[derive(Debug, Clone, Default)]
pub struct CatalogTranslator {
    catalog: HashMap<String, String>,
}

impl CatalogTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, template: impl Into<String>, translation: impl Into<String>) -> Self {
        self.catalog.insert(template.into(), translation.into());
        self
    }
}

impl Translator for CatalogTranslator {
    fn translate<'a>(&'a self, template: &'a str) -> &'a str {
        self.catalog
            .get(template)
            .map(String::as_str)
            .unwrap_or(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_falls_back_to_template() {
        let translator =
            CatalogTranslator::new().with("Hello {{ user }}", "Bonjour {{ user }}");
        assert_eq!(translator.translate("Hello {{ user }}"), "Bonjour {{ user }}");
        assert_eq!(translator.translate("Bye"), "Bye");
        assert_eq!(IdentityTranslator.translate("Bye"), "Bye");
    }
}
