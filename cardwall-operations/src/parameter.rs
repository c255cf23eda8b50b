//! Parameter metadata derived from command struct fields

/// JSON-ish type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
}

impl ParamType {
    /// Lowercase name as used in JSON schema
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
        }
    }
}

/// A single parameter of a command
#[derive(Debug, Clone)]
pub struct ParamMeta {
    pub name: &'static str,
    /// From the field's doc comment
    pub description: &'static str,
    pub param_type: ParamType,
    /// False for `Option<T>` fields
    pub required: bool,
    pub short: Option<char>,
    pub aliases: &'static [&'static str],
}

impl ParamMeta {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            description: "",
            param_type: ParamType::String,
            required: false,
            short: None,
            aliases: &[],
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn description(mut self, desc: &'static str) -> Self {
        self.description = desc;
        self
    }

    pub const fn param_type(mut self, t: ParamType) -> Self {
        self.param_type = t;
        self
    }

    pub const fn aliases(mut self, a: &'static [&'static str]) -> Self {
        self.aliases = a;
        self
    }

    /// Short flag from an Option (what the macro emits)
    pub const fn short_opt(mut self, c: Option<char>) -> Self {
        self.short = c;
        self
    }

    /// Whether `name` matches this parameter or one of its aliases
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_aliases() {
        const META: ParamMeta = ParamMeta::new("title")
            .description("Card title")
            .required()
            .aliases(&["name"]);
        assert!(META.required);
        assert!(META.answers_to("title"));
        assert!(META.answers_to("name"));
        assert!(!META.answers_to("body"));
        assert_eq!(META.param_type.as_str(), "string");
    }
}
