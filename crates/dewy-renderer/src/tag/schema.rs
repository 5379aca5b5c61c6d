//! Declarative attribute schemas for content tags.

use super::TagAttributes;

/// One attribute a tag accepts.
#[derive(Clone, Copy, Debug)]
pub struct AttributeSchema {
    pub name: &'static str,
    /// Value used when the attribute is missing or invalid.
    pub default: Option<&'static str>,
    /// Allowed values; empty accepts anything.
    pub matches: &'static [&'static str],
    pub required: bool,
}

impl AttributeSchema {
    /// Free-form optional attribute.
    #[must_use]
    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            default: None,
            matches: &[],
            required: false,
        }
    }

    /// Attribute restricted to `matches`, falling back to `default`.
    #[must_use]
    pub const fn one_of(
        name: &'static str,
        matches: &'static [&'static str],
        default: &'static str,
    ) -> Self {
        Self {
            name,
            default: Some(default),
            matches,
            required: false,
        }
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn accepts(&self, value: &str) -> bool {
        self.matches.is_empty() || self.matches.iter().any(|allowed| *allowed == value)
    }
}

/// Shape of a content tag.
#[derive(Clone, Copy, Debug)]
pub struct TagSchema {
    pub attributes: &'static [AttributeSchema],
    /// Tag never has a body (`{% name /%}`).
    pub self_closing: bool,
}

impl TagSchema {
    /// Check `attrs` and fill in defaults.
    ///
    /// Invalid values are replaced with the attribute default, unknown
    /// attributes are dropped, and each problem is reported as a warning
    /// prefixed with `tag`.
    #[must_use]
    pub fn validate(&self, tag: &str, attrs: &TagAttributes) -> (TagAttributes, Vec<String>) {
        let mut resolved = TagAttributes::default();
        let mut warnings = Vec::new();

        for (key, _) in attrs.iter() {
            let known = key == "id"
                || key == "class"
                || self.attributes.iter().any(|schema| schema.name == key);
            if !known {
                warnings.push(format!("{tag}: unknown attribute \"{key}\""));
            }
        }

        for schema in self.attributes {
            match attrs.get(schema.name) {
                Some(value) if schema.accepts(value) => {
                    resolved.insert(schema.name, value);
                }
                Some(value) => {
                    let fallback = schema.default.unwrap_or_default();
                    warnings.push(format!(
                        "{tag}: invalid value \"{value}\" for attribute \"{}\" (expected one of {}), using \"{fallback}\"",
                        schema.name,
                        schema.matches.join(", "),
                    ));
                    if let Some(default) = schema.default {
                        resolved.insert(schema.name, default);
                    }
                }
                None => {
                    if schema.required {
                        warnings.push(format!(
                            "{tag}: missing required attribute \"{}\"",
                            schema.name
                        ));
                    }
                    if let Some(default) = schema.default {
                        resolved.insert(schema.name, default);
                    }
                }
            }
        }

        for key in ["id", "class"] {
            if let Some(value) = attrs.get(key) {
                resolved.insert(key, value);
            }
        }

        (resolved, warnings)
    }
}
