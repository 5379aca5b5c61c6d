//! Tag attribute parsing.
//!
//! Parses the attribute part of `{% name key="value" flag #id .class %}`.

use std::collections::BTreeMap;

/// Attributes written on a content tag.
///
/// Shorthands follow markdoc: `#id` sets `id`, `.class` appends to `class`,
/// and a bare key is a `true` flag.
///
/// # Example
///
/// ```
/// use dewy_renderer::tag::TagAttributes;
///
/// let attrs = TagAttributes::parse(r#"type="warning" title='Read me' #top .wide"#);
/// assert_eq!(attrs.get("type"), Some("warning"));
/// assert_eq!(attrs.get("title"), Some("Read me"));
/// assert_eq!(attrs.get("id"), Some("top"));
/// assert_eq!(attrs.get("class"), Some("wide"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagAttributes {
    values: BTreeMap<String, String>,
}

impl TagAttributes {
    /// Parse an attribute string (the text between the tag name and `%}`).
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let mut attrs = Self::default();
        let mut remaining = input.trim();

        while !remaining.is_empty() {
            if let Some(rest) = remaining.strip_prefix('#') {
                let (value, rest) = split_word(rest);
                attrs.insert("id", value);
                remaining = rest;
            } else if let Some(rest) = remaining.strip_prefix('.') {
                let (value, rest) = split_word(rest);
                attrs.push_class(value);
                remaining = rest;
            } else if let Some((key, value, rest)) = parse_key_value(remaining) {
                attrs.insert(key, value);
                remaining = rest;
            } else {
                let (flag, rest) = split_word(remaining);
                if rest.starts_with('=') {
                    // Malformed value such as an unterminated quote.
                    break;
                }
                if flag.is_empty() {
                    // Not a word start; skip one character.
                    let skip = remaining.chars().next().map_or(1, char::len_utf8);
                    remaining = &remaining[skip..];
                } else {
                    attrs.insert(flag, "true");
                    remaining = rest;
                }
            }
            remaining = remaining.trim_start();
        }

        attrs
    }

    /// Get an attribute value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Set an attribute, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Iterate attributes in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn push_class(&mut self, class: &str) {
        if class.is_empty() {
            return;
        }
        self.values
            .entry("class".to_owned())
            .and_modify(|existing| {
                existing.push(' ');
                existing.push_str(class);
            })
            .or_insert_with(|| class.to_owned());
    }
}

/// Split off a shorthand word (`top` in `#top .wide`).
fn split_word(s: &str) -> (&str, &str) {
    let end = s
        .find(|c: char| c.is_whitespace() || c == '#' || c == '.' || c == '=')
        .unwrap_or(s.len());
    (&s[..end], &s[end..])
}

/// Parse `key="value"`, `key='value'` or `key=value`.
fn parse_key_value(s: &str) -> Option<(&str, &str, &str)> {
    let (key, _) = split_word(s);
    if key.is_empty() {
        return None;
    }
    let after_eq = s[key.len()..].strip_prefix('=')?;

    for quote in ['"', '\''] {
        if let Some(stripped) = after_eq.strip_prefix(quote) {
            let end = stripped.find(quote)?;
            return Some((key, &stripped[..end], &stripped[end + 1..]));
        }
    }

    let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
    Some((key, &after_eq[..end], &after_eq[end..]))
}
