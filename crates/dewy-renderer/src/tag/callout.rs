//! The `callout` tag.

use super::{AttributeSchema, ContentTag, TagAttributes, TagSchema};
use crate::html::{CalloutKind, callout_end, callout_start};

const TYPES: &[&str] = &["caution", "check", "note", "warning"];

const ATTRIBUTES: &[AttributeSchema] = &[
    AttributeSchema::one_of("type", TYPES, "note"),
    AttributeSchema::optional("title"),
];

/// `{% callout type="warning" title="..." %} ... {% /callout %}`
///
/// `type` defaults to `note`; an unsupported type falls back to the default
/// with a warning.
pub struct Callout;

impl ContentTag for Callout {
    fn name(&self) -> &str {
        "callout"
    }

    fn schema(&self) -> TagSchema {
        TagSchema {
            attributes: ATTRIBUTES,
            self_closing: false,
        }
    }

    fn open(&mut self, attrs: &TagAttributes) -> String {
        let kind = attrs
            .get("type")
            .and_then(CalloutKind::parse)
            .unwrap_or_default();
        let mut out = String::new();
        callout_start(kind, attrs.get("title"), &mut out);
        out
    }

    fn close(&mut self) -> String {
        let mut out = String::new();
        callout_end(&mut out);
        out
    }
}
