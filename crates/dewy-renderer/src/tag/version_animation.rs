//! The `version-animation` tag.

use super::{AttributeSchema, ContentTag, TagAttributes, TagSchema};
use crate::state::escape_html;

const ATTRIBUTES: &[AttributeSchema] = &[AttributeSchema::optional("className")];

/// `{% version-animation /%}`: mount point for the semantic version counter.
pub struct VersionAnimation;

impl ContentTag for VersionAnimation {
    fn name(&self) -> &str {
        "version-animation"
    }

    fn schema(&self) -> TagSchema {
        TagSchema {
            attributes: ATTRIBUTES,
            self_closing: true,
        }
    }

    fn open(&mut self, attrs: &TagAttributes) -> String {
        match attrs.get("className").filter(|c| !c.is_empty()) {
            Some(class) => format!(
                r#"<div class="version-animation {}"></div>"#,
                escape_html(class)
            ),
            None => r#"<div class="version-animation"></div>"#.to_owned(),
        }
    }
}
