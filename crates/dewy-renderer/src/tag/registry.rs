//! Content tag handlers and their registry.

use super::{Callout, TagAttributes, TagSchema, VersionAnimation};

/// Handler for a markdoc-style content tag.
///
/// A tag with a body produces its opening markup from [`open`](Self::open)
/// and its closing markup from [`close`](Self::close); the markdown in
/// between is rendered normally. Self-closing tags only use `open`.
///
/// Attributes reach the handler already validated against
/// [`schema`](Self::schema), with defaults filled in.
///
/// # Example
///
/// ```
/// use dewy_renderer::tag::{
///     AttributeSchema, ContentTag, TagAttributes, TagProcessor, TagRegistry, TagSchema,
/// };
///
/// const BADGE_ATTRIBUTES: &[AttributeSchema] = &[AttributeSchema::optional("text")];
///
/// struct Badge;
///
/// impl ContentTag for Badge {
///     fn name(&self) -> &str { "badge" }
///     fn schema(&self) -> TagSchema {
///         TagSchema { attributes: BADGE_ATTRIBUTES, self_closing: true }
///     }
///     fn open(&mut self, attrs: &TagAttributes) -> String {
///         format!("<span class=\"badge\">{}</span>", attrs.get("text").unwrap_or_default())
///     }
/// }
///
/// let registry = TagRegistry::new().with_tag(Badge);
/// let mut processor = TagProcessor::new(registry);
/// let output = processor.process(r#"New {% badge text="beta" /%}"#);
/// assert_eq!(output, r#"New <span class="badge">beta</span>"#);
/// ```
pub trait ContentTag: Send {
    /// Tag name as written in `{% name %}`.
    fn name(&self) -> &str;

    fn schema(&self) -> TagSchema;

    /// Markup emitted for the opening (or only) tag.
    fn open(&mut self, attrs: &TagAttributes) -> String;

    /// Markup emitted for `{% /name %}`.
    fn close(&mut self) -> String {
        String::new()
    }
}

/// The set of tags a document may use.
#[derive(Default)]
pub struct TagRegistry {
    tags: Vec<Box<dyn ContentTag>>,
}

impl TagRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `callout` and `version-animation`.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new().with_tag(Callout).with_tag(VersionAnimation)
    }

    /// Register a tag. A later tag with the same name shadows an earlier one.
    #[must_use]
    pub fn with_tag<T: ContentTag + 'static>(mut self, tag: T) -> Self {
        self.tags.insert(0, Box::new(tag));
        self
    }

    /// Whether a tag with this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tags.iter().any(|tag| tag.name() == name)
    }

    /// Registered tag names, most recently registered first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|tag| tag.name())
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Box<dyn ContentTag>> {
        self.tags.iter_mut().find(|tag| tag.name() == name)
    }
}
