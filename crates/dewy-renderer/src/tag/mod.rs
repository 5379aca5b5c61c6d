//! Markdoc-style content tags.
//!
//! Pages can embed components with tag syntax that pulldown-cmark does not
//! understand:
//!
//! ```text
//! {% callout type="warning" title="Registry credentials" %}
//! Keep tokens out of the repository.
//! {% /callout %}
//!
//! {% version-animation /%}
//! ```
//!
//! [`TagProcessor`] expands these into HTML before parsing. Each tag is a
//! [`ContentTag`] registered in a [`TagRegistry`] and described by a
//! [`TagSchema`] that validates its attributes.

mod args;
mod callout;
mod parser;
mod processor;
mod registry;
mod schema;
mod version_animation;

pub use args::TagAttributes;
pub use callout::Callout;
pub use processor::TagProcessor;
pub use registry::{ContentTag, TagRegistry};
pub use schema::{AttributeSchema, TagSchema};
pub use version_animation::VersionAnimation;
