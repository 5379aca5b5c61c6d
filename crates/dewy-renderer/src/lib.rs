//! Markdown renderer for the Dewy documentation site.
//!
//! This crate provides a [`MarkdownRenderer`] that turns page markdown into the
//! HTML fragments the site shell embeds:
//!
//! - headings with anchor ids, collected as [`HeadingRecord`]s for the
//!   table of contents
//! - code blocks wrapped for the code-block component
//! - tables wrapped for the table component
//! - GitHub alert blockquotes rendered as callouts
//! - markdoc-style content tags (`{% callout %}`) through the [`tag`] registry
//!
//! # Example
//!
//! ```
//! use dewy_renderer::MarkdownRenderer;
//! use dewy_renderer::tag::TagProcessor;
//!
//! let markdown = "# Cache\n\n## Memory\n\n{% callout type=\"warning\" %}\nVolatile.\n{% /callout %}\n";
//! let result = MarkdownRenderer::new()
//!     .with_title_extraction()
//!     .with_tags(TagProcessor::with_builtin_tags())
//!     .render_markdown(markdown);
//!
//! assert_eq!(result.title.as_deref(), Some("Cache"));
//! assert_eq!(result.headings.len(), 2);
//! assert!(result.html.contains(r#"class="callout warning""#));
//! ```

mod fence;
mod html;
mod renderer;
mod state;
pub mod tag;

pub use html::CalloutKind;
pub use renderer::{MarkdownRenderer, RenderResult};
pub use state::{HeadingRecord, escape_html, slugify};
