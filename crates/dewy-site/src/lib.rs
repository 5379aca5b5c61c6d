//! Page assembly for the Dewy documentation site.
//!
//! This crate provides:
//! - [`Site`]: renders pages from a [`dewy_storage::Storage`] into content,
//!   metadata and a table of contents
//! - Table of contents construction ([`build_forest`], [`TableOfContents`])
//! - Collapsible panels for the top navigation ([`Panel`], [`EventHub`])
//! - Locale detection and language switching ([`Locale`], [`switch_path`])
//! - Side and top navigation, the page shell, and [`StaticExporter`]
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use dewy_site::{Locale, Site, SiteConfig, TopNavState};
//! use dewy_storage::FsStorage;
//!
//! let storage = Arc::new(FsStorage::new(PathBuf::from("pages")));
//! let site = Site::new(storage, SiteConfig::default());
//!
//! // Content, headings and table of contents
//! let page = site.render("ja/cache", Some("#memory"))?;
//! let toc = page.toc_items();
//!
//! // Complete HTML document
//! let html = site.render_document("cache", Locale::En, TopNavState::default())?;
//! # Ok(())
//! # }
//! ```

mod export;
mod locale;
mod nav;
mod panel;
mod shell;
mod site;
mod toc;

pub use export::{ExportError, ExportReport, StaticExporter};
pub use locale::{LANGUAGE_COOKIE, Locale, initial_redirect, is_japanese_path, preferred_locale, switch_path};
pub use nav::{
    GITHUB_URL, NavLink, NavSection, TopNavLink, TopNavState, render_side_nav, render_top_nav,
    side_sections, top_links,
};
pub use panel::{
    ClickTarget, EventHub, MountedPanel, PageEvent, Panel, PanelEvent, PanelId, PanelState,
    Subscription, TopNavPanels, transition,
};
pub use shell::{GLOBALS_CSS, PageShell, copyright_line, edit_url, render_document};
pub use site::{PageRenderResult, RenderError, Site, SiteConfig, browser_path, normalize_path};
pub use toc::{
    TableOfContents, TocItemView, TocNode, TocOptions, build_forest, filter_headings,
    render_toc, should_render,
};

// Re-export HeadingRecord from dewy-renderer for convenience
pub use dewy_renderer::HeadingRecord;
