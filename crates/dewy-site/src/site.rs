//! Site facade: storage plus rendering configuration.
//!
//! [`Site`] turns a URL path into rendered page content, metadata and a
//! table of contents, and wraps it into a full document on request.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Datelike;
use dewy_renderer::tag::TagProcessor;
use dewy_renderer::{HeadingRecord, MarkdownRenderer};
use dewy_storage::{Storage, StorageError, StorageErrorKind};
use serde::Deserialize;

use crate::locale::Locale;
use crate::nav::{GITHUB_URL, TopNavState};
use crate::shell::{PageShell, copyright_line, edit_url, render_document};
use crate::toc::{TableOfContents, TocItemView, TocOptions, render_toc};

/// Error returned when page rendering fails.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Source file not found.
    #[error("Source file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    /// Page not found in storage.
    #[error("Page not found: {0}")]
    PageNotFound(String),
    /// I/O error reading source file.
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),
}

impl From<StorageError> for RenderError {
    fn from(e: StorageError) -> Self {
        match e.kind {
            StorageErrorKind::NotFound => {
                Self::FileNotFound(e.path.unwrap_or_default())
            }
            _ => Self::Io(std::io::Error::other(e.to_string())),
        }
    }
}

/// Configuration for [`Site`].
#[derive(Clone, Debug)]
pub struct SiteConfig {
    /// Fallback page title.
    pub title: String,
    /// Fallback page description.
    pub description: String,
    /// Base of the "edit this page" links.
    pub edit_base_url: String,
    /// Repository linked from the top navigation.
    pub repository_url: String,
    pub copyright_holder: String,
    pub copyright_start_year: i32,
    /// Heading levels shown in the table of contents.
    pub toc: TocOptions,
    /// Use the first H1 as the page title when frontmatter has none.
    pub extract_title: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Dewy".to_owned(),
            description: "Dewy enables declarative deployment of applications in non-Kubernetes environments."
                .to_owned(),
            edit_base_url: "https://github.com/linyows/dewy/edit/main/docs/pages".to_owned(),
            repository_url: GITHUB_URL.to_owned(),
            copyright_holder: "linyows".to_owned(),
            copyright_start_year: 2018,
            toc: TocOptions::default(),
            extract_title: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct Frontmatter {
    title: Option<String>,
    description: Option<String>,
}

/// Result of rendering a page.
#[derive(Clone, Debug)]
pub struct PageRenderResult {
    /// URL path of the page (`""`, `"cache"`, `"ja/cache"`).
    pub path: String,
    /// Rendered HTML content.
    pub html: String,
    /// Frontmatter title, else the first H1, else the site title.
    pub title: String,
    /// Frontmatter description, else the site description.
    pub description: String,
    /// Every heading in document order.
    pub headings: Vec<HeadingRecord>,
    /// Table of contents built from `headings`.
    pub toc: TableOfContents,
    /// Anchor the table of contents is highlighted for.
    pub anchor: Option<String>,
    /// Warnings generated during rendering.
    pub warnings: Vec<String>,
    /// Source modification time (Unix seconds).
    pub source_mtime: f64,
}

impl PageRenderResult {
    #[must_use]
    pub fn locale(&self) -> Locale {
        Locale::from_path(&browser_path(&self.path))
    }

    /// Whether the table of contents is shown.
    #[must_use]
    pub fn should_render_toc(&self) -> bool {
        self.toc.should_render()
    }

    /// Table of contents entries with active flags.
    #[must_use]
    pub fn toc_items(&self) -> Vec<TocItemView> {
        self.toc.view(self.anchor.as_deref())
    }

    /// Rendered table of contents panel, if shown.
    #[must_use]
    pub fn toc_html(&self) -> Option<String> {
        render_toc(self.toc.forest(), self.locale(), self.anchor.as_deref())
    }
}

/// Documentation site backed by a [`Storage`].
pub struct Site {
    storage: Arc<dyn Storage>,
    config: SiteConfig,
}

impl Site {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, config: SiteConfig) -> Self {
        Self { storage, config }
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// URL paths of every page, sorted.
    pub fn pages(&self) -> Result<Vec<String>, RenderError> {
        Ok(self
            .storage
            .scan()?
            .into_iter()
            .map(|doc| doc.path)
            .collect())
    }

    /// Render the page at URL path `path`.
    ///
    /// `anchor` is the fragment the reader is at (`#install` or `install`),
    /// used for table of contents highlighting. It is stored with the `#`.
    pub fn render(&self, path: &str, anchor: Option<&str>) -> Result<PageRenderResult, RenderError> {
        let path = normalize_path(path);
        if !self.storage.exists(&path) {
            return Err(RenderError::PageNotFound(path));
        }

        let source_mtime = self.storage.mtime(&path)?;
        let markdown = self.storage.read(&path)?;
        let result = self.create_renderer(&path).render_markdown(&markdown);

        let mut warnings = result.warnings;
        let frontmatter = match result.frontmatter.as_deref().map(parse_frontmatter) {
            Some(Ok(frontmatter)) => frontmatter,
            Some(Err(e)) => {
                tracing::warn!(path = %path, error = %e, "Invalid frontmatter");
                warnings.push(format!("invalid frontmatter: {e}"));
                Frontmatter::default()
            }
            None => Frontmatter::default(),
        };

        let title = frontmatter
            .title
            .or(result.title)
            .unwrap_or_else(|| self.config.title.clone());
        let description = frontmatter
            .description
            .unwrap_or_else(|| self.config.description.clone());
        let toc = TableOfContents::from_headings(&result.headings, &self.config.toc);

        tracing::debug!(path = %path, headings = result.headings.len(), "Rendered page");

        Ok(PageRenderResult {
            path,
            html: result.html,
            title,
            description,
            headings: result.headings,
            toc,
            anchor: anchor.map(|id| format!("#{}", id.trim_start_matches('#'))),
            warnings,
            source_mtime,
        })
    }

    /// Render the page at `path` as a complete HTML document.
    pub fn render_document(
        &self,
        path: &str,
        language: Locale,
        panels: TopNavState,
    ) -> Result<String, RenderError> {
        let page = self.render(path, None)?;
        Ok(self.document(&page, language, panels))
    }

    /// Wrap an already rendered page into a complete HTML document.
    #[must_use]
    pub fn document(&self, page: &PageRenderResult, language: Locale, panels: TopNavState) -> String {
        let browser = browser_path(&page.path);
        let toc = page.toc_html();
        let edit = edit_url(&self.config.edit_base_url, &page.path);
        let footer = copyright_line(
            &self.config.copyright_holder,
            self.config.copyright_start_year,
            chrono::Local::now().year(),
        );

        render_document(&PageShell {
            path: &browser,
            language,
            title: &page.title,
            description: &page.description,
            content: &page.html,
            toc: toc.as_deref(),
            edit_url: &edit,
            repository_url: &self.config.repository_url,
            footer: &footer,
            panels,
        })
    }

    fn create_renderer(&self, path: &str) -> MarkdownRenderer {
        let mut renderer = MarkdownRenderer::new()
            .with_gfm(true)
            .with_base_path(path)
            .with_tags(TagProcessor::with_builtin_tags());

        if self.config.extract_title {
            renderer = renderer.with_title_extraction();
        }

        renderer
    }
}

fn parse_frontmatter(yaml: &str) -> Result<Frontmatter, serde_yaml::Error> {
    if yaml.trim().is_empty() {
        return Ok(Frontmatter::default());
    }
    serde_yaml::from_str(yaml)
}

/// Convert a browser path (`/ja/cache/`) to a URL path (`ja/cache`).
#[must_use]
pub fn normalize_path(path: &str) -> String {
    path.trim_matches('/').to_owned()
}

/// Convert a URL path (`ja/cache`) to a browser path (`/ja/cache`).
#[must_use]
pub fn browser_path(path: &str) -> String {
    format!("/{}", path.trim_matches('/'))
}
