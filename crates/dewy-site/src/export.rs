//! Static export of the whole site.
//!
//! Every page is written as `{output}/{path}/index.html` so that
//! `/cache/` resolves on any static file host. The root page becomes
//! `{output}/index.html`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::locale::Locale;
use crate::nav::TopNavState;
use crate::shell::GLOBALS_CSS;
use crate::site::{RenderError, Site, browser_path};

/// Error returned by [`StaticExporter`].
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// A page failed to render.
    #[error("Failed to render {path}: {source}")]
    Render {
        path: String,
        #[source]
        source: RenderError,
    },
    /// Listing pages failed.
    #[error("Failed to list pages: {0}")]
    Scan(#[source] RenderError),
    /// Writing output failed.
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Summary of a finished export.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExportReport {
    /// Number of pages written.
    pub pages: usize,
    /// Render warnings, prefixed with the page path.
    pub warnings: Vec<String>,
}

/// Writes every page of a [`Site`] to a directory.
pub struct StaticExporter<'a> {
    site: &'a Site,
    output_dir: PathBuf,
}

impl<'a> StaticExporter<'a> {
    #[must_use]
    pub fn new(site: &'a Site, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            site,
            output_dir: output_dir.into(),
        }
    }

    /// Output file for URL path `path`.
    #[must_use]
    pub fn output_path(&self, path: &str) -> PathBuf {
        let mut out = self.output_dir.clone();
        out.extend(path.split('/').filter(|segment| !segment.is_empty()));
        out.join("index.html")
    }

    /// Render and write every page plus the stylesheet.
    pub fn export(&self) -> Result<ExportReport, ExportError> {
        let pages = self.site.pages().map_err(ExportError::Scan)?;
        let mut report = ExportReport::default();

        for path in pages {
            let page = self
                .site
                .render(&path, None)
                .map_err(|source| ExportError::Render {
                    path: path.clone(),
                    source,
                })?;
            // Static pages carry no language preference; use the page's own.
            let language = Locale::from_path(&browser_path(&path));
            let html = self.site.document(&page, language, TopNavState::default());

            let target = self.output_path(&path);
            write_file(&target, html.as_bytes())?;
            tracing::debug!(path = %path, file = %target.display(), "Exported page");

            report.pages += 1;
            report
                .warnings
                .extend(page.warnings.into_iter().map(|w| format!("{}: {w}", browser_path(&path))));
        }

        write_file(&self.output_dir.join("globals.css"), GLOBALS_CSS.as_bytes())?;
        tracing::info!(pages = report.pages, dir = %self.output_dir.display(), "Export complete");
        Ok(report)
    }
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, contents).map_err(io_err)
}
