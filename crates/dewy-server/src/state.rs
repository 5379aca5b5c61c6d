//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use dewy_site::Site;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Site for page rendering.
    pub(crate) site: Arc<Site>,
    /// Enable verbose output (show warnings).
    pub(crate) verbose: bool,
    /// Application version for cache invalidation.
    pub(crate) version: String,
}

impl AppState {
    /// Log render warnings for `path` in verbose mode.
    pub(crate) fn report_warnings(&self, path: &str, warnings: &[String]) {
        if !self.verbose {
            return;
        }
        for warning in warnings {
            tracing::warn!(path = %path, warning = %warning, "Page render warning");
        }
    }
}
