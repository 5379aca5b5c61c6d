//! Bundled stylesheet.

use axum::http::header;
use axum::response::IntoResponse;
use dewy_site::GLOBALS_CSS;

/// Handle GET /globals.css.
pub(crate) async fn globals_css() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/css; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        GLOBALS_CSS,
    )
}
