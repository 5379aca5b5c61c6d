//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dewy_site::RenderError;
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Page not found at the given path.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// Language code other than `en` or `ja`.
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    /// Render error from dewy-site.
    #[error("Render error: {0}")]
    Render(#[source] RenderError),
}

impl ServerError {
    /// Classify a render failure for the page at `path`.
    pub(crate) fn from_render(path: &str, err: RenderError) -> Self {
        match err {
            RenderError::PageNotFound(_) | RenderError::FileNotFound(_) => {
                Self::PageNotFound(path.to_owned())
            }
            RenderError::Io(_) => Self::Render(err),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::PageNotFound(path) => (
                StatusCode::NOT_FOUND,
                json!({"error": "Page not found", "path": path}),
            ),
            Self::UnknownLanguage(lang) => (
                StatusCode::BAD_REQUEST,
                json!({"error": "Unknown language", "language": lang}),
            ),
            Self::Render(e) => {
                tracing::error!(error = %e, "Render failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": e.to_string()}),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}
