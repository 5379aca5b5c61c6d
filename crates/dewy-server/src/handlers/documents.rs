//! Server-rendered HTML pages.
//!
//! Readers who prefer Japanese are redirected from English pages to their
//! `/ja/` counterparts. Japanese pages are always served as is.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::{Html, IntoResponse, Response};
use dewy_site::{Locale, TopNavState, initial_redirect, normalize_path};

use crate::error::ServerError;
use crate::handlers::{compute_etag, is_not_modified, preference};
use crate::state::AppState;

/// Handle GET for any page path.
pub(crate) async fn get_document(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let browser = uri.path();
    let preferred = preference(&headers);

    if let Some(target) = initial_redirect(browser, preferred) {
        tracing::debug!(from = %browser, to = %target, "Redirecting to preferred language");
        return Ok((StatusCode::FOUND, [(header::LOCATION, target)]).into_response());
    }

    // Past the redirect, an English path means an English reader.
    let language = Locale::from_path(browser);

    let path = normalize_path(browser);
    let page = state
        .site
        .render(&path, None)
        .map_err(|e| ServerError::from_render(browser, e))?;
    state.report_warnings(&page.path, &page.warnings);

    let html = state.site.document(&page, language, TopNavState::default());
    let etag = compute_etag(&state.version, &html);
    if is_not_modified(&headers, &etag) {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    Ok((
        [
            (header::ETAG, etag),
            (header::CACHE_CONTROL, "private, max-age=60".to_owned()),
            (header::VARY, "Cookie, Accept-Language".to_owned()),
        ],
        Html(html),
    )
        .into_response())
}
