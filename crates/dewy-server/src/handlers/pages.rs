//! Pages API endpoint.
//!
//! Returns page metadata, collected headings and the table of contents
//! (with active flags for `?anchor=`) as JSON.

use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use dewy_site::{HeadingRecord, Locale, TocItemView, browser_path};
use serde::{Deserialize, Serialize};

use crate::error::ServerError;
use crate::handlers::{compute_etag, is_not_modified};
use crate::state::AppState;

/// Query parameters for the pages API.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PageQuery {
    /// Heading id the reader is at, without `#`.
    anchor: Option<String>,
}

/// Response for GET /api/pages/{path}.
#[derive(Serialize)]
struct PageResponse {
    meta: PageMeta,
    headings: Vec<HeadingRecord>,
    toc: TocResponse,
    /// Rendered HTML content.
    content: String,
}

/// Page metadata.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageMeta {
    title: String,
    description: String,
    /// URL path with leading slash.
    path: String,
    locale: Locale,
    /// Last modification time (ISO 8601).
    last_modified: String,
}

/// Table of contents and whether it is shown.
#[derive(Serialize)]
struct TocResponse {
    render: bool,
    items: Vec<TocItemView>,
}

/// Handle GET /api/pages/ (root page).
pub(crate) async fn get_root_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    get_page_impl(String::new(), &state, query, &headers)
}

/// Handle GET /api/pages/{path}.
pub(crate) async fn get_page(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    get_page_impl(path, &state, query, &headers)
}

fn get_page_impl(
    path: String,
    state: &AppState,
    query: PageQuery,
    headers: &HeaderMap,
) -> Result<Response, ServerError> {
    let anchor = query.anchor.map(|id| format!("#{}", id.trim_start_matches('#')));
    let result = state
        .site
        .render(&path, anchor.as_deref())
        .map_err(|e| ServerError::from_render(&browser_path(&path), e))?;
    state.report_warnings(&result.path, &result.warnings);

    let etag = compute_etag(
        &state.version,
        &format!("{}{}", anchor.as_deref().unwrap_or_default(), result.html),
    );
    if is_not_modified(headers, &etag) {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let source_mtime = UNIX_EPOCH + Duration::from_secs_f64(result.source_mtime.max(0.0));
    let last_modified: DateTime<Utc> = source_mtime.into();

    let response = PageResponse {
        meta: PageMeta {
            locale: result.locale(),
            path: browser_path(&result.path),
            last_modified: last_modified.to_rfc3339(),
            title: result.title.clone(),
            description: result.description.clone(),
        },
        toc: TocResponse {
            render: result.should_render_toc(),
            items: result.toc_items(),
        },
        headings: result.headings,
        content: result.html,
    };

    Ok((
        [
            (header::ETAG, etag),
            (
                header::LAST_MODIFIED,
                last_modified
                    .format("%a, %d %b %Y %H:%M:%S GMT")
                    .to_string(),
            ),
            (header::CACHE_CONTROL, "private, max-age=60".to_owned()),
        ],
        Json(response),
    )
        .into_response())
}
