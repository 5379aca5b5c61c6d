//! Language selection.
//!
//! `GET /lang/{lang}?from=/path` stores the choice in a cookie and sends the
//! reader to the same page in the chosen language.

use axum::extract::{Path, Query};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use dewy_site::{LANGUAGE_COOKIE, Locale, switch_path};
use serde::Deserialize;

use crate::error::ServerError;

/// One year, in seconds.
const COOKIE_MAX_AGE: u32 = 31_536_000;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LanguageQuery {
    /// Path the reader switched from.
    from: Option<String>,
}

/// Handle GET /lang/{lang}.
pub(crate) async fn set_language(
    Path(lang): Path<String>,
    Query(query): Query<LanguageQuery>,
) -> Result<Response, ServerError> {
    let locale = Locale::from_code(&lang).ok_or(ServerError::UnknownLanguage(lang))?;
    let from = query
        .from
        .filter(|from| is_local_path(from))
        .unwrap_or_else(|| "/".to_owned());
    let target = switch_path(&from, locale).unwrap_or(from);

    let cookie = format!(
        "{LANGUAGE_COOKIE}={}; Path=/; Max-Age={COOKIE_MAX_AGE}; SameSite=Lax",
        locale.code()
    );
    Ok((
        StatusCode::FOUND,
        [(header::SET_COOKIE, cookie), (header::LOCATION, target)],
    )
        .into_response())
}

/// Only same-site absolute paths are followed.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}
