//! HTTP request handlers.

pub(crate) mod documents;
pub(crate) mod language;
pub(crate) mod pages;

use axum::http::{HeaderMap, header};
use dewy_site::{LANGUAGE_COOKIE, Locale, preferred_locale};
use md5::{Digest, Md5};

/// Value of cookie `name` from the `Cookie` header.
pub(crate) fn cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
}

/// Reader's language preference from the stored cookie and `Accept-Language`.
pub(crate) fn preference(headers: &HeaderMap) -> Locale {
    let accept = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok());
    preferred_locale(cookie(headers, LANGUAGE_COOKIE), accept)
}

/// Compute `ETag` from version and content.
///
/// Uses MD5 hash truncated to 64 bits (16 hex chars) - sufficient for
/// cache invalidation with negligible collision probability.
pub(crate) fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}

/// Whether the request's `If-None-Match` matches `etag`.
pub(crate) fn is_not_modified(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get(header::IF_NONE_MATCH)
        .is_some_and(|value| value.as_bytes() == etag.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use pretty_assertions::assert_eq;

    fn headers(pairs: &[(header::HeaderName, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_cookie_lookup() {
        let map = headers(&[(header::COOKIE, "theme=dark; dewy-language=ja")]);
        assert_eq!(cookie(&map, LANGUAGE_COOKIE), Some("ja"));
        assert_eq!(cookie(&map, "missing"), None);
    }

    #[test]
    fn test_cookie_across_headers() {
        let map = headers(&[
            (header::COOKIE, "theme=dark"),
            (header::COOKIE, "dewy-language=en"),
        ]);
        assert_eq!(cookie(&map, LANGUAGE_COOKIE), Some("en"));
    }

    #[test]
    fn test_preference_cookie_beats_browser() {
        let map = headers(&[
            (header::COOKIE, "dewy-language=en"),
            (header::ACCEPT_LANGUAGE, "ja-JP,ja;q=0.9"),
        ]);
        assert_eq!(preference(&map), Locale::En);
    }

    #[test]
    fn test_preference_browser() {
        let map = headers(&[(header::ACCEPT_LANGUAGE, "ja-JP,ja;q=0.9")]);
        assert_eq!(preference(&map), Locale::Ja);
        assert_eq!(preference(&HeaderMap::new()), Locale::En);
    }

    #[test]
    fn test_compute_etag() {
        let etag = compute_etag("1.0.0", "content");
        assert_ne!(etag, compute_etag("1.0.1", "content"));
        assert_ne!(etag, compute_etag("1.0.0", "other"));
        // 16 hex chars + 2 quotes = 18 total
        assert_eq!(etag.len(), 18);
        assert!(etag.starts_with('"') && etag.ends_with('"'));
    }

    #[test]
    fn test_is_not_modified() {
        let mut map = HeaderMap::new();
        map.insert(header::IF_NONE_MATCH, HeaderValue::from_static("\"abc\""));
        assert!(is_not_modified(&map, "\"abc\""));
        assert!(!is_not_modified(&map, "\"def\""));
        assert!(!is_not_modified(&HeaderMap::new(), "\"abc\""));
    }
}
