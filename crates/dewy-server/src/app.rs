//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;
use crate::static_files;

/// Create the application router.
///
/// Any path not matched by the API, language or asset routes is treated
/// as a page path.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/api/pages/", get(handlers::pages::get_root_page))
        .route("/api/pages/{*path}", get(handlers::pages::get_page));

    Router::new()
        .merge(api_routes)
        .route("/lang/{lang}", get(handlers::language::set_language))
        .route("/globals.css", get(static_files::globals_css))
        .fallback(get(handlers::documents::get_document))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use dewy_site::{Site, SiteConfig};
    use dewy_storage::MockStorage;
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    const CACHE_PAGE: &str = "---\ntitle: Cache\n---\n\n# Cache\n\n## Memory\n\n### Limits\n\n## File\n";

    fn app() -> Router {
        let storage = MockStorage::new()
            .with_page("", "# Home\n")
            .with_page("cache", CACHE_PAGE)
            .with_page("ja/cache", "# キャッシュ\n\n## メモリ\n\n## ファイル\n")
            .with_page("ja/introduction", "# はじめに\n");
        let site = Site::new(Arc::new(storage), SiteConfig::default());
        create_router(Arc::new(AppState {
            site: Arc::new(site),
            verbose: false,
            version: "test".to_owned(),
        }))
    }

    async fn get_with(uri: &str, headers: &[(header::HeaderName, &str)]) -> Response {
        let mut builder = Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(name.clone(), *value);
        }
        app().oneshot(builder.body(Body::empty()).unwrap()).await.unwrap()
    }

    async fn get(uri: &str) -> Response {
        get_with(uri, &[]).await
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn header_value<'a>(response: &'a Response, name: header::HeaderName) -> &'a str {
        response.headers()[name].to_str().unwrap()
    }

    #[tokio::test]
    async fn test_page_html() {
        let response = get("/cache").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(header_value(&response, header::CONTENT_TYPE).starts_with("text/html"));
        assert_eq!(header_value(&response, header::X_FRAME_OPTIONS), "DENY");

        let body = body_string(response).await;
        assert!(body.contains("<title>Cache</title>"));
        assert!(body.contains(r#"<nav class="toc">"#));
    }

    #[tokio::test]
    async fn test_trailing_slash_page() {
        assert_eq!(get("/cache/").await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_page_is_json_404() {
        let response = get("/nope").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["error"], "Page not found");
        assert_eq!(json["path"], "/nope");
    }

    #[tokio::test]
    async fn test_japanese_browser_is_redirected() {
        let response = get_with("/", &[(header::ACCEPT_LANGUAGE, "ja-JP,ja;q=0.9")]).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(header_value(&response, header::LOCATION), "/ja/introduction");

        let response = get_with("/cache", &[(header::ACCEPT_LANGUAGE, "ja")]).await;
        assert_eq!(header_value(&response, header::LOCATION), "/ja/cache");
    }

    #[tokio::test]
    async fn test_stored_english_choice_wins() {
        let response = get_with(
            "/cache",
            &[
                (header::ACCEPT_LANGUAGE, "ja"),
                (header::COOKIE, "dewy-language=en"),
            ],
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_japanese_page_not_redirected() {
        let response = get_with("/ja/cache", &[(header::COOKIE, "dewy-language=en")]).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("このページの内容"));
        assert!(body.contains(r#"href="/lang/en?from=/ja/cache""#));
    }

    #[tokio::test]
    async fn test_etag_not_modified() {
        let first = get("/cache").await;
        let etag = header_value(&first, header::ETAG).to_owned();

        let second = get_with("/cache", &[(header::IF_NONE_MATCH, etag.as_str())]).await;
        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_api_page() {
        let response = get("/api/pages/cache?anchor=limits").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(header::LAST_MODIFIED));

        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["meta"]["title"], "Cache");
        assert_eq!(json["meta"]["path"], "/cache");
        assert_eq!(json["meta"]["locale"], "en");
        assert_eq!(json["headings"].as_array().unwrap().len(), 4);
        assert_eq!(json["toc"]["render"], true);
        assert_eq!(json["toc"]["items"][0]["id"], "memory");
        assert_eq!(json["toc"]["items"][0]["active"], false);
        assert_eq!(json["toc"]["items"][0]["children"][0]["active"], true);
    }

    #[tokio::test]
    async fn test_api_root_and_missing() {
        let response = get("/api/pages/").await;
        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["meta"]["path"], "/");
        assert_eq!(json["toc"]["render"], false);

        assert_eq!(get("/api/pages/nope").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_language_switch() {
        let query = serde_urlencoded::to_string([("from", "/cache")]).unwrap();
        let response = get(&format!("/lang/ja?{query}")).await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(header_value(&response, header::LOCATION), "/ja/cache");
        let cookie = header_value(&response, header::SET_COOKIE);
        assert!(cookie.starts_with("dewy-language=ja;"));
        assert!(cookie.contains("Path=/"));
    }

    #[tokio::test]
    async fn test_language_switch_already_there() {
        let query = serde_urlencoded::to_string([("from", "/ja/cache")]).unwrap();
        let response = get(&format!("/lang/ja?{query}")).await;
        assert_eq!(header_value(&response, header::LOCATION), "/ja/cache");

        let response = get("/lang/en").await;
        assert_eq!(header_value(&response, header::LOCATION), "/");
    }

    #[tokio::test]
    async fn test_language_switch_rejects_foreign_target() {
        let query = serde_urlencoded::to_string([("from", "//evil.example.com")]).unwrap();
        let response = get(&format!("/lang/ja?{query}")).await;
        assert_eq!(header_value(&response, header::LOCATION), "/ja/introduction");
    }

    #[tokio::test]
    async fn test_unknown_language() {
        assert_eq!(get("/lang/fr").await.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_globals_css() {
        let response = get("/globals.css").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(header_value(&response, header::CONTENT_TYPE).starts_with("text/css"));
        assert!(response.headers().contains_key("content-security-policy"));
    }
}
