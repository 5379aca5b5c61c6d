//! HTTP server for the Dewy documentation site.
//!
//! This crate provides a native Rust HTTP server using axum, serving:
//! - Server-rendered pages with language redirects
//! - A JSON API with page metadata, headings and table of contents
//! - The language switch endpoint and the bundled stylesheet
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::PathBuf;
//! use dewy_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         port: 8080,
//!         source_dir: PathBuf::from("docs/pages"),
//!         version: "1.0.0".to_owned(),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Routes
//!
//! ```text
//! GET /                    page HTML (302 to /ja/... for Japanese readers)
//! GET /{*path}             page HTML, 304 on matching ETag, JSON 404
//! GET /api/pages/{*path}   page JSON, ?anchor=id highlights the toc
//! GET /lang/{lang}         store language cookie, redirect (?from=/path)
//! GET /globals.css         stylesheet
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;
mod static_files;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use dewy_site::{Site, SiteConfig, TocOptions};
use dewy_storage::FsStorage;
use state::AppState;

pub use error::ServerError;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Markdown pages directory.
    pub source_dir: PathBuf,
    /// Site metadata and table of contents settings.
    pub site: SiteConfig,
    /// Enable verbose output.
    pub verbose: bool,
    /// Application version (for cache invalidation).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
            source_dir: PathBuf::from("pages"),
            site: SiteConfig::default(),
            verbose: false,
            version: String::new(),
        }
    }
}

/// Run the server.
///
/// # Errors
///
/// Returns an error if the address is invalid or the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let storage = Arc::new(FsStorage::new(config.source_dir.clone()));
    let site = Arc::new(Site::new(storage, config.site.clone()));

    let state = Arc::new(AppState {
        site,
        verbose: config.verbose,
        version: config.version.clone(),
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, source_dir = %config.source_dir.display(), "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Site settings from a loaded `dewy.toml`.
#[must_use]
pub fn site_config_from_dewy_config(config: &dewy_config::Config) -> SiteConfig {
    SiteConfig {
        title: config.site.title.clone(),
        description: config.site.description.clone(),
        edit_base_url: config.site.edit_base_url.clone(),
        repository_url: config.site.repository_url.clone(),
        copyright_holder: config.site.copyright_holder.clone(),
        copyright_start_year: config.site.copyright_start_year,
        toc: TocOptions {
            min_level: config.toc.min_level,
            max_level: config.toc.max_level,
        },
        extract_title: true,
    }
}

/// Create server configuration from a loaded `dewy.toml`.
#[must_use]
pub fn server_config_from_dewy_config(
    config: &dewy_config::Config,
    version: String,
    verbose: bool,
) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        source_dir: config.docs_resolved.source_dir.clone(),
        site: site_config_from_dewy_config(config),
        verbose,
        version,
    }
}
