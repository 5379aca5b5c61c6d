//! Configuration management for the Dewy documentation site.
//!
//! Parses `dewy.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `site.repository_url`
//! - `site.edit_base_url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override markdown source directory.
    pub source_dir: Option<PathBuf>,
    /// Override static export directory.
    pub output_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "dewy.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Documentation paths (relative strings from TOML).
    docs: DocsConfigRaw,
    /// Site metadata.
    pub site: SiteSection,
    /// Table of contents levels.
    pub toc: TocSection,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
        }
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
}

/// Resolved documentation paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Directory holding the markdown pages.
    pub source_dir: PathBuf,
    /// Directory the static export is written to.
    pub output_dir: PathBuf,
}

/// `[site]` section: page metadata and links.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    /// Title used when a page has neither frontmatter title nor H1.
    pub title: String,
    /// Description used when a page has no frontmatter description.
    pub description: String,
    /// Repository shown in the top navigation.
    pub repository_url: String,
    /// Base of "edit this page" links; the page path and `.md` are appended.
    pub edit_base_url: String,
    pub copyright_holder: String,
    pub copyright_start_year: i32,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "Dewy".to_owned(),
            description:
                "Dewy enables declarative deployment of applications in non-Kubernetes environments."
                    .to_owned(),
            repository_url: "https://github.com/linyows/dewy".to_owned(),
            edit_base_url: "https://github.com/linyows/dewy/edit/main/docs/pages".to_owned(),
            copyright_holder: "linyows".to_owned(),
            copyright_start_year: 2018,
        }
    }
}

/// `[toc]` section: heading levels shown in the table of contents.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TocSection {
    pub min_level: u8,
    pub max_level: u8,
}

impl Default for TocSection {
    fn default() -> Self {
        Self {
            min_level: 2,
            max_level: 3,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.edit_base_url`").
        field: String,
        /// Error message (e.g., "${`DEWY_HOST`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `dewy.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.docs_resolved.output_dir.clone_from(output_dir);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let start = std::env::current_dir().ok()?;
        Self::discover_from(&start)
    }

    /// Search for config file in `start` and its parents.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.is_file())
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            docs: DocsConfigRaw::default(),
            site: SiteSection::default(),
            toc: TocSection::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join("pages"),
                output_dir: base.join("out"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI settings
    /// are applied.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_site()?;
        self.validate_toc()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    fn validate_site(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site.title, "site.title")?;
        require_http_url(&self.site.repository_url, "site.repository_url")?;
        require_http_url(&self.site.edit_base_url, "site.edit_base_url")?;
        Ok(())
    }

    fn validate_toc(&self) -> Result<(), ConfigError> {
        let TocSection {
            min_level,
            max_level,
        } = self.toc;

        for (value, field) in [(min_level, "toc.min_level"), (max_level, "toc.max_level")] {
            if !(1..=6).contains(&value) {
                return Err(ConfigError::Validation(format!(
                    "{field} must be between 1 and 6"
                )));
            }
        }
        if min_level > max_level {
            return Err(ConfigError::Validation(
                "toc.min_level cannot exceed toc.max_level".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        self.site.repository_url =
            expand::expand_env(&self.site.repository_url, "site.repository_url")?;
        self.site.edit_base_url =
            expand::expand_env(&self.site.edit_base_url, "site.edit_base_url")?;
        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            source_dir: resolve(self.docs.source_dir.as_deref(), "pages"),
            output_dir: resolve(self.docs.output_dir.as_deref(), "out"),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILENAME);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/site"));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7979);
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/site/pages"));
        assert_eq!(config.docs_resolved.output_dir, PathBuf::from("/site/out"));
        assert_eq!(config.toc.min_level, 2);
        assert_eq!(config.toc.max_level, 3);
        assert_eq!(config.site.copyright_start_year, 2018);
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 7979);
        assert_eq!(config.site.title, "Dewy");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "0.0.0.0"
port = 9000

[docs]
source_dir = "docs/pages"
output_dir = "public"

[site]
title = "Dewy Docs"
copyright_holder = "dewy authors"
copyright_start_year = 2020

[toc]
min_level = 2
max_level = 4
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/project/docs/pages")
        );
        assert_eq!(config.docs_resolved.output_dir, PathBuf::from("/project/public"));
        assert_eq!(config.site.title, "Dewy Docs");
        assert_eq!(config.site.copyright_holder, "dewy authors");
        assert_eq!(config.toc.max_level, 4);
        assert_eq!(config.site.repository_url, "https://github.com/linyows/dewy");
    }

    #[test]
    fn test_load_explicit_file() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "[server]\nport = 8080\n");

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.docs_resolved.source_dir, temp.path().join("pages"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/dewy.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "[server\nport = 1");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_discover_from_parent_directory() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "");
        let nested = temp.path().join("pages/ja");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(Config::discover_from(&nested), Some(path));
    }

    #[test]
    fn test_discover_none() {
        let temp = TempDir::new().unwrap();
        assert_eq!(Config::discover_from(temp.path()), None);
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            port: Some(9000),
            output_dir: Some(PathBuf::from("/tmp/site")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1"); // Unchanged
        assert_eq!(config.docs_resolved.output_dir, PathBuf::from("/tmp/site"));
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/pages"));
    }

    #[test]
    fn test_cli_settings_are_validated() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "");
        let overrides = CliSettings {
            host: Some(String::new()),
            ..Default::default()
        };

        let err = Config::load(Some(&path), Some(&overrides)).unwrap_err();
        assert!(err.to_string().contains("server.host"));
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("DEWY_CONFIG_TEST_REPO", "https://git.example.com/dewy");
        }
        let toml = r#"
[server]
host = "${DEWY_CONFIG_TEST_UNSET_HOST:-0.0.0.0}"

[site]
repository_url = "${DEWY_CONFIG_TEST_REPO}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.site.repository_url, "https://git.example.com/dewy");
        unsafe {
            std::env::remove_var("DEWY_CONFIG_TEST_REPO");
        }
    }

    #[test]
    fn test_expand_env_vars_missing() {
        let toml = r#"
[site]
edit_base_url = "${DEWY_CONFIG_TEST_MISSING}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { ref field, .. } if field == "site.edit_base_url"));
    }

    #[test]
    fn test_validate_port_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.port = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.port cannot be 0"));
    }

    #[test]
    fn test_validate_url_scheme() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.edit_base_url = "github.com/linyows/dewy".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("site.edit_base_url must start with http"));
    }

    #[test]
    fn test_validate_toc_levels() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.toc.min_level = 4;
        config.toc.max_level = 2;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cannot exceed"));

        config.toc.min_level = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("toc.min_level must be between 1 and 6"));

        config.toc.min_level = 1;
        config.toc.max_level = 7;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("toc.max_level"));
    }
}
