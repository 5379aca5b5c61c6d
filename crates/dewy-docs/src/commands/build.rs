//! `dewy-docs build` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use dewy_config::{CliSettings, Config};
use dewy_server::site_config_from_dewy_config;
use dewy_site::{Site, StaticExporter};
use dewy_storage::FsStorage;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover dewy.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Markdown pages directory (overrides config).
    #[arg(short, long, env = "DEWY_DOCS_SOURCE_DIR")]
    source_dir: Option<PathBuf>,

    /// Output directory for the generated site (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Enable verbose output (show render warnings).
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let source_dir = &config.docs_resolved.source_dir;
        let output_dir = &config.docs_resolved.output_dir;

        output.info(&format!("Source: {}", source_dir.display()));
        output.info(&format!("Output: {}", output_dir.display()));

        let storage = Arc::new(FsStorage::new(source_dir.clone()));
        let site = Site::new(storage, site_config_from_dewy_config(&config));
        let report = StaticExporter::new(&site, output_dir).export()?;

        if self.verbose {
            for warning in &report.warnings {
                tracing::warn!(warning = %warning, "Page render warning");
                output.warning(warning);
            }
        } else if !report.warnings.is_empty() {
            output.warning(&format!(
                "{} render warning(s); rerun with --verbose to see them",
                report.warnings.len()
            ));
        }

        output.success(&format!(
            "Built {} page(s) into {}",
            report.pages,
            output_dir.display()
        ));
        Ok(())
    }
}
