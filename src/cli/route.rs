//! CLI route: run context built from parsed flags and layered configuration.

use crate::cli::output::{format_report_json, format_report_text};
use crate::cli::parse::Cli;
use crate::combine::Combine;
use crate::config::{ConfigLoader, FlattenConfig};
use crate::error::FlattenError;
use tracing::info;

/// Runtime context for a CLI invocation: the validated job plus presentation settings.
pub struct RunContext {
    job: Combine,
    config: FlattenConfig,
    format: String,
}

impl RunContext {
    /// Load configuration, apply CLI overrides and validate the job.
    ///
    /// Fails before any filesystem work on the input when arguments are invalid.
    pub fn new(cli: &Cli) -> Result<Self, FlattenError> {
        let config = Self::resolve_config(cli)?;
        if cli.format != "text" && cli.format != "json" {
            return Err(FlattenError::InvalidArgument(format!(
                "Invalid format: {} (must be 'text' or 'json')",
                cli.format
            )));
        }

        let job = Combine::new(
            cli.input.as_deref(),
            cli.output.as_deref(),
            config.combine_options(),
        )?;

        Ok(Self {
            job,
            config,
            format: cli.format.clone(),
        })
    }

    /// Configuration after CLI overrides
    pub fn config(&self) -> &FlattenConfig {
        &self.config
    }

    /// Precedence: CLI flags override environment override config file override defaults.
    pub fn resolve_config(cli: &Cli) -> Result<FlattenConfig, FlattenError> {
        let mut config = ConfigLoader::load(cli.config.as_deref())?;

        if let Some(ref root_json) = cli.root_json {
            config.root_json = root_json.clone();
        }
        if cli.verbose {
            config.verbose = true;
        }
        if let Some(ref level) = cli.log_level {
            config.logging.level = level.clone();
        }
        if let Some(ref format) = cli.log_format {
            config.logging.format = format.clone();
        }
        if let Some(ref output) = cli.log_output {
            config.logging.output = output.clone();
        }

        config
            .validate()
            .map_err(|errors| FlattenError::InvalidArgument(errors.join("; ")))?;
        Ok(config)
    }

    /// Run the job and render its report.
    pub async fn execute(&self) -> Result<String, FlattenError> {
        let report = self.job.run().await?;
        info!(
            output = %report.output_manifest.display(),
            copied = report.copied_files,
            "Combine finished"
        );
        Ok(match self.format.as_str() {
            "json" => format_report_json(&report),
            _ => format_report_text(&report, self.config.verbose),
        })
    }
}
