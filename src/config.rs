//! Configuration System
//!
//! Layered configuration built with the `config` crate: built-in defaults, then an
//! optional config file, then `TILEMERGE_*` environment variables. CLI flags are applied
//! on top by the binary.

use crate::combine::CombineOptions;
use crate::error::FlattenError;
use crate::logging::LoggingConfig;
use crate::writer::DEFAULT_COPY_CONCURRENCY;
use config::{Config, ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Conventional file name of a root tileset manifest
pub const DEFAULT_ROOT_JSON: &str = "tileset.json";

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlattenConfig {
    /// Path of the root manifest, relative to the input directory
    #[serde(default = "default_root_json")]
    pub root_json: String,

    /// Report how many external tilesets were folded
    #[serde(default)]
    pub verbose: bool,

    /// File extensions that mark a content reference as a tileset manifest
    #[serde(default = "default_manifest_extensions")]
    pub manifest_extensions: Vec<String>,

    /// Upper bound on simultaneous content copies
    #[serde(default = "default_copy_concurrency")]
    pub copy_concurrency: usize,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_root_json() -> String {
    DEFAULT_ROOT_JSON.to_string()
}

fn default_manifest_extensions() -> Vec<String> {
    vec!["json".to_string()]
}

fn default_copy_concurrency() -> usize {
    DEFAULT_COPY_CONCURRENCY
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            root_json: default_root_json(),
            verbose: false,
            manifest_extensions: default_manifest_extensions(),
            copy_concurrency: default_copy_concurrency(),
            logging: LoggingConfig::default(),
        }
    }
}

impl FlattenConfig {
    /// Validate the configuration, collecting every problem found
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.root_json.trim().is_empty() {
            errors.push("root_json cannot be empty".to_string());
        }
        if Path::new(&self.root_json).is_absolute() {
            errors.push(format!(
                "root_json must be relative to the input directory: {}",
                self.root_json
            ));
        }
        if self
            .manifest_extensions
            .iter()
            .all(|ext| ext.trim_start_matches('.').is_empty())
        {
            errors.push("manifest_extensions must name at least one extension".to_string());
        }
        if self.copy_concurrency == 0 {
            errors.push("copy_concurrency must be at least 1".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Options for a combine run
    pub fn combine_options(&self) -> CombineOptions {
        CombineOptions {
            root_json: PathBuf::from(&self.root_json),
            verbose: self.verbose,
            manifest_extensions: self.manifest_extensions.clone(),
            copy_concurrency: self.copy_concurrency,
        }
    }
}

/// Loads [`FlattenConfig`] from its layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration.
    ///
    /// Precedence (lowest to highest): defaults, `config_file` when given (must exist),
    /// environment variables such as `TILEMERGE_ROOT_JSON`, `TILEMERGE_VERBOSE`,
    /// `TILEMERGE_COPY_CONCURRENCY`, `TILEMERGE_MANIFEST_EXTENSIONS=json,tileset` and
    /// `TILEMERGE_LOGGING__LEVEL`.
    pub fn load(config_file: Option<&Path>) -> Result<FlattenConfig, FlattenError> {
        let mut builder = Self::builder_with_defaults()?;
        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(Self::environment());
        Self::finish(builder)
    }

    /// Load configuration from a file only, skipping the environment
    pub fn load_from_file(path: &Path) -> Result<FlattenConfig, FlattenError> {
        let builder = Self::builder_with_defaults()?.add_source(File::from(path).required(true));
        Self::finish(builder)
    }

    fn builder_with_defaults(
    ) -> Result<ConfigBuilder<config::builder::DefaultState>, FlattenError> {
        Ok(Config::builder()
            .set_default("root_json", DEFAULT_ROOT_JSON)?
            .set_default("verbose", false)?
            .set_default("manifest_extensions", vec!["json"])?
            .set_default("copy_concurrency", DEFAULT_COPY_CONCURRENCY as i64)?)
    }

    fn environment() -> Environment {
        Environment::with_prefix("TILEMERGE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("manifest_extensions")
    }

    fn finish(
        builder: ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<FlattenConfig, FlattenError> {
        let config: FlattenConfig = builder.build()?.try_deserialize()?;
        config
            .validate()
            .map_err(|errors| FlattenError::Config(errors.join("; ")))?;
        Ok(config)
    }
}
