//! Error types for tileset flattening.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while merging, writing or copying a tileset tree
#[derive(Debug, Error)]
pub enum FlattenError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to parse tileset {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Tileset references itself through {}", .0.display())]
    ReferenceCycle(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Copy task failed: {0}")]
    Task(String),
}

impl FlattenError {
    /// Classify an I/O failure on `path`, keeping missing files distinct.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            FlattenError::NotFound(path.to_path_buf())
        } else {
            FlattenError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FlattenError::NotFound(_))
    }
}

impl From<config::ConfigError> for FlattenError {
    fn from(err: config::ConfigError) -> Self {
        FlattenError::Config(err.to_string())
    }
}
