//! Input tree walker for the content copy pass

use crate::error::FlattenError;
use crate::paths::ManifestMatcher;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File found under the input root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// Content file to copy, with its path relative to the input root
    Content { path: PathBuf, relative: PathBuf },
    /// Manifest file, folded into the merged manifest instead of copied
    Manifest { path: PathBuf },
}

/// Walker configuration
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Whether to follow symbolic links (default: false)
    pub follow_symlinks: bool,
    /// Directory to leave out of the walk, typically an output directory nested in the input
    pub exclude_dir: Option<PathBuf>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            exclude_dir: None,
        }
    }
}

/// Collects the files of an input tree, classified as content or manifest
pub struct Walker {
    root: PathBuf,
    matcher: ManifestMatcher,
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given root path
    pub fn new(root: PathBuf, matcher: ManifestMatcher) -> Self {
        Self {
            root,
            matcher,
            config: WalkerConfig::default(),
        }
    }

    /// Create a walker with custom configuration
    pub fn with_config(root: PathBuf, matcher: ManifestMatcher, config: WalkerConfig) -> Self {
        Self {
            root,
            matcher,
            config,
        }
    }

    /// Walk the input tree and collect all files.
    ///
    /// Returns entries sorted by path so copy scheduling is deterministic.
    pub fn walk(&self) -> Result<Vec<Entry>, FlattenError> {
        let mut entries = Vec::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_excluded(entry.path()));

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(self.root.as_path()).to_path_buf();
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
                FlattenError::io(&path, source)
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path().to_path_buf();
            if self.matcher.is_manifest(&path) {
                entries.push(Entry::Manifest { path });
                continue;
            }

            let relative = path
                .strip_prefix(&self.root)
                .map(Path::to_path_buf)
                .map_err(|_| {
                    FlattenError::InvalidArgument(format!(
                        "Walked outside of input root: {}",
                        path.display()
                    ))
                })?;
            entries.push(Entry::Content { path, relative });
        }

        Ok(entries)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.config
            .exclude_dir
            .as_deref()
            .map(|excluded| path == excluded)
            .unwrap_or(false)
    }
}
