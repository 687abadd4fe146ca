//! Output Writer
//!
//! Writes the merged manifest to the output directory and copies every content file of
//! the input tree next to it. Manifests are never copied: their tiles now live in the
//! single merged manifest.

pub mod walker;

use crate::error::FlattenError;
use crate::paths::ManifestMatcher;
use crate::tileset::codec::write_manifest;
use crate::tileset::Tileset;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};
use walker::{Entry, Walker, WalkerConfig};

/// Default bound on simultaneous file copies
pub const DEFAULT_COPY_CONCURRENCY: usize = 1024;

/// Outcome of the content copy pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyReport {
    /// Content files copied to the output tree
    pub copied: usize,
    /// Manifest files encountered and left out
    pub skipped_manifests: usize,
}

/// Write the merged tileset to `output_manifest`.
///
/// The bytes are gzip-compressed when `compressed` is set, mirroring the root manifest.
pub async fn write_tileset(
    tileset: &Tileset,
    compressed: bool,
    output_manifest: &Path,
) -> Result<(), FlattenError> {
    write_manifest(output_manifest, tileset, compressed).await?;
    info!(path = %output_manifest.display(), compressed, "Wrote merged tileset");
    Ok(())
}

/// Copy every non-manifest file under `input_root` to the same relative path under
/// `output_root`, at most `concurrency` copies in flight.
///
/// Existing files in the output tree are overwritten on name collision. The first failed
/// copy aborts the pass.
pub async fn copy_content(
    input_root: &Path,
    output_root: &Path,
    matcher: &ManifestMatcher,
    concurrency: usize,
) -> Result<CopyReport, FlattenError> {
    if concurrency == 0 {
        return Err(FlattenError::InvalidArgument(
            "copy concurrency must be at least 1".to_string(),
        ));
    }

    let walker = Walker::with_config(
        input_root.to_path_buf(),
        matcher.clone(),
        WalkerConfig {
            exclude_dir: Some(output_root.to_path_buf()),
            ..WalkerConfig::default()
        },
    );
    let entries = tokio::task::spawn_blocking(move || walker.walk())
        .await
        .map_err(|e| FlattenError::Task(e.to_string()))??;

    let mut report = CopyReport::default();
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let mut join_set = JoinSet::new();

    for entry in entries {
        let (source, relative) = match entry {
            Entry::Manifest { path } => {
                debug!(path = %path.display(), "Skipping tileset manifest");
                report.skipped_manifests += 1;
                continue;
            }
            Entry::Content { path, relative } => (path, relative),
        };

        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| FlattenError::Task(e.to_string()))?;
        let destination = output_root.join(&relative);
        join_set.spawn(async move {
            let _permit = permit;
            copy_file(&source, &destination).await
        });
    }

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok(Ok(())) => report.copied += 1,
            Ok(Err(e)) => {
                join_set.abort_all();
                return Err(e);
            }
            Err(e) => {
                join_set.abort_all();
                return Err(FlattenError::Task(e.to_string()));
            }
        }
    }

    info!(
        copied = report.copied,
        skipped_manifests = report.skipped_manifests,
        "Copied tileset content"
    );
    Ok(report)
}

async fn copy_file(source: &Path, destination: &Path) -> Result<(), FlattenError> {
    if let Some(parent) = destination.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| FlattenError::io(parent, e))?;
    }
    tokio::fs::copy(source, destination)
        .await
        .map_err(|e| FlattenError::io(source, e))?;
    debug!(from = %source.display(), to = %destination.display(), "Copied content file");
    Ok(())
}
