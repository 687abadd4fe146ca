//! Combine: the top-level flatten operation
//!
//! Merges the root manifest of an input directory, writes the merged manifest into the
//! output directory and copies all content files alongside it.

use crate::config::DEFAULT_ROOT_JSON;
use crate::error::FlattenError;
use crate::merger::Merger;
use crate::paths::{canonicalize_dir, default_output_dir, ManifestMatcher};
use crate::writer::{copy_content, write_tileset, DEFAULT_COPY_CONCURRENCY};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Options recognized by [`Combine`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineOptions {
    /// Root manifest path, relative to the input directory
    pub root_json: PathBuf,
    /// Report the number of folded external tilesets at info level
    pub verbose: bool,
    /// Extensions that identify manifest files
    pub manifest_extensions: Vec<String>,
    /// Upper bound on simultaneous content copies
    pub copy_concurrency: usize,
}

impl Default for CombineOptions {
    fn default() -> Self {
        Self {
            root_json: PathBuf::from(DEFAULT_ROOT_JSON),
            verbose: false,
            manifest_extensions: vec!["json".to_string()],
            copy_concurrency: DEFAULT_COPY_CONCURRENCY,
        }
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineReport {
    pub output_dir: PathBuf,
    pub output_manifest: PathBuf,
    /// External tilesets folded into the merged manifest
    pub external_tilesets: usize,
    pub copied_files: usize,
    /// Manifest files seen in the input tree and not copied
    pub skipped_manifests: usize,
    /// Whether the merged manifest was written gzip-compressed
    pub compressed: bool,
}

/// A validated flatten job
#[derive(Debug, Clone)]
pub struct Combine {
    input: PathBuf,
    output: Option<PathBuf>,
    options: CombineOptions,
    matcher: ManifestMatcher,
}

impl Combine {
    /// Validate arguments without touching the filesystem.
    ///
    /// `output` defaults to `<input>-combined` next to the input directory.
    pub fn new(
        input: Option<&Path>,
        output: Option<&Path>,
        options: CombineOptions,
    ) -> Result<Self, FlattenError> {
        let input = match input {
            Some(path) if !path.as_os_str().is_empty() => path.to_path_buf(),
            _ => {
                return Err(FlattenError::InvalidArgument(
                    "an input directory is required".to_string(),
                ))
            }
        };

        if options.root_json.as_os_str().is_empty() || options.root_json.file_name().is_none() {
            return Err(FlattenError::InvalidArgument(format!(
                "root manifest path must name a file: {:?}",
                options.root_json
            )));
        }
        if options.root_json.is_absolute() {
            return Err(FlattenError::InvalidArgument(format!(
                "root manifest path must be relative to the input directory: {}",
                options.root_json.display()
            )));
        }
        if options.copy_concurrency == 0 {
            return Err(FlattenError::InvalidArgument(
                "copy concurrency must be at least 1".to_string(),
            ));
        }

        let matcher = ManifestMatcher::new(&options.manifest_extensions);
        if matcher.extensions().is_empty() {
            return Err(FlattenError::InvalidArgument(
                "at least one manifest extension is required".to_string(),
            ));
        }

        Ok(Self {
            input,
            output: output.map(Path::to_path_buf),
            options,
            matcher,
        })
    }

    pub fn options(&self) -> &CombineOptions {
        &self.options
    }

    /// Merge, write and copy.
    ///
    /// Fails on the first error; whatever was already written to the output directory
    /// is left in place.
    pub async fn run(&self) -> Result<CombineReport, FlattenError> {
        let input_root = canonicalize_dir(&self.input).await?;
        let requested_output = match &self.output {
            Some(output) => output.clone(),
            None => default_output_dir(&input_root)?,
        };

        let root_manifest = input_root.join(&self.options.root_json);
        let merger = Merger::new(&input_root, self.matcher.clone());
        let merged = merger.merge(&root_manifest).await?;

        if self.options.verbose {
            info!(
                external_tilesets = merged.external_tilesets,
                "Folded {} external tilesets", merged.external_tilesets
            );
        } else {
            debug!(
                external_tilesets = merged.external_tilesets,
                "Folded {} external tilesets", merged.external_tilesets
            );
        }

        tokio::fs::create_dir_all(&requested_output)
            .await
            .map_err(|e| FlattenError::io(&requested_output, e))?;
        let output_dir = canonicalize_dir(&requested_output).await?;
        if output_dir == input_root {
            return Err(FlattenError::InvalidArgument(format!(
                "output directory must differ from the input directory: {}",
                output_dir.display()
            )));
        }

        // The merged manifest keeps the root manifest's base name, at the output root.
        let manifest_name = self.options.root_json.file_name().ok_or_else(|| {
            FlattenError::InvalidArgument("root manifest path must name a file".to_string())
        })?;
        let output_manifest = output_dir.join(manifest_name);
        write_tileset(&merged.tileset, merged.compressed, &output_manifest).await?;

        let copy = copy_content(
            &input_root,
            &output_dir,
            &self.matcher,
            self.options.copy_concurrency,
        )
        .await?;

        Ok(CombineReport {
            output_dir,
            output_manifest,
            external_tilesets: merged.external_tilesets,
            copied_files: copy.copied,
            skipped_manifests: copy.skipped_manifests,
            compressed: merged.compressed,
        })
    }
}

/// Validate and run a flatten job in one call
pub async fn combine(
    input: Option<&Path>,
    output: Option<&Path>,
    options: CombineOptions,
) -> Result<CombineReport, FlattenError> {
    Combine::new(input, output, options)?.run().await
}
