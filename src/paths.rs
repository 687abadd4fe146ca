//! Path classification and relative-path math
//!
//! Every resolution takes its base directory as an argument; nothing here reads the
//! process working directory.

use crate::error::FlattenError;
use std::path::{Component, Path, PathBuf};

/// Recognizes manifest references by file extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestMatcher {
    extensions: Vec<String>,
}

impl Default for ManifestMatcher {
    fn default() -> Self {
        Self::new(["json"])
    }
}

impl ManifestMatcher {
    /// Build a matcher from extensions, with or without a leading dot
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .filter(|ext| !ext.is_empty())
                .collect(),
        }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Whether `path` names a manifest
    pub fn is_manifest(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref()
            .extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_ascii_lowercase();
                self.extensions.iter().any(|known| *known == ext)
            })
            .unwrap_or(false)
    }
}

/// Resolve `.` and `..` components without touching the filesystem.
///
/// `..` at the top of a relative path is kept; `..` past the root of an absolute path
/// is dropped.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Path of `target` relative to `base`, joined with forward slashes.
///
/// Both paths are normalized lexically first; they must share the same kind of root
/// (both absolute or both relative) for the result to be meaningful.
pub fn relative_url(target: &Path, base: &Path) -> String {
    let target = normalize_lexically(target);
    let base = normalize_lexically(base);

    let target_parts: Vec<Component<'_>> = target.components().collect();
    let base_parts: Vec<Component<'_>> = base.components().collect();

    let common = target_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<String> = Vec::new();
    for _ in common..base_parts.len() {
        segments.push("..".to_string());
    }
    for part in &target_parts[common..] {
        segments.push(part.as_os_str().to_string_lossy().into_owned());
    }

    to_forward_slashes(&segments.join("/"))
}

/// Replace platform separators with `/`
pub fn to_forward_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// `<parent>/<basename>-combined` next to `input`
pub fn default_output_dir(input: &Path) -> Result<PathBuf, FlattenError> {
    let name = input.file_name().ok_or_else(|| {
        FlattenError::InvalidArgument(format!(
            "Cannot derive an output directory name from {}",
            input.display()
        ))
    })?;
    let mut combined = name.to_os_string();
    combined.push("-combined");
    Ok(input
        .parent()
        .map(|parent| parent.join(&combined))
        .unwrap_or_else(|| PathBuf::from(&combined)))
}

/// Canonicalize an existing directory.
///
/// Uses `dunce` so Windows paths stay free of `\\?\` prefixes, keeping relative-path
/// math comparable with joined manifest paths.
pub async fn canonicalize_dir(path: &Path) -> Result<PathBuf, FlattenError> {
    let owned = path.to_path_buf();
    let canonical = tokio::task::spawn_blocking(move || dunce::canonicalize(&owned))
        .await
        .map_err(|e| FlattenError::Task(e.to_string()))?
        .map_err(|e| FlattenError::io(path, e))?;

    let metadata = tokio::fs::metadata(&canonical)
        .await
        .map_err(|e| FlattenError::io(&canonical, e))?;
    if !metadata.is_dir() {
        return Err(FlattenError::InvalidArgument(format!(
            "Input is not a directory: {}",
            canonical.display()
        )));
    }
    Ok(canonical)
}
