//! Tileset Merger
//!
//! Loads a root manifest and folds every external tileset it references into the tile
//! that references it. Content references that survive are rewritten relative to the
//! input root, so the merged tree reads correctly from a single manifest.
//!
//! Each manifest's tree is traversed with an explicit work list. Recursion happens only
//! when a tile references another manifest; the nested loads of one manifest are driven
//! concurrently and joined before any splice is applied.

use crate::error::FlattenError;
use crate::paths::{normalize_lexically, relative_url, ManifestMatcher};
use crate::tileset::codec::read_manifest;
use crate::tileset::{Tile, Tileset};
use futures::future::{try_join_all, BoxFuture, FutureExt};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Result of merging a root manifest
#[derive(Debug, Clone, PartialEq)]
pub struct MergedTileset {
    /// Root manifest with every external tileset inlined
    pub tileset: Tileset,
    /// Whether the root manifest was gzip-compressed on disk
    pub compressed: bool,
    /// Number of distinct external manifests folded into the tree
    pub external_tilesets: usize,
}

/// One manifest with its subtree resolved
struct LoadedManifest {
    tileset: Tileset,
    compressed: bool,
    /// Normalized paths of the external manifests inlined below this one
    inlined: HashSet<PathBuf>,
}

/// External reference found while walking one manifest
struct PendingSplice {
    /// Index path from the manifest root to the referencing tile
    tile_path: Vec<usize>,
    /// Referenced manifest, resolved against the referencing manifest's directory
    manifest: PathBuf,
}

/// Merges tileset trees rooted in one input directory
#[derive(Debug, Clone)]
pub struct Merger {
    input_root: PathBuf,
    matcher: ManifestMatcher,
}

impl Merger {
    pub fn new(input_root: impl Into<PathBuf>, matcher: ManifestMatcher) -> Self {
        Self {
            input_root: normalize_lexically(&input_root.into()),
            matcher,
        }
    }

    pub fn input_root(&self) -> &Path {
        &self.input_root
    }

    /// Load the manifest at `manifest_path` and inline all external tilesets below it.
    pub async fn merge(&self, manifest_path: &Path) -> Result<MergedTileset, FlattenError> {
        let manifest_path = normalize_lexically(manifest_path);
        let loaded = self.load(manifest_path, Vec::new()).await?;
        let external_tilesets = loaded.inlined.len();
        debug!(external_tilesets, "Merged tileset tree");
        Ok(MergedTileset {
            tileset: loaded.tileset,
            compressed: loaded.compressed,
            external_tilesets,
        })
    }

    /// Load one manifest and resolve its subtree.
    ///
    /// `ancestors` holds the manifests currently being resolved above this one.
    fn load(
        &self,
        manifest_path: PathBuf,
        ancestors: Vec<PathBuf>,
    ) -> BoxFuture<'_, Result<LoadedManifest, FlattenError>> {
        async move {
            if ancestors.contains(&manifest_path) {
                return Err(FlattenError::ReferenceCycle(manifest_path));
            }

            let (mut tileset, compressed) = read_manifest(&manifest_path).await?;
            let Some(root) = tileset.root.as_mut() else {
                return Ok(LoadedManifest {
                    tileset,
                    compressed,
                    inlined: HashSet::new(),
                });
            };

            let manifest_dir = manifest_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            let pending = self.rewrite_tree(root, &manifest_dir);

            let mut chain = ancestors;
            chain.push(manifest_path.clone());
            let resolved = try_join_all(
                pending
                    .iter()
                    .map(|splice| self.load(splice.manifest.clone(), chain.clone())),
            )
            .await?;

            let mut inlined = HashSet::new();
            // Discovery order puts ancestors before descendants. Splicing in reverse keeps
            // index paths valid: a descendant is spliced before its ancestor replaces it.
            for (splice, nested) in pending.iter().zip(resolved).rev() {
                inlined.insert(splice.manifest.clone());
                inlined.extend(nested.inlined);
                let nested_root = nested.tileset.root.unwrap_or_default();
                if let Some(tile) = root.descendant_mut(&splice.tile_path) {
                    debug!(
                        manifest = %splice.manifest.display(),
                        into = %manifest_path.display(),
                        "Spliced external tileset"
                    );
                    tile.splice(nested_root);
                }
            }

            Ok(LoadedManifest {
                tileset,
                compressed,
                inlined,
            })
        }
        .boxed()
    }

    /// Walk `root`, rewriting content references relative to the input root and
    /// collecting the tiles that reference external manifests.
    #[instrument(level = "trace", skip(self, root))]
    fn rewrite_tree(&self, root: &mut Tile, manifest_dir: &Path) -> Vec<PendingSplice> {
        let mut pending = Vec::new();
        let mut stack: Vec<(Vec<usize>, &mut Tile)> = vec![(Vec::new(), root)];

        while let Some((tile_path, tile)) = stack.pop() {
            if let Some(content) = tile.content.as_mut() {
                if let Some(reference) = content.reference() {
                    let target = normalize_lexically(&manifest_dir.join(reference));
                    if self.matcher.is_manifest(reference) {
                        pending.push(PendingSplice {
                            tile_path: tile_path.clone(),
                            manifest: target,
                        });
                    } else {
                        let rewritten = relative_url(&target, &self.input_root);
                        content.set_reference(rewritten);
                    }
                }
            }

            if let Some(children) = tile.children.as_mut() {
                for (index, child) in children.iter_mut().enumerate() {
                    let mut child_path = tile_path.clone();
                    child_path.push(index);
                    stack.push((child_path, child));
                }
            }
        }

        pending
    }
}
