//! Tileset Data Model
//!
//! A tileset manifest holds one optional root tile; every tile may reference a single
//! resource through its content and own an ordered list of child tiles. Fields this crate
//! does not interpret (bounding volumes, geometric error, asset metadata, extensions)
//! are carried through untouched.
//!
//! On output each object writes its typed keys (`root`, `content`, `children`, `url`,
//! `uri`) first, followed by the pass-through keys in their original order.

pub mod codec;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A tileset manifest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tileset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<Tile>,

    /// Top-level fields other than `root`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A node of the tileset tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<TileContent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Tile>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reference from a tile to its resource
///
/// Older manifests name the reference `url`, newer ones `uri`. Whichever key was read is
/// the key written back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TileContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TileContent {
    /// Content referencing `url` under the legacy key
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// The referenced path, preferring `url` when both keys are present
    pub fn reference(&self) -> Option<&str> {
        self.url.as_deref().or(self.uri.as_deref())
    }

    /// Replace the reference, keeping the key the manifest used
    pub fn set_reference(&mut self, reference: String) {
        if self.url.is_some() || self.uri.is_none() {
            self.url = Some(reference);
        } else {
            self.uri = Some(reference);
        }
    }
}

impl Tile {
    /// Leaf tile with content at `url`
    pub fn with_content(url: impl Into<String>) -> Self {
        Self {
            content: Some(TileContent::with_url(url)),
            ..Self::default()
        }
    }

    /// Tile without content owning `children`
    pub fn with_children(children: Vec<Tile>) -> Self {
        Self {
            children: Some(children),
            ..Self::default()
        }
    }

    /// The content reference of this tile, if any
    pub fn reference(&self) -> Option<&str> {
        self.content.as_ref().and_then(TileContent::reference)
    }

    /// Content references of this subtree in pre-order (parent before children,
    /// siblings in order).
    pub fn content_urls(&self) -> Vec<String> {
        let mut urls = Vec::new();
        let mut stack = vec![self];
        while let Some(tile) = stack.pop() {
            if let Some(url) = tile.reference() {
                urls.push(url.to_string());
            }
            if let Some(children) = &tile.children {
                stack.extend(children.iter().rev());
            }
        }
        urls
    }

    /// Walk to the descendant at `path`, each entry an index into `children`.
    pub fn descendant_mut(&mut self, path: &[usize]) -> Option<&mut Tile> {
        let mut tile = self;
        for &index in path {
            tile = tile.children.as_mut()?.get_mut(index)?;
        }
        Some(tile)
    }

    /// Overwrite this tile's content and children with those of `resolved`.
    ///
    /// Every other field of this tile is kept.
    pub fn splice(&mut self, resolved: Tile) {
        self.content = resolved.content;
        self.children = resolved.children;
    }
}

impl Tileset {
    /// Content references of the whole tree in pre-order
    pub fn content_urls(&self) -> Vec<String> {
        self.root.as_ref().map(Tile::content_urls).unwrap_or_default()
    }
}
