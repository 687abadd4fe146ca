//! Tilemerge: Tileset Flattening
//!
//! Folds a tree of externally referenced 3D tileset manifests into one self-contained
//! manifest, and copies the referenced content files next to it.

pub mod cli;
pub mod combine;
pub mod config;
pub mod error;
pub mod logging;
pub mod merger;
pub mod paths;
pub mod tileset;
pub mod writer;

pub use combine::{combine, Combine, CombineOptions, CombineReport};
pub use error::FlattenError;
pub use merger::{MergedTileset, Merger};
pub use tileset::{Tile, TileContent, Tileset};
