//! Shared fixtures for integration tests
//!
//! Builds a small tileset tree on disk:
//!
//! ```text
//! Tileset/
//!   tileset.json            root: parent.b3dm, child -> tileset2.json
//!   tileset2.json           children: tileset3/tileset3.json, lr, ur, ul
//!   tileset3/tileset3.json  root: ll.b3dm
//!   parent.b3dm lr.b3dm ur.b3dm ul.b3dm tileset3/ll.b3dm
//! ```

use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tilemerge::tileset::codec::{gunzip, is_gzipped};
use tilemerge::Tileset;

/// Content references of the fixture after merging, in pre-order
pub const EXPECTED_URLS: [&str; 5] = [
    "parent.b3dm",
    "tileset3/ll.b3dm",
    "lr.b3dm",
    "ur.b3dm",
    "ul.b3dm",
];

pub const CONTENT_FILES: [&str; 5] = [
    "parent.b3dm",
    "lr.b3dm",
    "ur.b3dm",
    "ul.b3dm",
    "tileset3/ll.b3dm",
];

/// Which fixture manifests are stored gzip-compressed
#[derive(Debug, Clone, Copy, Default)]
pub struct Compression {
    pub root: bool,
    pub nested: bool,
}

/// Fixture tree inside a temporary directory
pub struct Fixture {
    _temp_dir: TempDir,
    pub input: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_compression(Compression::default())
    }

    pub fn with_compression(compression: Compression) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("Tileset");
        fs::create_dir_all(input.join("tileset3")).unwrap();

        write_manifest(
            &input.join("tileset.json"),
            json!({
                "asset": {"version": "0.0"},
                "geometricError": 240,
                "root": {
                    "boundingVolume": {"region": [-1.3197, 0.6988, -1.3196, 0.6989, 0, 20]},
                    "geometricError": 70,
                    "refine": "ADD",
                    "content": {"url": "parent.b3dm"},
                    "children": [{
                        "boundingVolume": {"region": [-1.3197, 0.6988, -1.3196, 0.6989, 0, 20]},
                        "geometricError": 70,
                        "content": {"url": "tileset2.json"}
                    }]
                }
            }),
            compression.root,
        );
        write_manifest(
            &input.join("tileset2.json"),
            json!({
                "asset": {"version": "0.0"},
                "geometricError": 70,
                "root": {
                    "geometricError": 70,
                    "children": [
                        {"geometricError": 0, "content": {"url": "tileset3/tileset3.json"}},
                        {"geometricError": 0, "content": {"url": "lr.b3dm"}},
                        {"geometricError": 0, "content": {"url": "ur.b3dm"}},
                        {"geometricError": 0, "content": {"url": "ul.b3dm"}}
                    ]
                }
            }),
            compression.nested,
        );
        write_manifest(
            &input.join("tileset3/tileset3.json"),
            json!({
                "asset": {"version": "0.0"},
                "geometricError": 0,
                "root": {"geometricError": 0, "content": {"url": "ll.b3dm"}}
            }),
            compression.nested,
        );

        for file in CONTENT_FILES {
            fs::write(input.join(file), format!("b3dm:{}", file)).unwrap();
        }

        Self {
            _temp_dir: temp_dir,
            input,
        }
    }

    /// Output directory used when none is given
    pub fn default_output(&self) -> PathBuf {
        self.input.parent().unwrap().join("Tileset-combined")
    }

    pub fn path(&self) -> &Path {
        self.input.parent().unwrap()
    }
}

fn write_manifest(path: &Path, value: serde_json::Value, compressed: bool) {
    let json = serde_json::to_vec(&value).unwrap();
    let bytes = if compressed {
        tilemerge::tileset::codec::gzip(&json).unwrap()
    } else {
        json
    };
    fs::write(path, bytes).unwrap();
}

/// Read a manifest from disk, reporting whether it was compressed
pub fn read_tileset(path: &Path) -> (Tileset, bool) {
    let bytes = fs::read(path).unwrap();
    let compressed = is_gzipped(&bytes);
    let json = if compressed { gunzip(&bytes).unwrap() } else { bytes };
    (serde_json::from_slice(&json).unwrap(), compressed)
}

/// Count files with the given extension below `dir`
pub fn count_files_with_extension(dir: &Path, extension: &str) -> usize {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .map(|ext| ext == extension)
                .unwrap_or(false)
        })
        .count()
}
