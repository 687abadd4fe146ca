//! Manifest byte encoding
//!
//! A manifest on disk is either plain UTF-8 JSON or the same JSON wrapped in gzip. The
//! state is sniffed from the gzip magic bytes; the file name says nothing about it.
//!
//! Tile trees can nest far deeper than serde_json's default recursion limit, so manifests
//! are parsed with the limit disabled and the stack grown on demand.

use super::Tileset;
use crate::error::FlattenError;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Deserialize;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// RFC 1952 member header
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Whether `bytes` start with the gzip magic number
pub fn is_gzipped(bytes: &[u8]) -> bool {
    bytes.starts_with(&GZIP_MAGIC)
}

/// Gzip `bytes` at the default compression level
pub fn gzip(bytes: &[u8]) -> Result<Vec<u8>, std::io::Error> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(bytes.len() / 2), Compression::default());
    encoder.write_all(bytes)?;
    encoder.finish()
}

/// Inflate gzip `bytes`, concatenating every member
pub fn gunzip(bytes: &[u8]) -> Result<Vec<u8>, std::io::Error> {
    let mut decoded = Vec::with_capacity(bytes.len() * 4);
    MultiGzDecoder::new(bytes).read_to_end(&mut decoded)?;
    Ok(decoded)
}

fn parse_tileset(json: &[u8]) -> Result<Tileset, serde_json::Error> {
    let mut deserializer = serde_json::Deserializer::from_slice(json);
    deserializer.disable_recursion_limit();
    let tileset = Tileset::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;
    Ok(tileset)
}

/// Decode manifest bytes read from `path`.
///
/// Returns the parsed tileset and whether the bytes were gzip-compressed.
pub fn decode_manifest(path: &Path, bytes: &[u8]) -> Result<(Tileset, bool), FlattenError> {
    let compressed = is_gzipped(bytes);
    let tileset = if compressed {
        let json = gunzip(bytes).map_err(|e| FlattenError::io(path, e))?;
        parse_tileset(&json)
    } else {
        parse_tileset(bytes)
    }
    .map_err(|source| FlattenError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok((tileset, compressed))
}

/// Serialize `tileset` bound for `path`, gzipping the JSON when `compressed` is set
pub fn encode_manifest(
    path: &Path,
    tileset: &Tileset,
    compressed: bool,
) -> Result<Vec<u8>, FlattenError> {
    let json = serde_json::to_vec(tileset).map_err(|source| FlattenError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if !compressed {
        return Ok(json);
    }
    gzip(&json).map_err(|e| FlattenError::io(path, e))
}

/// Read and decode the manifest at `path`
pub async fn read_manifest(path: &Path) -> Result<(Tileset, bool), FlattenError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| FlattenError::io(path, e))?;
    debug!(path = %path.display(), bytes = bytes.len(), "Read tileset manifest");
    decode_manifest(path, &bytes)
}

/// Encode `tileset` and write it to `path`, creating parent directories
pub async fn write_manifest(
    path: &Path,
    tileset: &Tileset,
    compressed: bool,
) -> Result<(), FlattenError> {
    let bytes = encode_manifest(path, tileset, compressed)?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| FlattenError::io(parent, e))?;
    }
    tokio::fs::write(path, &bytes)
        .await
        .map_err(|e| FlattenError::io(path, e))?;
    debug!(path = %path.display(), bytes = bytes.len(), compressed, "Wrote tileset manifest");
    Ok(())
}

/// Gzip the file at `path` in place and return its path.
pub async fn compress_file(path: &Path) -> Result<PathBuf, FlattenError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| FlattenError::io(path, e))?;
    let compressed = gzip(&bytes).map_err(|e| FlattenError::io(path, e))?;
    tokio::fs::write(path, compressed)
        .await
        .map_err(|e| FlattenError::io(path, e))?;
    Ok(path.to_path_buf())
}
