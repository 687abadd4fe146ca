//! Integration tests for tileset flattening

mod compression;
mod flatten;
mod test_utils;
