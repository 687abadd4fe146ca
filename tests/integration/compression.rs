//! Compression state of the merged manifest follows the root manifest only

use super::test_utils::{read_tileset, Compression, Fixture, EXPECTED_URLS};
use tilemerge::{combine, CombineOptions};

async fn run(compression: Compression) -> (Vec<String>, bool, bool) {
    let fixture = Fixture::with_compression(compression);
    let report = combine(Some(fixture.input.as_path()), None, CombineOptions::default())
        .await
        .unwrap();
    let (tileset, on_disk_compressed) = read_tileset(&report.output_manifest);
    (tileset.content_urls(), report.compressed, on_disk_compressed)
}

#[tokio::test]
async fn test_compressed_root_gives_compressed_output() {
    let (urls, reported, on_disk) = run(Compression {
        root: true,
        nested: false,
    })
    .await;
    assert!(reported);
    assert!(on_disk);
    assert_eq!(urls, EXPECTED_URLS);
}

#[tokio::test]
async fn test_compressed_root_and_nested() {
    let (urls, _, on_disk) = run(Compression {
        root: true,
        nested: true,
    })
    .await;
    assert!(on_disk);
    assert_eq!(urls, EXPECTED_URLS);
}

#[tokio::test]
async fn test_plain_root_with_compressed_nested_stays_plain() {
    let (urls, reported, on_disk) = run(Compression {
        root: false,
        nested: true,
    })
    .await;
    assert!(!reported);
    assert!(!on_disk);
    assert_eq!(urls, EXPECTED_URLS);
}

#[tokio::test]
async fn test_compress_helper_matches_fixture_encoding() {
    let fixture = Fixture::new();
    let root = fixture.input.join("tileset.json");
    let (before, _) = read_tileset(&root);

    let path = tilemerge::tileset::codec::compress_file(&root).await.unwrap();
    let (after, compressed) = read_tileset(&path);
    assert!(compressed);
    assert_eq!(before, after);
}
