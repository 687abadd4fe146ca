//! Flattening the fixture tree end to end

use super::test_utils::{
    count_files_with_extension, read_tileset, Fixture, CONTENT_FILES, EXPECTED_URLS,
};
use serde_json::json;
use std::fs;
use std::path::Path;
use tilemerge::{combine, CombineOptions, FlattenError, Merger};
use tilemerge::paths::ManifestMatcher;

#[tokio::test]
async fn test_merge_rewrites_urls_relative_to_input_root() {
    let fixture = Fixture::new();
    let input = dunce::canonicalize(&fixture.input).unwrap();

    let merged = Merger::new(&input, ManifestMatcher::default())
        .merge(&input.join("tileset.json"))
        .await
        .unwrap();

    assert_eq!(merged.tileset.content_urls(), EXPECTED_URLS);
    assert_eq!(merged.external_tilesets, 2);
    assert!(!merged.compressed);
    assert_eq!(merged.tileset.extra["geometricError"], json!(240));
}

#[tokio::test]
async fn test_default_output_directory() {
    let fixture = Fixture::new();

    let report = combine(Some(fixture.input.as_path()), None, CombineOptions::default())
        .await
        .unwrap();

    let expected_dir = dunce::canonicalize(fixture.default_output()).unwrap();
    assert_eq!(report.output_dir, expected_dir);
    assert_eq!(report.output_manifest, expected_dir.join("tileset.json"));

    let (tileset, compressed) = read_tileset(&report.output_manifest);
    assert!(!compressed);
    assert_eq!(tileset.content_urls(), EXPECTED_URLS);
}

#[tokio::test]
async fn test_output_holds_single_manifest_and_all_content() {
    let fixture = Fixture::new();
    let output = fixture.path().join("flat");

    let report = combine(
        Some(fixture.input.as_path()),
        Some(output.as_path()),
        CombineOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(count_files_with_extension(&output, "json"), 1);
    assert_eq!(report.copied_files, CONTENT_FILES.len());
    // The root manifest plus every inlined external manifest
    assert_eq!(report.skipped_manifests, 1 + report.external_tilesets);

    for file in CONTENT_FILES {
        let copied = fs::read_to_string(output.join(file)).unwrap();
        assert_eq!(copied, format!("b3dm:{}", file));
    }

    // Every surviving reference resolves inside the output tree.
    let (tileset, _) = read_tileset(&report.output_manifest);
    for url in tileset.content_urls() {
        assert!(output.join(Path::new(&url)).is_file(), "missing {}", url);
    }
}

#[tokio::test]
async fn test_pass_through_fields_reach_output() {
    let fixture = Fixture::new();
    let report = combine(Some(fixture.input.as_path()), None, CombineOptions::default())
        .await
        .unwrap();

    let (tileset, _) = read_tileset(&report.output_manifest);
    assert_eq!(tileset.extra["asset"], json!({"version": "0.0"}));
    let root = tileset.root.unwrap();
    assert_eq!(root.extra["refine"], json!("ADD"));
    let spliced = &root.children.as_ref().unwrap()[0];
    // The referencing tile keeps its own bounding volume after the splice.
    assert!(spliced.extra.contains_key("boundingVolume"));
    assert_eq!(spliced.children.as_ref().unwrap().len(), 4);
}

#[tokio::test]
async fn test_missing_input_directory_rejects() {
    let fixture = Fixture::new();
    let missing = fixture.path().join("does-not-exist");

    let err = combine(Some(missing.as_path()), None, CombineOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_no_input_directory_is_invalid_argument() {
    // Validation happens before any future is polled.
    let err = tilemerge::Combine::new(None, None, CombineOptions::default()).unwrap_err();
    assert!(matches!(err, FlattenError::InvalidArgument(_)));
}

#[tokio::test]
async fn test_missing_nested_manifest_aborts_without_output_manifest() {
    let fixture = Fixture::new();
    fs::remove_file(fixture.input.join("tileset3/tileset3.json")).unwrap();

    let err = combine(Some(fixture.input.as_path()), None, CombineOptions::default())
        .await
        .unwrap_err();
    match err {
        FlattenError::NotFound(path) => assert!(path.ends_with("tileset3/tileset3.json")),
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert!(!fixture.default_output().join("tileset.json").exists());
}

#[tokio::test]
async fn test_rerun_overwrites_previous_output() {
    let fixture = Fixture::new();
    let first = combine(Some(fixture.input.as_path()), None, CombineOptions::default())
        .await
        .unwrap();
    fs::write(first.output_dir.join("parent.b3dm"), "stale").unwrap();

    let second = combine(Some(fixture.input.as_path()), None, CombineOptions::default())
        .await
        .unwrap();
    assert_eq!(first.output_manifest, second.output_manifest);
    assert_eq!(
        fs::read_to_string(second.output_dir.join("parent.b3dm")).unwrap(),
        "b3dm:parent.b3dm"
    );
}
