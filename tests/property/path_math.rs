//! Property-based tests for relative content references

use proptest::prelude::*;
use std::path::PathBuf;
use tilemerge::paths::{normalize_lexically, relative_url};
use tilemerge::Tile;

fn segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,7}"
}

/// A reference made relative to its own root resolves back to the same file
#[test]
fn test_relative_url_roundtrips_through_join() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(
                prop::collection::vec(segment(), 1..4),
                prop::collection::vec(segment(), 1..5),
            ),
            |(base_parts, target_parts)| {
                let base: PathBuf = std::iter::once("/".to_string())
                    .chain(base_parts.iter().cloned())
                    .collect();
                let target = base.join(target_parts.iter().collect::<PathBuf>());

                let url = relative_url(&target, &base);
                prop_assert!(!url.contains('\\'));
                prop_assert!(!url.starts_with('/'));
                prop_assert_eq!(&url, &target_parts.join("/"));
                prop_assert_eq!(normalize_lexically(&base.join(&url)), target);
                Ok(())
            },
        )
        .unwrap();
}

/// `..` hops inside a nested manifest directory never leak into the rewritten url
#[test]
fn test_parent_hops_are_resolved() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(prop::collection::vec(segment(), 1..4), segment()),
            |(nested_dirs, file)| {
                let root = PathBuf::from("/input");
                let manifest_dir: PathBuf =
                    std::iter::once(root.clone()).chain(nested_dirs.iter().map(PathBuf::from)).collect();
                let up = vec![".."; nested_dirs.len()].join("/");
                let reference = format!("{}/{}.b3dm", up, file);

                let url = relative_url(&manifest_dir.join(&reference), &root);
                prop_assert_eq!(url, format!("{}.b3dm", file));
                Ok(())
            },
        )
        .unwrap();
}

/// Pre-order listing visits a parent before its children and keeps sibling order
#[test]
fn test_content_urls_follow_sibling_order() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&prop::collection::vec(segment(), 0..12), |names| {
            let tile = Tile {
                children: Some(names.iter().map(|n| Tile::with_content(n.clone())).collect()),
                ..Tile::with_content("parent.b3dm")
            };
            let mut expected = vec!["parent.b3dm".to_string()];
            expected.extend(names.iter().cloned());
            prop_assert_eq!(tile.content_urls(), expected);
            Ok(())
        })
        .unwrap();
}
