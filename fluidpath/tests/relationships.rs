//! Integration tests for relationships between paths.

mod common;

use common::MockFs;
use fluidpath::{PathRelationship, SemanticPath};

#[test]
fn test_relative_to_lexical() {
    let fs = MockFs::new();
    let root = fs.root();
    let file = fs.path("a/c/d/image.png");
    assert!(file.is_relative_to(&root, false).unwrap());
    assert_eq!(file.relative_to(&root, false).unwrap().to_string(), "a/c/d/image.png");
    assert_eq!(root.relative_depth(&file).unwrap(), 4);
    assert!(root.contains(&file));
    assert!(!file.contains(&root));
    assert!(root.relative_depth(&SemanticPath::new("/elsewhere")).is_err());
}

#[test]
#[cfg(unix)]
fn test_relative_to_strict_resolves_links() {
    let fs = MockFs::new();
    let through_link = fs.path("symlink-to-dir/d/image.png");
    let c = fs.path("a/c/");

    assert!(!through_link.is_relative_to(&c, false).unwrap());
    assert!(through_link.is_relative_to(&c, true).unwrap());
    assert_eq!(
        through_link.relative_to(&c, true).unwrap().to_string(),
        "d/image.png"
    );
}

#[test]
fn test_relative_to_strict_missing_side() {
    let fs = MockFs::new();
    let missing = fs.path("a/missing/../b/new.txt");
    assert!(missing.is_relative_to(&fs.path("a/b/"), true).unwrap());
    assert!(!missing.is_relative_to(&fs.path("a/c/"), true).unwrap());
}

#[test]
fn test_relative_to_unrelated() {
    let fs = MockFs::new();
    let err = fs
        .path("a/b/file.txt")
        .relative_to(&fs.path("a/c/"), false)
        .unwrap_err();
    assert!(err.to_string().contains("is not in the subpath of"));
}

#[test]
fn test_relationship_classification() {
    let fs = MockFs::new();
    let a = fs.raw("a");
    let file = fs.raw("a/b/file.txt");
    assert!(PathRelationship::between(&a, &file).is_hierarchical());
    assert!(PathRelationship::between(&file, &a).is_hierarchical());
    assert!(!PathRelationship::between(&fs.raw("a/b"), &fs.raw("a/c")).is_hierarchical());
}

#[test]
fn test_uri_round_trip_for_existing_paths() {
    let fs = MockFs::new();
    for relative in ["a/b/", "a/c/file2.log", "trailing-dot."] {
        let path = fs.path(relative);
        let uri = path.as_uri().unwrap();
        assert!(uri.starts_with("file:///"));
        assert_eq!(SemanticPath::from_uri(&uri).unwrap(), path);
    }
}
