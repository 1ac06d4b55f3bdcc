//! Integration tests for reconciling semantic types with the filesystem.

mod common;

use common::MockFs;
use fluidpath::{PhysicalType, SemanticPath, SemanticType};

#[test]
fn test_existing_directory_without_marker_is_directory() {
    let fs = MockFs::new();
    let p = fs.path("a/b");
    assert_eq!(p.semantic_type(), SemanticType::File);
    assert!(p.is_directory(true, false));
    assert!(p.is_directory(true, true));
    assert!(!p.is_file(true, false));
}

#[test]
fn test_missing_directory_falls_back_to_semantic_type() {
    let fs = MockFs::new();
    let p = fs.path("nonexistent/");
    assert!(p.is_directory(true, false));
    assert!(!p.is_directory(true, true));
    assert!(!p.is_file(true, false));

    let q = fs.path("nonexistent");
    assert!(q.is_file(true, false));
    assert!(!q.is_file(true, true));
}

#[test]
fn test_strict_exists_checks_category() {
    let fs = MockFs::new();
    let file_as_dir = fs.path("a/b/file.txt/");
    assert_eq!(file_as_dir.semantic_type(), SemanticType::Directory);
    assert!(file_as_dir.exists(true, false));
    assert!(!file_as_dir.exists(true, true));

    let dir_as_file = fs.path("a/b");
    assert!(dir_as_file.exists(true, false));
    assert!(!dir_as_file.exists(true, true));
}

#[test]
fn test_missing_intermediate_is_not_an_error() {
    let fs = MockFs::new();
    // a/b/file.txt is a file, so anything below it fails with ENOTDIR.
    let below_file = fs.path("a/b/file.txt/child");
    assert!(!below_file.try_exists(true, false).unwrap());
    assert_eq!(below_file.physical_type(), PhysicalType::DoesNotExist);
}

#[test]
fn test_trailing_dot_names() {
    let fs = MockFs::new();
    let p = fs.path("trailing-dot.");
    assert_eq!(p.semantic_type(), SemanticType::File);
    assert_eq!(p.suffix(), ".");
    assert_eq!(p.stem(), "trailing-dot");
    assert!(p.is_file(true, true));

    let q = fs.path("final-trailing-dot.ext.");
    assert_eq!(q.suffixes(), vec![".ext", "."]);
    assert!(q.exists(true, true));

    let r = fs.path("file.ext1.ext2.ext3");
    assert_eq!(r.suffixes(), vec![".ext1", ".ext2", ".ext3"]);
    assert_eq!(fs.path("no-extension").suffix(), "");
}

#[test]
#[cfg(unix)]
fn test_symlink_physical_types() {
    let fs = MockFs::new();
    assert_eq!(fs.path("symlink-to-file").physical_type(), PhysicalType::Symlink);
    assert_eq!(fs.path("symlink-to-dir").physical_type(), PhysicalType::Symlink);
    assert_eq!(fs.path("broken-symlink").physical_type(), PhysicalType::Symlink);

    // Followed, the directory link is a directory and the broken one absent.
    assert!(fs.path("symlink-to-dir").is_directory(true, true));
    assert!(!fs.path("symlink-to-dir").is_directory(false, true));
    assert!(fs.path("symlink-to-dir").is_file(false, true));
    assert!(!fs.path("broken-symlink").exists(true, false));
    assert!(fs.path("broken-symlink").exists(false, true));
}

#[test]
#[cfg(unix)]
fn test_resolve_rederives_type() {
    let fs = MockFs::new();
    let resolved = fs.path("symlink-to-dir").resolve(true).unwrap();
    assert_eq!(resolved.as_path(), fs.raw("a/c"));
    assert_eq!(resolved.semantic_type(), SemanticType::Directory);

    let resolved = fs.path("symlink-to-file").resolve(true).unwrap();
    assert_eq!(resolved.as_path(), fs.raw("a/b/file.txt"));
    assert_eq!(resolved.semantic_type(), SemanticType::File);
}

#[test]
#[cfg(unix)]
fn test_read_link() {
    let fs = MockFs::new();
    let target = fs.path("symlink-to-dir").read_link().unwrap();
    assert_eq!(target.as_path(), fs.raw("a/c"));
    assert_eq!(target.semantic_type(), SemanticType::Directory);

    let dangling = fs.path("broken-symlink").read_link().unwrap();
    assert_eq!(dangling.semantic_type(), SemanticType::File);
    assert!(fs.path("a/b/file.txt").read_link().is_err());
}

#[test]
fn test_resolve_is_idempotent() {
    let fs = MockFs::new();
    let once = fs.path("a/c/../b/./file.txt").resolve(true).unwrap();
    assert_eq!(once.resolve(true).unwrap(), once);
    assert_eq!(once, SemanticPath::new(fs.raw("a/b/file.txt")));
}

#[test]
fn test_resolve_missing() {
    let fs = MockFs::new();
    let missing = fs.path("missing/");
    let lenient = missing.resolve(false).unwrap();
    assert_eq!(lenient, missing);
    assert_eq!(lenient.semantic_type(), SemanticType::Directory);

    assert!(missing.resolve(true).unwrap_err().is_not_found());
}

#[test]
fn test_conform_to_filesystem() {
    let fs = MockFs::new();
    let conformed = fs.path("a/c/../b").conform_to_filesystem();
    assert_eq!(conformed.as_path(), fs.raw("a/b"));
    assert_eq!(conformed.semantic_type(), SemanticType::Directory);

    let untouched = fs.path("x/../missing/").conform_to_filesystem();
    assert_eq!(untouched.as_path(), fs.raw("missing"));
    assert_eq!(untouched.semantic_type(), SemanticType::Directory);
}

#[test]
fn test_stat() {
    let fs = MockFs::new();
    let metadata = fs.path("a/c/file2.log").stat(true).unwrap();
    assert_eq!(metadata.len(), "a/c/file2.log".len() as u64);
    assert!(fs.path("nope").stat(true).unwrap_err().is_not_found());
}
