//! Common test utilities for integration tests.
//!
//! This module builds the reference directory tree the integration tests run
//! against.

use std::fs;
use std::path::{Path, PathBuf};

use fluidpath::{SemanticPath, SemanticType};
use tempfile::TempDir;

/// A populated directory tree inside a temporary directory.
///
/// ```text
/// root/
///   a/b/file.txt
///   a/c/file.txt
///   a/c/file2.log
///   a/c/d/image.png
///   .hidden-dir/file.txt
///   .hidden-file
///   file.ext1.ext2.ext3
///   no-extension
///   trailing-dot.
///   final-trailing-dot.ext.
///   symlink-to-file -> a/b/file.txt        (unix only)
///   symlink-to-dir -> a/c/                 (unix only)
///   broken-symlink -> does-not-exist       (unix only)
/// ```
///
/// The tree is removed when the fixture is dropped.
pub struct MockFs {
    _dir: TempDir,
    root: PathBuf,
}

#[allow(dead_code)]
impl MockFs {
    /// Creates the tree.
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        // Canonical so that comparisons with resolved paths hold on systems
        // where the temp directory sits behind a symlink.
        let root = dir.path().canonicalize().unwrap().join("root");

        for sub in ["a/b", "a/c/d", ".hidden-dir"] {
            fs::create_dir_all(root.join(sub)).unwrap();
        }
        for file in [
            "a/b/file.txt",
            "a/c/file.txt",
            "a/c/file2.log",
            "a/c/d/image.png",
            ".hidden-dir/file.txt",
            ".hidden-file",
            "file.ext1.ext2.ext3",
            "no-extension",
            "trailing-dot.",
            "final-trailing-dot.ext.",
        ] {
            fs::write(root.join(file), file).unwrap();
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::symlink;
            symlink(root.join("a/b/file.txt"), root.join("symlink-to-file")).unwrap();
            symlink(root.join("a/c"), root.join("symlink-to-dir")).unwrap();
            symlink(root.join("does-not-exist"), root.join("broken-symlink")).unwrap();
        }

        Self { _dir: dir, root }
    }

    /// The tree's root directory.
    pub fn root(&self) -> SemanticPath {
        SemanticPath::new(&self.root).with_semantic_type(SemanticType::Directory)
    }

    /// A path below the root, typed by its spelling.
    pub fn path(&self, relative: &str) -> SemanticPath {
        self.root().join([relative])
    }

    /// The raw filesystem path below the root.
    pub fn raw(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// The root as a plain path.
    pub fn root_path(&self) -> &Path {
        &self.root
    }
}

/// Renders every path relative to `root`, sorted.
#[allow(dead_code)]
pub fn relative_names(root: &SemanticPath, paths: impl IntoIterator<Item = SemanticPath>) -> Vec<String> {
    let mut names: Vec<String> = paths
        .into_iter()
        .map(|p| p.relative_to(root, false).unwrap().to_string())
        .collect();
    names.sort();
    names
}
