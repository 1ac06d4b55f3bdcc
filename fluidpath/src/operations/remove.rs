//! Deleting files and directory trees.

use std::fs;
use std::path::Path;

use log::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::path::{probe, PhysicalType, SemanticPath};

impl SemanticPath {
    /// Delete whatever is at this path.
    ///
    /// Symlinks are removed themselves, never their targets. Directories must
    /// be empty unless `recursive` is set.
    ///
    /// `ignore_errors` only applies to a recursive tree removal: entries that
    /// cannot be removed are logged and skipped, and the rest of the tree is
    /// still deleted.
    ///
    /// # Errors
    ///
    /// [`Error::PathNotFound`] if nothing is there, or the wrapped OS error
    /// (for example a non-empty directory without `recursive`).
    pub fn delete(&self, recursive: bool, ignore_errors: bool) -> Result<()> {
        let path = self.as_path();
        let result = match probe(path, false)? {
            PhysicalType::DoesNotExist => {
                return Err(Error::PathNotFound {
                    path: path.to_path_buf(),
                    operation: "delete",
                });
            }
            PhysicalType::Directory if recursive && ignore_errors => {
                remove_tree_best_effort(path);
                Ok(())
            }
            PhysicalType::Directory if recursive => fs::remove_dir_all(path),
            PhysicalType::Directory => fs::remove_dir(path),
            _ => fs::remove_file(path),
        };
        result.map_err(|e| Error::from_io("delete", path, e))?;
        debug!("Deleted {}", path.display());
        Ok(())
    }
}

/// Remove a tree deepest-first, skipping whatever cannot be removed.
fn remove_tree_best_effort(root: &Path) {
    for entry in WalkDir::new(root).contents_first(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Ignoring failure while deleting {}: {e}", root.display());
                continue;
            }
        };
        let removed = if entry.file_type().is_dir() {
            fs::remove_dir(entry.path())
        } else {
            fs::remove_file(entry.path())
        };
        if let Err(e) = removed {
            warn!("Ignoring failure to delete {}: {e}", entry.path().display());
        }
    }
}
