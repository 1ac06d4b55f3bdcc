//! Self-deleting temporary files and directories.

use std::env;
use std::fmt;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use log::debug;
use tempfile::{Builder, TempDir, TempPath};

use super::TempOptions;
use crate::error::{Error, Result};
use crate::path::{SemanticPath, SemanticType};

enum Guard {
    File(TempPath),
    Directory(TempDir),
}

/// A temporary file or directory, removed when dropped.
///
/// Dereferences to the [`SemanticPath`] of the entry.
///
/// # Examples
///
/// ```
/// use fluidpath::{SemanticPath, TempOptions, WriteMode};
///
/// let kept_path = {
///     let temp = SemanticPath::temporary_file(&TempOptions::new().with_suffix(".txt")).unwrap();
///     temp.write_text("scratch", WriteMode::Truncate).unwrap();
///     assert!(temp.exists(true, true));
///     temp.path().clone()
/// };
/// assert!(!kept_path.exists(true, false));
/// ```
pub struct Temporary {
    path: SemanticPath,
    guard: Guard,
}

impl Temporary {
    /// The entry's path.
    #[must_use]
    pub fn path(&self) -> &SemanticPath {
        &self.path
    }

    /// Stop managing the entry and return its path. It will not be deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the file could not be detached from its guard.
    pub fn keep(self) -> Result<SemanticPath> {
        let Self { path, guard } = self;
        let kept = match guard {
            Guard::File(temp_path) => temp_path
                .keep()
                .map_err(|e| Error::from_io("keep", path.as_path(), e.error))?,
            Guard::Directory(temp_dir) => temp_dir.keep(),
        };
        debug!("Keeping temporary {}", kept.display());
        Ok(SemanticPath::from_parts(kept, path.semantic_type()))
    }
}

impl Deref for Temporary {
    type Target = SemanticPath;

    fn deref(&self) -> &SemanticPath {
        &self.path
    }
}

impl AsRef<Path> for Temporary {
    fn as_ref(&self) -> &Path {
        self.path.as_path()
    }
}

impl fmt::Debug for Temporary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Temporary")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

fn builder(options: &TempOptions) -> Builder<'_, '_> {
    let mut builder = Builder::new();
    if let Some(prefix) = &options.prefix {
        builder.prefix(prefix);
    }
    if let Some(suffix) = &options.suffix {
        builder.suffix(suffix);
    }
    builder.disable_cleanup(!options.delete);
    builder
}

fn parent_dir(options: &TempOptions) -> PathBuf {
    options
        .parent
        .as_ref()
        .map_or_else(env::temp_dir, SemanticPath::to_path_buf)
}

impl SemanticPath {
    /// Create an empty temporary file.
    ///
    /// # Errors
    ///
    /// The wrapped OS error, e.g. a missing parent directory.
    pub fn temporary_file(options: &TempOptions) -> Result<Temporary> {
        let parent = parent_dir(options);
        let temp_path = builder(options)
            .tempfile_in(&parent)
            .map_err(|e| Error::from_io("temporary_file", &parent, e))?
            .into_temp_path();
        Ok(Temporary {
            path: Self::from_parts(&temp_path, SemanticType::File),
            guard: Guard::File(temp_path),
        })
    }

    /// Create an empty temporary directory.
    ///
    /// # Errors
    ///
    /// The wrapped OS error, e.g. a missing parent directory.
    pub fn temporary_directory(options: &TempOptions) -> Result<Temporary> {
        let parent = parent_dir(options);
        let temp_dir = builder(options)
            .tempdir_in(&parent)
            .map_err(|e| Error::from_io("temporary_directory", &parent, e))?;
        Ok(Temporary {
            path: Self::from_parts(temp_dir.path(), SemanticType::Directory),
            guard: Guard::Directory(temp_dir),
        })
    }
}
