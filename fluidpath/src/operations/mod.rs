//! Filesystem mutations on [`SemanticPath`](crate::SemanticPath).
//!
//! Each submodule adds methods to `SemanticPath`:
//!
//! - `create`: directories and files
//! - `remove`: deletion, with or without recursion
//! - `transfer`: copy, move, rename, replace and links
//! - `ownership`: permission bits, ownership and timestamp copying
//! - `io`: reading and writing content, including atomic replacement
//! - `temporary`: self-deleting temporary files and directories
//! - `usage`: disk usage of the containing filesystem
//!
//! Errors are never swallowed unless an option explicitly asks for
//! best-effort behavior.

mod create;
mod io;
mod ownership;
mod remove;
mod temporary;
mod transfer;
mod usage;

use serde::{Deserialize, Serialize};

use crate::path::SemanticPath;

pub use temporary::Temporary;
pub use usage::{DiskUsage, SizeUnit};

/// How `write_*` treats existing content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Replace existing content.
    #[default]
    Truncate,
    /// Add to the end of existing content.
    Append,
}

/// A user or group, by numeric id or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Owner {
    /// A numeric uid or gid.
    Id(u32),
    /// A name to be looked up.
    Name(String),
}

impl From<u32> for Owner {
    fn from(id: u32) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for Owner {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for Owner {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// Options for [`SemanticPath::copy`].
///
/// # Examples
///
/// ```
/// use fluidpath::CopyOptions;
///
/// let options = CopyOptions::new()
///     .with_dirs_exist_ok(true)
///     .with_ignore(["*.pyc", "__pycache__"]);
/// assert!(options.follow_symlinks);
/// assert_eq!(options.ignore.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyOptions {
    /// Copy what a symlink points to rather than the link itself.
    pub follow_symlinks: bool,
    /// Copy permission bits and timestamps too.
    pub metadata: bool,
    /// Inside directory trees, recreate symlinks instead of following them.
    pub maintain_symlinks: bool,
    /// Allow copying a directory onto an existing directory.
    pub dirs_exist_ok: bool,
    /// Glob patterns for entry names to skip inside directory trees.
    pub ignore: Vec<String>,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            follow_symlinks: true,
            metadata: true,
            maintain_symlinks: false,
            dirs_exist_ok: false,
            ignore: Vec::new(),
        }
    }
}

impl CopyOptions {
    /// Default options: follow symlinks, copy metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether top-level symlinks are followed.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow_symlinks: bool) -> Self {
        self.follow_symlinks = follow_symlinks;
        self
    }

    /// Set whether metadata is copied.
    #[must_use]
    pub fn with_metadata(mut self, metadata: bool) -> Self {
        self.metadata = metadata;
        self
    }

    /// Set whether symlinks inside trees are recreated.
    #[must_use]
    pub fn with_maintain_symlinks(mut self, maintain_symlinks: bool) -> Self {
        self.maintain_symlinks = maintain_symlinks;
        self
    }

    /// Set whether an existing destination directory is allowed.
    #[must_use]
    pub fn with_dirs_exist_ok(mut self, dirs_exist_ok: bool) -> Self {
        self.dirs_exist_ok = dirs_exist_ok;
        self
    }

    /// Set the ignore globs.
    #[must_use]
    pub fn with_ignore<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore = patterns.into_iter().map(Into::into).collect();
        self
    }
}

/// Options for temporary files and directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempOptions {
    /// Name prefix.
    pub prefix: Option<String>,
    /// Name suffix.
    pub suffix: Option<String>,
    /// Directory to create in; the system temp directory if unset.
    pub parent: Option<SemanticPath>,
    /// Delete when the guard is dropped.
    pub delete: bool,
}

impl Default for TempOptions {
    fn default() -> Self {
        Self {
            prefix: None,
            suffix: None,
            parent: None,
            delete: true,
        }
    }
}

impl TempOptions {
    /// Default options: system temp directory, deleted on drop.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the name suffix.
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Set the parent directory.
    #[must_use]
    pub fn with_parent(mut self, parent: SemanticPath) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set whether the entry is deleted on drop.
    #[must_use]
    pub fn with_delete(mut self, delete: bool) -> Self {
        self.delete = delete;
        self
    }
}
