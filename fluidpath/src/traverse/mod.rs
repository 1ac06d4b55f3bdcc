//! Recursive directory traversal.
//!
//! [`SemanticPath::traverse`] walks a tree lazily, yielding the root and every
//! descendant. Depth is counted in segments below the root, which has depth
//! 0.
//!
//! Pruning happens in the walk itself: `max_depth` stops the walker from
//! opening directories at that depth, and in top-down order hidden or
//! excluded directories are skipped without being listed.
//!
//! # Examples
//!
//! ```no_run
//! use fluidpath::{SemanticPath, TraverseOptions};
//!
//! let root = SemanticPath::new("project/");
//! let options = TraverseOptions::new()
//!     .with_show_hidden(false)
//!     .with_exclude(["target"]);
//! for entry in root.traverse(&options)? {
//!     println!("{}", entry?);
//! }
//! # Ok::<(), fluidpath::Error>(())
//! ```

mod find;

use std::path::{Path, PathBuf};

use glob::Pattern;
use log::debug;
use walkdir::{DirEntry, WalkDir};

use crate::error::{Error, Result};
use crate::path::{SemanticPath, SemanticType};

pub use find::{Find, FindOptions, NamePattern};

/// Options for [`SemanticPath::traverse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraverseOptions {
    /// Yield a directory before its contents. Otherwise after.
    pub top_down: bool,
    /// Descend into symlinked directories.
    pub follow_symlinks: bool,
    /// Include `.`-prefixed entries.
    pub show_hidden: bool,
    /// Deepest depth to yield.
    pub max_depth: Option<usize>,
    /// Globs matched against the `/`-joined path relative to the root.
    pub exclude: Vec<String>,
}

impl Default for TraverseOptions {
    fn default() -> Self {
        Self {
            top_down: true,
            follow_symlinks: false,
            show_hidden: true,
            max_depth: None,
            exclude: Vec::new(),
        }
    }
}

impl TraverseOptions {
    /// Default options: top-down, no symlink following, hidden entries shown.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the traversal order.
    #[must_use]
    pub fn with_top_down(mut self, top_down: bool) -> Self {
        self.top_down = top_down;
        self
    }

    /// Set whether symlinked directories are followed.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow_symlinks: bool) -> Self {
        self.follow_symlinks = follow_symlinks;
        self
    }

    /// Set whether hidden entries are included.
    #[must_use]
    pub fn with_show_hidden(mut self, show_hidden: bool) -> Self {
        self.show_hidden = show_hidden;
        self
    }

    /// Set the maximum depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the exclusion globs.
    #[must_use]
    pub fn with_exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = patterns.into_iter().map(Into::into).collect();
        self
    }
}

/// Decides which entries a walk admits.
#[derive(Debug, Clone)]
struct EntryFilter {
    root: PathBuf,
    show_hidden: bool,
    exclude: Vec<Pattern>,
}

impl EntryFilter {
    fn new(root: &Path, options: &TraverseOptions) -> Result<Self> {
        let exclude = options
            .exclude
            .iter()
            .map(|glob| {
                Pattern::new(glob).map_err(|e| Error::InvalidPattern {
                    pattern: glob.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            root: root.to_path_buf(),
            show_hidden: options.show_hidden,
            exclude,
        })
    }

    /// Check the entry and each of its ancestors below the root.
    fn admits(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return true;
        }
        let relative = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
        let mut joined = String::new();
        for component in relative.components() {
            let name = component.as_os_str().to_string_lossy();
            if !joined.is_empty() {
                joined.push('/');
            }
            joined.push_str(&name);

            if !self.show_hidden && name.starts_with('.') {
                return false;
            }
            if self.exclude.iter().any(|p| p.matches(&joined)) {
                debug!("Excluding {}", entry.path().display());
                return false;
            }
        }
        true
    }
}

type Entries = Box<dyn Iterator<Item = Result<(SemanticPath, usize)>>>;

/// A lazy traversal. Each item is an entry or the error met while reading
/// it; the caller decides whether to continue after an error.
pub struct Traverse {
    entries: Entries,
}

impl Traverse {
    fn new(root: &SemanticPath, options: &TraverseOptions) -> Result<Self> {
        let root_path = root.to_path_buf();
        let filter = EntryFilter::new(&root_path, options)?;

        let mut walker = WalkDir::new(&root_path)
            .follow_links(options.follow_symlinks)
            .contents_first(!options.top_down);
        if let Some(depth) = options.max_depth {
            walker = walker.max_depth(depth);
        }

        // filter_entry prunes whole subtrees, but only works when parents
        // come before their contents.
        let raw: Box<dyn Iterator<Item = walkdir::Result<DirEntry>>> = if options.top_down {
            Box::new(walker.into_iter().filter_entry(move |e| filter.admits(e)))
        } else {
            Box::new(walker.into_iter().filter(move |item| match item {
                Ok(e) => filter.admits(e),
                Err(_) => true,
            }))
        };

        let entries = raw.map(move |item| {
            item.map(|entry| (to_semantic(&entry), entry.depth()))
                .map_err(|e| walk_error(&root_path, e))
        });
        Ok(Self {
            entries: Box::new(entries),
        })
    }

    /// Pair every entry with its depth below the root.
    pub(crate) fn with_depth(self) -> Entries {
        self.entries
    }
}

impl Iterator for Traverse {
    type Item = Result<SemanticPath>;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|item| item.map(|(path, _)| path))
    }
}

fn to_semantic(entry: &DirEntry) -> SemanticPath {
    let file_type = entry.file_type();
    let is_dir = file_type.is_dir() || (file_type.is_symlink() && entry.path().is_dir());
    let semantic_type = if is_dir {
        SemanticType::Directory
    } else {
        SemanticType::File
    };
    SemanticPath::from_parts(entry.path(), semantic_type)
}

fn walk_error(root: &Path, err: walkdir::Error) -> Error {
    let path = err.path().unwrap_or(root).to_path_buf();
    match err.into_io_error() {
        Some(source) => Error::from_io("traverse", &path, source),
        None => Error::InvalidPath {
            path,
            reason: "filesystem loop detected".to_string(),
        },
    }
}

impl SemanticPath {
    /// Walk this directory tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if an exclusion glob is malformed.
    /// Errors met during the walk are yielded as items instead.
    pub fn traverse(&self, options: &TraverseOptions) -> Result<Traverse> {
        Traverse::new(self, options)
    }
}
