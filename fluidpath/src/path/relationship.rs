//! Lexical containment between paths.
//!
//! Nothing here touches the filesystem. Strict, symlink-aware comparisons
//! live on [`SemanticPath`](crate::SemanticPath) and feed resolved paths in.

use std::path::{Path, PathBuf};

use crate::path::normalize;

/// How two locations sit relative to each other in the tree.
///
/// # Examples
///
/// ```
/// use fluidpath::path::PathRelationship;
/// use std::path::Path;
///
/// let rel = PathRelationship::between(Path::new("srv/"), Path::new("srv/app/log"));
/// assert_eq!(rel, PathRelationship::Ancestor);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathRelationship {
    /// The first location contains the second.
    Ancestor,
    /// The first location lies inside the second.
    Descendant,
    /// Both name the same location.
    Same,
    /// Neither contains the other.
    Unrelated,
}

impl PathRelationship {
    /// Classify `path1` against `path2`.
    ///
    /// Trailing separators and `.` components do not matter; `..` is kept
    /// as written.
    ///
    /// ```
    /// use fluidpath::path::PathRelationship;
    /// use std::path::Path;
    ///
    /// assert_eq!(
    ///     PathRelationship::between(Path::new("/a/b"), Path::new("/a")),
    ///     PathRelationship::Descendant
    /// );
    /// assert_eq!(
    ///     PathRelationship::between(Path::new("/a/"), Path::new("/a")),
    ///     PathRelationship::Same
    /// );
    /// ```
    #[must_use]
    pub fn between(path1: &Path, path2: &Path) -> Self {
        match (
            Self::depth_below(path1, path2),
            Self::depth_below(path2, path1),
        ) {
            (Some(0), _) => Self::Same,
            (Some(_), _) => Self::Ancestor,
            (None, Some(_)) => Self::Descendant,
            (None, None) => Self::Unrelated,
        }
    }

    /// `false` only for [`Unrelated`](Self::Unrelated).
    #[must_use]
    pub fn is_hierarchical(&self) -> bool {
        !matches!(self, Self::Unrelated)
    }

    /// Whether `path` is `directory` or lies below it.
    #[must_use]
    pub fn is_within(path: &Path, directory: &Path) -> bool {
        Self::depth_below(directory, path).is_some()
    }

    /// Whether `other` is `path` or lies below it.
    #[must_use]
    pub fn contains(path: &Path, other: &Path) -> bool {
        Self::depth_below(path, other).is_some()
    }

    /// Segments between `base` and `other`, when `other` is inside `base`.
    ///
    /// ```
    /// use fluidpath::path::PathRelationship;
    /// use std::path::Path;
    ///
    /// assert_eq!(PathRelationship::depth_below(Path::new("/a"), Path::new("/a/b/c")), Some(2));
    /// assert_eq!(PathRelationship::depth_below(Path::new("/a"), Path::new("/a")), Some(0));
    /// assert_eq!(PathRelationship::depth_below(Path::new("/a"), Path::new("/b")), None);
    /// ```
    #[must_use]
    pub fn depth_below(base: &Path, other: &Path) -> Option<usize> {
        let base = comparable(base);
        comparable(other)
            .strip_prefix(&base)
            .ok()
            .map(|rest| rest.components().count())
    }
}

/// Clean a path for prefix comparison. The current directory becomes the
/// empty path so that it prefixes every relative path.
pub(crate) fn comparable(path: &Path) -> PathBuf {
    let cleaned = normalize::clean(path);
    if cleaned == Path::new(".") {
        PathBuf::new()
    } else {
        cleaned
    }
}
