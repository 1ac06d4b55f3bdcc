//! Semantic path types.
//!
//! The semantic type is what a path's spelling claims: a trailing separator,
//! `.` or `..` mean "directory", anything else means "file". It is decided
//! without touching the filesystem.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Whether a path is meant as a file or as a directory.
///
/// # Examples
///
/// ```
/// use fluidpath::SemanticType;
///
/// assert_eq!(SemanticType::infer("notes.txt"), SemanticType::File);
/// assert_eq!(SemanticType::infer("build/"), SemanticType::Directory);
/// assert_eq!(SemanticType::infer(".."), SemanticType::Directory);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    /// The path names a file.
    File,
    /// The path names a directory.
    Directory,
}

impl SemanticType {
    /// Infer the semantic type from the tail of a path.
    ///
    /// Rules, in order:
    /// 1. `.` and `..` are directories.
    /// 2. A trailing platform separator means directory.
    /// 3. A trailing `/` means directory on platforms whose separator differs.
    /// 4. Everything else is a file.
    ///
    /// The empty string denotes the current directory.
    #[must_use]
    pub fn infer(tail: impl AsRef<OsStr>) -> Self {
        let bytes = tail.as_ref().as_encoded_bytes();
        if bytes.is_empty() || bytes == b"." || bytes == b".." {
            return Self::Directory;
        }
        if bytes.last().copied().is_some_and(is_separator) {
            return Self::Directory;
        }
        Self::File
    }

    /// The rendering marker appended to a path of this type.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::File => "",
            Self::Directory => std::path::MAIN_SEPARATOR_STR,
        }
    }

    /// Whether this is `Directory`.
    #[must_use]
    pub const fn is_directory(self) -> bool {
        matches!(self, Self::Directory)
    }

    /// Whether this is `File`.
    #[must_use]
    pub const fn is_file(self) -> bool {
        matches!(self, Self::File)
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Directory => write!(f, "directory"),
        }
    }
}

/// Whether a byte is a path separator on this platform.
///
/// `/` is always accepted so that POSIX-style spellings keep their meaning
/// on Windows.
pub(crate) fn is_separator(byte: u8) -> bool {
    byte == b'/' || byte == MAIN_SEPARATOR as u8
}

/// Whether an OS string ends with a path separator.
pub(crate) fn ends_with_separator(s: &OsStr) -> bool {
    s.as_encoded_bytes().last().copied().is_some_and(is_separator)
}

/// A value that already knows its semantic type.
///
/// Joining such a value onto a path uses the reported type directly instead
/// of re-reading its spelling.
pub trait SemanticallyTyped {
    /// The path this value stands for.
    fn as_path(&self) -> &Path;

    /// The semantic type the value carries.
    fn semantic_type(&self) -> SemanticType;
}

/// One segment handed to a path constructor or join.
///
/// Plain text has its type inferred; typed segments carry their own.
///
/// # Examples
///
/// ```
/// use fluidpath::{PathSegment, SemanticType};
///
/// let plain = PathSegment::from("logs/");
/// assert_eq!(plain.semantic_type(), SemanticType::Directory);
///
/// let typed = PathSegment::typed("logs", SemanticType::Directory).unwrap();
/// assert_eq!(typed.semantic_type(), SemanticType::Directory);
///
/// assert!(PathSegment::typed("logs/", SemanticType::File).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A textual segment; its type comes from inference.
    Text(PathBuf),
    /// A segment with a known type.
    Typed {
        /// The segment's path.
        path: PathBuf,
        /// Its declared semantic type.
        semantic_type: SemanticType,
    },
}

impl PathSegment {
    /// Build a typed segment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Ambiguous`] when the declared type is `File` but the
    /// spelling ends in a separator, which would make the segment claim both.
    pub fn typed(path: impl Into<PathBuf>, semantic_type: SemanticType) -> Result<Self> {
        let path = path.into();
        if semantic_type.is_file() && ends_with_separator(path.as_os_str()) {
            return Err(Error::Ambiguous {
                segment: path.to_string_lossy().into_owned(),
                reason: "declared as a file but spelled as a directory".to_string(),
            });
        }
        Ok(Self::Typed {
            path,
            semantic_type,
        })
    }

    /// Capture any semantically typed value as a segment.
    #[must_use]
    pub fn from_typed<T: SemanticallyTyped + ?Sized>(value: &T) -> Self {
        Self::Typed {
            path: value.as_path().to_path_buf(),
            semantic_type: value.semantic_type(),
        }
    }

    /// The segment's path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        match self {
            Self::Text(path) | Self::Typed { path, .. } => path,
        }
    }

    /// The semantic type this segment contributes when it is last.
    #[must_use]
    pub fn semantic_type(&self) -> SemanticType {
        match self {
            Self::Text(path) => SemanticType::infer(path),
            Self::Typed { semantic_type, .. } => *semantic_type,
        }
    }
}

impl From<&str> for PathSegment {
    fn from(value: &str) -> Self {
        Self::Text(PathBuf::from(value))
    }
}

impl From<&String> for PathSegment {
    fn from(value: &String) -> Self {
        Self::Text(PathBuf::from(value))
    }
}

impl From<String> for PathSegment {
    fn from(value: String) -> Self {
        Self::Text(PathBuf::from(value))
    }
}

impl From<&OsStr> for PathSegment {
    fn from(value: &OsStr) -> Self {
        Self::Text(PathBuf::from(value))
    }
}

impl From<OsString> for PathSegment {
    fn from(value: OsString) -> Self {
        Self::Text(PathBuf::from(value))
    }
}

impl From<&Path> for PathSegment {
    fn from(value: &Path) -> Self {
        Self::Text(value.to_path_buf())
    }
}

impl From<&PathBuf> for PathSegment {
    fn from(value: &PathBuf) -> Self {
        Self::Text(value.clone())
    }
}

impl From<PathBuf> for PathSegment {
    fn from(value: PathBuf) -> Self {
        Self::Text(value)
    }
}
