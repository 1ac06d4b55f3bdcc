//! Error types for the fluidpath library.
//!
//! Query operations absorb "not found" into a `false` result; everything else
//! surfaces one of the variants below. I/O failures are wrapped with the path
//! and the name of the operation that produced them.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::path::{PhysicalType, SemanticType};

/// Result type alias for fluidpath operations.
///
/// # Examples
///
/// ```
/// use fluidpath::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(0o644)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the fluidpath library.
#[derive(Debug, Error)]
pub enum Error {
    /// A path (or a required parent) does not exist.
    #[error("{operation}: path not found: {}", path.display())]
    PathNotFound {
        /// The missing path.
        path: PathBuf,
        /// The operation that needed it.
        operation: &'static str,
    },

    /// The physical entity at a path has the wrong type for the request.
    #[error("expected {expected} at {}, found {found}", path.display())]
    WrongType {
        /// The offending path.
        path: PathBuf,
        /// What the caller asked for.
        expected: SemanticType,
        /// What is actually on disk.
        found: PhysicalType,
    },

    /// A creation operation without overwrite semantics hit an existing path.
    #[error("path already exists: {}", path.display())]
    AlreadyExists {
        /// The existing path.
        path: PathBuf,
    },

    /// A path segment whose file/directory meaning is contradictory.
    #[error("ambiguous path segment {segment:?}: {reason}")]
    Ambiguous {
        /// The segment as spelled by the caller.
        segment: String,
        /// Why it is ambiguous.
        reason: String,
    },

    /// The current platform cannot perform the operation.
    #[error("{operation} is not supported on this platform")]
    PlatformUnsupported {
        /// The unsupported operation.
        operation: &'static str,
    },

    /// A user name could not be resolved.
    #[error("unknown user: {name}")]
    UnknownUser {
        /// The user name that failed to resolve.
        name: String,
    },

    /// A group name could not be resolved.
    #[error("unknown group: {name}")]
    UnknownGroup {
        /// The group name that failed to resolve.
        name: String,
    },

    /// The OS refused access.
    #[error("permission denied: {}", path.display())]
    PermissionDenied {
        /// The path access was refused for.
        path: PathBuf,
    },

    /// Any other I/O failure, with context.
    #[error("{operation} failed for {}: {source}", path.display())]
    Io {
        /// The operation being performed.
        operation: &'static str,
        /// The path involved.
        path: PathBuf,
        /// The OS error.
        #[source]
        source: io::Error,
    },

    /// An invalid path or path transformation.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The path as given.
        path: PathBuf,
        /// What is wrong with it.
        reason: String,
    },

    /// A regex or glob pattern failed to compile.
    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern {
        /// The pattern text.
        pattern: String,
        /// The compiler's complaint.
        reason: String,
    },

    /// A string that is not a `file:` URI.
    #[error("invalid file URI: {uri}")]
    InvalidUri {
        /// The rejected URI.
        uri: String,
    },

    /// A configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// A configuration value failed validation.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The setting, or the variable it came from.
        field: String,
        /// What was wrong with the value.
        message: String,
    },
}

impl Error {
    /// Wrap an I/O error with the path and operation that produced it.
    ///
    /// `NotFound`, `PermissionDenied` and `AlreadyExists` map onto their
    /// dedicated variants.
    ///
    /// # Examples
    ///
    /// ```
    /// use fluidpath::Error;
    /// use std::io;
    /// use std::path::Path;
    ///
    /// let err = Error::from_io(
    ///     "stat",
    ///     Path::new("/missing"),
    ///     io::Error::from(io::ErrorKind::NotFound),
    /// );
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn from_io(operation: &'static str, path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::PathNotFound {
                path: path.to_path_buf(),
                operation,
            },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.to_path_buf(),
            },
            io::ErrorKind::AlreadyExists => Self::AlreadyExists {
                path: path.to_path_buf(),
            },
            _ => Self::Io {
                operation,
                path: path.to_path_buf(),
                source: err,
            },
        }
    }

    /// True for [`Error::PathNotFound`].
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PathNotFound { .. })
    }

    /// True for [`Error::PermissionDenied`].
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }

    /// True for [`Error::PlatformUnsupported`].
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::PlatformUnsupported { .. })
    }
}

/// Whether an I/O error means "nothing is there".
///
/// `NotADirectory` counts: stat through a regular file used as an
/// intermediate component reports it on POSIX.
pub(crate) fn is_absent(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::NotFound {
        return true;
    }
    #[cfg(unix)]
    {
        if err.raw_os_error() == Some(nix::errno::Errno::ENOTDIR as i32) {
            return true;
        }
    }
    false
}
