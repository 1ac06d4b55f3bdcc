#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # fluidpath
//!
//! Filesystem paths that know whether they mean a file or a directory.
//!
//! A [`SemanticPath`] carries a *semantic type* inferred from how it is
//! spelled (`"logs/"` is a directory, `"logs"` a file) and reconciles it with
//! the *physical type* found on disk whenever a query needs it.
//!
//! ## Core Types
//!
//! - [`SemanticPath`]: the path value, with pure path algebra and
//!   filesystem queries
//! - [`SemanticType`] and [`PhysicalType`]: intended vs actual kind
//! - [`TraverseOptions`] and [`FindOptions`]: lazy recursive walks
//! - [`CopyOptions`], [`TempOptions`] and [`WriteMode`]: mutation options
//! - [`Error`] and [`Result`]: error handling types
//!
//! ## Examples
//!
//! ```
//! use fluidpath::{SemanticPath, SemanticType};
//!
//! let dir = SemanticPath::new("project/");
//! assert_eq!(dir.semantic_type(), SemanticType::Directory);
//!
//! let file = &dir / "src" / "main.rs";
//! assert_eq!(file.semantic_type(), SemanticType::File);
//! assert_eq!(file.suffix(), ".rs");
//! assert_eq!(file.parent().to_string(), "project/src/");
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod operations;
pub mod path;
pub mod platform;
pub mod traverse;

// Re-export key types at crate root for convenience
pub use config::{ConfigBuilder, WalkConfig};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use operations::{
    CopyOptions, DiskUsage, Owner, SizeUnit, TempOptions, Temporary, WriteMode,
};
pub use path::{
    PathRelationship, PathSegment, PhysicalType, SemanticPath, SemanticType, SemanticallyTyped,
};
pub use traverse::{Find, FindOptions, NamePattern, Traverse, TraverseOptions};
