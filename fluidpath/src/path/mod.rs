//! Semantic paths.
//!
//! This module provides the [`SemanticPath`] type and the pieces it is built
//! from.
//!
//! # Key Concepts
//!
//! ## Semantic type
//!
//! Whether a path is *meant* as a file or a directory, as spelled: a trailing
//! separator, `.` or `..` mean directory. Decided once at construction and
//! carried through transformations.
//!
//! ## Physical type
//!
//! What is actually on disk right now, from a fresh `stat`. Never cached.
//!
//! ## Reconciliation
//!
//! Queries such as [`SemanticPath::exists`], [`SemanticPath::is_directory`]
//! and [`SemanticPath::resolve`] combine the two. When nothing exists at a
//! location, the semantic type is the fallback answer.
//!
//! # Examples
//!
//! ```
//! use fluidpath::path::{PhysicalType, SemanticPath, SemanticType};
//!
//! let p = SemanticPath::new("/definitely/not/here/");
//! assert_eq!(p.semantic_type(), SemanticType::Directory);
//! assert_eq!(p.physical_type(), PhysicalType::DoesNotExist);
//! assert!(p.is_directory(true, false));
//! assert!(!p.is_directory(true, true));
//! ```

pub mod normalize;
mod physical;
mod reconcile;
pub mod relationship;
mod semantic;
mod semantic_path;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

pub(crate) use reconcile::probe;

pub use physical::PhysicalType;
pub use relationship::PathRelationship;
pub use semantic::{PathSegment, SemanticType, SemanticallyTyped};
pub use semantic_path::SemanticPath;
