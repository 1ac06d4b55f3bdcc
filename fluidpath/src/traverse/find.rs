//! Filtered traversal.

use std::collections::HashSet;

use glob::Pattern;
use regex::Regex;

use super::{Entries, TraverseOptions};
use crate::error::{Error, Result};
use crate::path::{PhysicalType, SemanticPath};

/// A pattern matched against an entry's name.
#[derive(Debug, Clone)]
pub enum NamePattern {
    /// Matches if the regex is found anywhere in the name.
    Regex(Regex),
    /// Matches if the glob matches the whole name.
    Glob(Pattern),
}

impl NamePattern {
    /// Compile a regex pattern.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if the regex is malformed.
    pub fn regex(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Self::Regex)
            .map_err(|e| Error::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    /// Compile a glob pattern.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if the glob is malformed.
    pub fn glob(pattern: &str) -> Result<Self> {
        Pattern::new(pattern)
            .map(Self::Glob)
            .map_err(|e| Error::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    fn matches(&self, name: &str) -> bool {
        match self {
            Self::Regex(regex) => regex.is_match(name),
            Self::Glob(glob) => glob.matches(name),
        }
    }
}

/// Options for [`SemanticPath::find`].
///
/// Unset predicates accept everything.
///
/// # Examples
///
/// ```no_run
/// use fluidpath::{FindOptions, PhysicalType, SemanticPath};
///
/// let root = SemanticPath::new("root/");
/// let options = FindOptions::new()
///     .with_extension("log")
///     .with_types([PhysicalType::RegularFile]);
/// let logs: Vec<SemanticPath> = root.find(&options)?.collect::<Result<_, _>>()?;
/// # Ok::<(), fluidpath::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    /// Name pattern.
    pub pattern: Option<NamePattern>,
    /// Shallowest depth to yield.
    pub min_depth: Option<usize>,
    /// Allowed physical types (not following symlinks).
    pub types: HashSet<PhysicalType>,
    /// Required extension, with or without the leading dot.
    pub extension: Option<String>,
    /// The underlying walk.
    pub traverse: TraverseOptions,
}

impl FindOptions {
    /// Options that match everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name pattern.
    #[must_use]
    pub fn with_pattern(mut self, pattern: NamePattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Set the minimum depth.
    #[must_use]
    pub fn with_min_depth(mut self, min_depth: usize) -> Self {
        self.min_depth = Some(min_depth);
        self
    }

    /// Set the maximum depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.traverse.max_depth = Some(max_depth);
        self
    }

    /// Set the allowed physical types.
    #[must_use]
    pub fn with_types(mut self, types: impl IntoIterator<Item = PhysicalType>) -> Self {
        self.types = types.into_iter().collect();
        self
    }

    /// Set the required extension.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// Replace the traversal options.
    #[must_use]
    pub fn with_traverse(mut self, traverse: TraverseOptions) -> Self {
        self.traverse = traverse;
        self
    }

    fn accepts(&self, path: &SemanticPath, depth: usize, suffix: Option<&str>) -> bool {
        if let Some(pattern) = &self.pattern {
            let name = path
                .name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if !pattern.matches(&name) {
                return false;
            }
        }
        if self.min_depth.is_some_and(|min| depth < min) {
            return false;
        }
        if !self.types.is_empty() && !self.types.contains(&path.physical_type()) {
            return false;
        }
        if let Some(suffix) = suffix {
            if path.suffix() != suffix {
                return false;
            }
        }
        true
    }
}

/// Iterator returned by [`SemanticPath::find`].
pub struct Find {
    entries: Entries,
    options: FindOptions,
    suffix: Option<String>,
}

impl Iterator for Find {
    type Item = Result<SemanticPath>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.entries.next()? {
                Ok((path, depth)) => {
                    if self.options.accepts(&path, depth, self.suffix.as_deref()) {
                        return Some(Ok(path));
                    }
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

impl SemanticPath {
    /// Traverse and keep only entries matching every predicate in `options`.
    ///
    /// Predicates are checked in order (name, depth, type, extension) and
    /// the first failure skips the entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if an exclusion glob is malformed.
    pub fn find(&self, options: &FindOptions) -> Result<Find> {
        let entries = self.traverse(&options.traverse)?.with_depth();
        let suffix = options
            .extension
            .as_ref()
            .map(|ext| format!(".{}", ext.trim_start_matches('.')));
        Ok(Find {
            entries,
            options: options.clone(),
            suffix,
        })
    }
}
