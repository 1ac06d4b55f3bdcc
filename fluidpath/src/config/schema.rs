//! Configuration schema.
//!
//! Every field is optional so that partial files can be layered on top of
//! each other; unset fields fall back to the defaults of
//! [`TraverseOptions`].

use serde::{Deserialize, Serialize};

use crate::traverse::TraverseOptions;

/// Traversal defaults loaded from `.fluidpath.yaml`.
///
/// # Examples
///
/// ```
/// use fluidpath::config::WalkConfig;
///
/// let yaml = "show_hidden: false\nmax_depth: 3\nexclude_globs: [target, '*.tmp']\n";
/// let config: WalkConfig = serde_yaml::from_str(yaml).unwrap();
/// let options = config.traverse_options();
/// assert!(!options.show_hidden);
/// assert_eq!(options.max_depth, Some(3));
/// assert_eq!(options.exclude.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WalkConfig {
    /// Descend into symlinked directories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_symlinks: Option<bool>,

    /// Include `.`-prefixed entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_hidden: Option<bool>,

    /// Deepest depth to walk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,

    /// Globs to exclude, relative to the walk root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_globs: Option<Vec<String>>,
}

impl WalkConfig {
    /// Overlay `other` on top of `self`.
    ///
    /// Scalars from `other` win when set. Exclusion globs accumulate.
    pub fn merge(&mut self, other: Self) {
        if other.follow_symlinks.is_some() {
            self.follow_symlinks = other.follow_symlinks;
        }
        if other.show_hidden.is_some() {
            self.show_hidden = other.show_hidden;
        }
        if other.max_depth.is_some() {
            self.max_depth = other.max_depth;
        }
        if let Some(globs) = other.exclude_globs {
            self.exclude_globs
                .get_or_insert_with(Vec::new)
                .extend(globs);
        }
    }

    /// Convert into traversal options, filling gaps with defaults.
    #[must_use]
    pub fn traverse_options(&self) -> TraverseOptions {
        let defaults = TraverseOptions::default();
        TraverseOptions {
            top_down: defaults.top_down,
            follow_symlinks: self.follow_symlinks.unwrap_or(defaults.follow_symlinks),
            show_hidden: self.show_hidden.unwrap_or(defaults.show_hidden),
            max_depth: self.max_depth.or(defaults.max_depth),
            exclude: self.exclude_globs.clone().unwrap_or_default(),
        }
    }
}
