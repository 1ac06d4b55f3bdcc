//! Lexical path normalization.
//!
//! None of these functions touch the filesystem except to read the current
//! directory or the home directory:
//! - [`clean`] gives the canonical spelling used inside a `SemanticPath`
//! - [`collapse`] resolves `.` and `..` components without following links
//! - [`expand_tilde`] expands `~` and `~/path`
//! - [`absolute`] anchors a relative path at the working directory

use std::env;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Canonical spelling of a path.
///
/// Repeated and trailing separators are dropped, as are `.` components
/// (unless the path is nothing but `.`). An empty path becomes `.`.
///
/// # Examples
///
/// ```
/// use fluidpath::path::normalize::clean;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(clean(Path::new("a//b/./c/")), PathBuf::from("a/b/c"));
/// assert_eq!(clean(Path::new("./foo")), PathBuf::from("foo"));
/// assert_eq!(clean(Path::new("")), PathBuf::from("."));
/// ```
#[must_use]
pub fn clean(path: &Path) -> PathBuf {
    let cleaned: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if cleaned.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        cleaned
    }
}

/// Resolve `.` and `..` components lexically.
///
/// Symlinks are not consulted, so `a/link/..` collapses to `a` even when
/// `link` points elsewhere. `..` at the root stays at the root; leading `..`
/// of a relative path are kept.
///
/// # Examples
///
/// ```
/// use fluidpath::path::normalize::collapse;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(collapse(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
/// assert_eq!(collapse(Path::new("../x/../y")), PathBuf::from("../y"));
/// assert_eq!(collapse(Path::new("/..")), PathBuf::from("/"));
/// ```
#[must_use]
pub fn collapse(path: &Path) -> PathBuf {
    let mut anchor = PathBuf::new();
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => anchor.push(component),
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                _ if anchor.has_root() => {}
                _ => parts.push(component),
            },
            Component::Normal(_) => parts.push(component),
        }
    }

    let mut result = anchor;
    result.extend(parts);
    if result.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        result
    }
}

/// Expand tilde (~) to the home directory.
///
/// Handles `~` and `~/path`; `~user` is rejected.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined or the path
/// uses `~user` syntax.
///
/// # Examples
///
/// ```
/// use fluidpath::path::normalize::expand_tilde;
/// use std::path::Path;
///
/// let expanded = expand_tilde(Path::new("~/project")).unwrap();
/// assert!(expanded.ends_with("project"));
///
/// let untouched = expand_tilde(Path::new("relative")).unwrap();
/// assert_eq!(untouched, Path::new("relative"));
/// ```
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    let bytes = path.as_os_str().as_encoded_bytes();
    if bytes.first() != Some(&b'~') {
        return Ok(path.to_path_buf());
    }

    let mut components = path.components();
    let first = components.next();
    if first != Some(Component::Normal("~".as_ref())) {
        return Err(Error::InvalidPath {
            path: path.to_path_buf(),
            reason: "~user syntax is not supported; use ~ or ~/path".to_string(),
        });
    }

    let home = home::home_dir().ok_or_else(|| Error::InvalidPath {
        path: path.to_path_buf(),
        reason: "cannot determine home directory".to_string(),
    })?;
    let rest = components.as_path();
    if rest.as_os_str().is_empty() {
        Ok(home)
    } else {
        Ok(home.join(rest))
    }
}

/// Anchor a path at the current working directory.
///
/// Absolute paths are returned unchanged; nothing is collapsed.
///
/// # Errors
///
/// Returns an error if the current directory cannot be read.
pub fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = env::current_dir().map_err(|e| Error::from_io("current_dir", path, e))?;
    if path == Path::new(".") {
        Ok(cwd)
    } else {
        Ok(cwd.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_strips_trailing_separator() {
        assert_eq!(clean(Path::new("a/b/")), PathBuf::from("a/b"));
    }

    #[test]
    fn test_clean_keeps_parent_components() {
        assert_eq!(clean(Path::new("a/../b")), PathBuf::from("a/../b"));
    }

    #[test]
    fn test_clean_lone_dot() {
        assert_eq!(clean(Path::new(".")), PathBuf::from("."));
        assert_eq!(clean(Path::new("./")), PathBuf::from("."));
    }

    #[test]
    #[cfg(unix)]
    fn test_clean_root() {
        assert_eq!(clean(Path::new("/")), PathBuf::from("/"));
        assert_eq!(clean(Path::new("//a")), PathBuf::from("/a"));
    }

    #[test]
    fn test_collapse_simple() {
        assert_eq!(collapse(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
    }

    #[test]
    fn test_collapse_multiple_parent() {
        assert_eq!(collapse(Path::new("/a/b/../../c")), PathBuf::from("/c"));
    }

    #[test]
    fn test_collapse_relative_to_nothing() {
        assert_eq!(collapse(Path::new("a/..")), PathBuf::from("."));
    }

    #[test]
    fn test_collapse_clamps_at_root() {
        assert_eq!(collapse(Path::new("/a/../..")), PathBuf::from("/"));
    }

    #[test]
    fn test_expand_tilde_home() {
        let home = home::home_dir().unwrap();
        assert_eq!(expand_tilde(Path::new("~")).unwrap(), home);
    }

    #[test]
    fn test_expand_tilde_with_path() {
        let home = home::home_dir().unwrap();
        assert_eq!(
            expand_tilde(Path::new("~/test")).unwrap(),
            home.join("test")
        );
    }

    #[test]
    fn test_expand_tilde_user_syntax_not_supported() {
        assert!(expand_tilde(Path::new("~user/path")).is_err());
    }

    #[test]
    fn test_absolute_relative() {
        let cwd = env::current_dir().unwrap();
        let abs = absolute(Path::new("x/y")).unwrap();
        assert_eq!(abs, cwd.join("x/y"));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn path_with_dots_strategy() -> impl Strategy<Value = String> {
            prop::collection::vec(
                prop_oneof![
                    Just(".".to_string()),
                    Just("..".to_string()),
                    "[a-zA-Z0-9_-]{1,10}".prop_map(|s| s),
                ],
                1..=8,
            )
            .prop_map(|parts| format!("/{}", parts.join("/")))
        }

        proptest! {
            /// Collapsing twice changes nothing.
            #[test]
            fn collapse_idempotent(s in path_with_dots_strategy()) {
                let once = collapse(Path::new(&s));
                prop_assert_eq!(collapse(&once), once.clone());
            }

            /// Collapsed absolute paths hold no `.` or `..`.
            #[test]
            fn collapse_removes_dots(s in path_with_dots_strategy()) {
                let collapsed = collapse(Path::new(&s));
                for component in collapsed.components() {
                    prop_assert_ne!(component, Component::CurDir);
                    prop_assert_ne!(component, Component::ParentDir);
                }
            }

            /// Cleaning is idempotent.
            #[test]
            fn clean_idempotent(s in "[a-z./]{0,20}") {
                let once = clean(Path::new(&s));
                prop_assert_eq!(clean(&once), once.clone());
            }
        }
    }
}
