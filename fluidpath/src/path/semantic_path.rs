//! The `SemanticPath` entity.
//!
//! A `SemanticPath` pairs a lexical path with a [`SemanticType`]. The type is
//! inferred once, at construction, from the spelling of the last segment and
//! then carried through every transformation. Transformations always return a
//! new value; nothing is mutated in place.
//!
//! This file holds construction, joining and the pure (filesystem-free)
//! accessors. Reconciliation with the filesystem lives in
//! [`reconcile`](super::reconcile); mutating operations live in
//! [`operations`](crate::operations).

use std::borrow::Cow;
use std::cmp::Ordering;
use std::convert::Infallible;
use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Div;
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR_STR};
use std::str::FromStr;

use glob::{MatchOptions, Pattern};
use regex::RegexBuilder;
use url::Url;

use crate::error::{Error, Result};
use crate::path::normalize;
use crate::path::relationship::PathRelationship;
use crate::path::semantic::{
    ends_with_separator, is_separator, PathSegment, SemanticType, SemanticallyTyped,
};
use crate::platform;

/// A filesystem path that knows whether it means a file or a directory.
///
/// Equality, ordering and hashing use the rendered string, which carries a
/// trailing separator for directories. `a/b` (a file) and `a/b/` (a
/// directory) are therefore different values.
///
/// # Examples
///
/// ```
/// use fluidpath::{SemanticPath, SemanticType};
///
/// let dir = SemanticPath::new("project/");
/// assert_eq!(dir.semantic_type(), SemanticType::Directory);
///
/// let file = &dir / "src" / "main.rs";
/// assert_eq!(file.semantic_type(), SemanticType::File);
/// assert_eq!(file.to_string(), "project/src/main.rs");
/// assert_eq!(file.parent().to_string(), "project/src/");
/// ```
#[derive(Debug, Clone)]
pub struct SemanticPath {
    path: PathBuf,
    semantic_type: SemanticType,
}

impl SemanticPath {
    /// Create a path from a single segment, inferring its semantic type.
    #[must_use]
    pub fn new(segment: impl Into<PathSegment>) -> Self {
        Self::from_segments([segment])
    }

    /// Create a path by joining segments.
    ///
    /// The semantic type comes from the last segment. No segments at all
    /// means the current directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use fluidpath::{SemanticPath, SemanticType};
    ///
    /// let p = SemanticPath::from_segments(["var", "log", "syslog"]);
    /// assert_eq!(p.to_string(), "var/log/syslog");
    ///
    /// let cwd = SemanticPath::from_segments(Vec::<&str>::new());
    /// assert_eq!(cwd.semantic_type(), SemanticType::Directory);
    /// ```
    #[must_use]
    pub fn from_segments<I>(segments: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<PathSegment>,
    {
        let mut path = PathBuf::new();
        let mut semantic_type = SemanticType::Directory;
        for segment in segments {
            let segment = segment.into();
            semantic_type = segment.semantic_type();
            path.push(segment.as_path());
        }
        Self::from_parts(path, semantic_type)
    }

    /// Build a path whose semantic type is already known.
    ///
    /// Skips inference. Paths that consist only of an anchor (`/`, `C:\`) are
    /// always directories.
    pub(crate) fn from_parts(path: impl AsRef<Path>, semantic_type: SemanticType) -> Self {
        let path = normalize::clean(path.as_ref());
        let semantic_type = if ends_with_separator(path.as_os_str()) {
            SemanticType::Directory
        } else {
            semantic_type
        };
        Self {
            path,
            semantic_type,
        }
    }

    /// Extend this path with more segments.
    ///
    /// The result's semantic type is inferred from the last new segment.
    /// This path's own type is ignored: joining through a path tagged as a
    /// file is allowed. With no segments the result equals `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// use fluidpath::{SemanticPath, SemanticType};
    ///
    /// let base = SemanticPath::new("notes.txt");
    /// let joined = base.join(["attachments/"]);
    /// assert_eq!(joined.to_string(), "notes.txt/attachments/");
    /// assert_eq!(joined.semantic_type(), SemanticType::Directory);
    /// ```
    #[must_use]
    pub fn join<I>(&self, segments: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<PathSegment>,
    {
        let mut path = self.path.clone();
        let mut semantic_type = self.semantic_type;
        for segment in segments {
            let segment = segment.into();
            semantic_type = segment.semantic_type();
            path.push(segment.as_path());
        }
        Self::from_parts(path, semantic_type)
    }

    /// The same location with an explicitly chosen semantic type.
    #[must_use]
    pub fn with_semantic_type(&self, semantic_type: SemanticType) -> Self {
        Self::from_parts(&self.path, semantic_type)
    }

    /// The underlying lexical path, without the directory marker.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// The semantic type.
    #[must_use]
    pub fn semantic_type(&self) -> SemanticType {
        self.semantic_type
    }

    /// Copy out the underlying `PathBuf`.
    #[must_use]
    pub fn to_path_buf(&self) -> PathBuf {
        self.path.clone()
    }

    /// Convert into the underlying `PathBuf`.
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.path
    }

    /// The rendered form: the path plus a trailing separator for directories.
    #[must_use]
    pub fn render(&self) -> OsString {
        let mut rendered = self.path.as_os_str().to_os_string();
        if self.semantic_type.is_directory() && !ends_with_separator(&rendered) {
            rendered.push(MAIN_SEPARATOR_STR);
        }
        rendered
    }

    // ------------------------------------------------------------------
    // Lexical components
    // ------------------------------------------------------------------

    /// The path's components, anchor first.
    #[must_use]
    pub fn parts(&self) -> Vec<&OsStr> {
        if self.path == Path::new(".") {
            return Vec::new();
        }
        self.path.components().map(|c| c.as_os_str()).collect()
    }

    /// Alias of [`parts`](Self::parts).
    #[must_use]
    pub fn components(&self) -> Vec<&OsStr> {
        self.parts()
    }

    /// The drive or UNC prefix, empty where the platform has none.
    #[must_use]
    pub fn drive(&self) -> &OsStr {
        match self.path.components().next() {
            Some(Component::Prefix(prefix)) => prefix.as_os_str(),
            _ => OsStr::new(""),
        }
    }

    /// The root separator, empty for relative paths.
    #[must_use]
    pub fn root(&self) -> &'static str {
        if self.path.has_root() {
            MAIN_SEPARATOR_STR
        } else {
            ""
        }
    }

    /// Drive and root together.
    #[must_use]
    pub fn anchor(&self) -> OsString {
        let mut anchor = self.drive().to_os_string();
        anchor.push(self.root());
        anchor
    }

    /// The final component, if there is one.
    ///
    /// `..` counts as a name; `.` and bare anchors have none.
    #[must_use]
    pub fn name(&self) -> Option<&OsStr> {
        last_name(&self.path)
    }

    /// The final component's extension, with the trailing-dot rules.
    ///
    /// A name made only of dots has no suffix. A name ending in one or more
    /// dots has the literal suffix `"."`.
    ///
    /// # Examples
    ///
    /// ```
    /// use fluidpath::SemanticPath;
    ///
    /// assert_eq!(SemanticPath::new("a/b.tar.gz").suffix(), ".gz");
    /// assert_eq!(SemanticPath::new("a/b.txt.").suffix(), ".");
    /// assert_eq!(SemanticPath::new("...").suffix(), "");
    /// ```
    #[must_use]
    pub fn suffix(&self) -> String {
        let Some(name) = self.name_lossy() else {
            return String::new();
        };
        let (_, tail) = split_tail(&name);
        if tail.bytes().all(|b| b == b'.') && !tail.is_empty() {
            ".".to_string()
        } else {
            tail.to_string()
        }
    }

    /// Every extension of the final component, in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use fluidpath::SemanticPath;
    ///
    /// assert_eq!(SemanticPath::new("b.tar.gz").suffixes(), vec![".tar", ".gz"]);
    /// assert_eq!(SemanticPath::new("foo.txt.....").suffixes(), vec![".txt", "."]);
    /// assert!(SemanticPath::new("...").suffixes().is_empty());
    /// ```
    #[must_use]
    pub fn suffixes(&self) -> Vec<String> {
        let Some(name) = self.name_lossy() else {
            return Vec::new();
        };
        if name.bytes().all(|b| b == b'.') {
            return Vec::new();
        }
        let trimmed = name.trim_end_matches('.');
        let mut suffixes: Vec<String> = trimmed
            .trim_start_matches('.')
            .split('.')
            .skip(1)
            .map(|s| format!(".{s}"))
            .collect();
        if trimmed.len() < name.len() {
            suffixes.push(".".to_string());
        }
        suffixes
    }

    /// The final component without its suffix.
    #[must_use]
    pub fn stem(&self) -> String {
        self.name_lossy()
            .map(|name| split_tail(&name).0.to_string())
            .unwrap_or_default()
    }

    fn name_lossy(&self) -> Option<Cow<'_, str>> {
        self.name().map(OsStr::to_string_lossy)
    }

    // ------------------------------------------------------------------
    // Lexical transformations
    // ------------------------------------------------------------------

    /// The containing directory. Always semantically a directory.
    ///
    /// `.` and bare anchors are their own parents.
    #[must_use]
    pub fn parent(&self) -> Self {
        Self::from_parts(lexical_parent(&self.path), SemanticType::Directory)
    }

    /// Every ancestor, nearest first.
    ///
    /// # Examples
    ///
    /// ```
    /// use fluidpath::SemanticPath;
    ///
    /// let p = SemanticPath::new("foo/bar/baz");
    /// let parents: Vec<String> = p.parents().iter().map(ToString::to_string).collect();
    /// assert_eq!(parents, vec!["foo/bar/", "foo/", "./"]);
    /// ```
    #[must_use]
    pub fn parents(&self) -> Vec<Self> {
        let mut parents = Vec::new();
        let mut current = self.path.clone();
        loop {
            let parent = lexical_parent(&current);
            if parent == current {
                break;
            }
            parents.push(Self::from_parts(&parent, SemanticType::Directory));
            current = parent;
        }
        parents
    }

    /// Replace the final component.
    ///
    /// The semantic type is kept unless the new name itself spells a
    /// directory (`..`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if this path has no name or the new name
    /// is empty, `.`, or contains a separator.
    pub fn with_name(&self, name: impl AsRef<OsStr>) -> Result<Self> {
        let name = name.as_ref();
        if self.name().is_none() {
            return Err(self.invalid("path has an empty name"));
        }
        let bytes = name.as_encoded_bytes();
        if bytes.is_empty() || bytes == b"." || bytes.iter().copied().any(is_separator) {
            return Err(self.invalid(format!("invalid name {:?}", name.to_string_lossy())));
        }

        let mut components = self.path.components();
        components.next_back();
        let path = components.as_path().join(name);
        let semantic_type = match SemanticType::infer(name) {
            SemanticType::Directory => SemanticType::Directory,
            SemanticType::File => self.semantic_type,
        };
        Ok(Self::from_parts(path, semantic_type))
    }

    /// Replace the final component's stem, keeping its suffix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if this path has no name, or the new stem
    /// is empty while a suffix remains.
    pub fn with_stem(&self, stem: &str) -> Result<Self> {
        let Some(name) = self.name_lossy() else {
            return Err(self.invalid("path has an empty name"));
        };
        let (_, tail) = split_tail(&name);
        if stem.is_empty() && !tail.is_empty() {
            return Err(self.invalid("path has a non-empty suffix"));
        }
        self.with_name(format!("{stem}{tail}"))
    }

    /// Replace the final component's suffix.
    ///
    /// An empty suffix removes it; `"."` sets a literal trailing dot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if this path has no name or the suffix
    /// does not start with a dot or contains a separator.
    ///
    /// # Examples
    ///
    /// ```
    /// use fluidpath::SemanticPath;
    ///
    /// let p = SemanticPath::new("a/b.txt");
    /// assert_eq!(p.with_suffix(".md").unwrap().to_string(), "a/b.md");
    /// assert_eq!(p.with_suffix("").unwrap().to_string(), "a/b");
    /// assert_eq!(p.with_suffix(".").unwrap().to_string(), "a/b.");
    /// ```
    pub fn with_suffix(&self, suffix: &str) -> Result<Self> {
        let Some(name) = self.name_lossy() else {
            return Err(self.invalid("path has an empty name"));
        };
        let valid = suffix.is_empty()
            || suffix == "."
            || (suffix.starts_with('.') && !suffix.bytes().any(is_separator));
        if !valid {
            return Err(self.invalid(format!("invalid suffix {suffix:?}")));
        }
        let (stem, _) = split_tail(&name);
        self.with_name(format!("{stem}{suffix}"))
    }

    /// Whether the path is anchored.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.path.is_absolute()
    }

    /// Whether the name is reserved by the platform (Windows device names).
    #[must_use]
    pub fn is_reserved(&self) -> bool {
        self.name()
            .is_some_and(|name| platform::native().is_reserved_name(name))
    }

    // ------------------------------------------------------------------
    // Matching
    // ------------------------------------------------------------------

    /// Match a regular expression against the whole rendered path, or only
    /// the name when `full` is false. The pattern must match entirely.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if the regex does not compile.
    pub fn match_regex(&self, pattern: &str, full: bool, case_sensitive: bool) -> Result<bool> {
        let regex = RegexBuilder::new(&format!("^(?:{pattern})$"))
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|e| Error::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;
        Ok(regex.is_match(&self.match_subject(full)))
    }

    /// Glob counterpart of [`match_regex`](Self::match_regex).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if the glob does not compile.
    pub fn glob_match(&self, pattern: &str, full: bool, case_sensitive: bool) -> Result<bool> {
        let glob = Pattern::new(pattern).map_err(|e| Error::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        let options = MatchOptions {
            case_sensitive,
            require_literal_separator: false,
            require_literal_leading_dot: false,
        };
        Ok(glob.matches_with(&self.match_subject(full), options))
    }

    fn match_subject(&self, full: bool) -> String {
        if full {
            self.to_string()
        } else {
            self.name_lossy().map(Cow::into_owned).unwrap_or_default()
        }
    }

    // ------------------------------------------------------------------
    // Relationships
    // ------------------------------------------------------------------

    /// Whether this path lies at or below `other`.
    ///
    /// With `strict`, both sides are resolved against the filesystem first;
    /// a side that does not exist is compared in its collapsed absolute form.
    ///
    /// # Errors
    ///
    /// Only in strict mode, when resolution fails for a reason other than a
    /// missing path.
    pub fn is_relative_to(&self, other: &Self, strict: bool) -> Result<bool> {
        let base = other.comparison_form(strict)?;
        let target = self.comparison_form(strict)?;
        Ok(PathRelationship::is_within(&target, &base))
    }

    /// This path expressed relative to `other`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] when this path is not below `other`, or
    /// a resolution error in strict mode.
    ///
    /// # Examples
    ///
    /// ```
    /// use fluidpath::SemanticPath;
    ///
    /// let file = SemanticPath::new("/srv/app/b/file.txt");
    /// let base = SemanticPath::new("/srv/app/");
    /// assert_eq!(file.relative_to(&base, false).unwrap().to_string(), "b/file.txt");
    /// ```
    pub fn relative_to(&self, other: &Self, strict: bool) -> Result<Self> {
        let base = other.comparison_form(strict)?;
        let target = self.comparison_form(strict)?;
        let relative = target.strip_prefix(&base).map_err(|_| {
            self.invalid(format!("is not in the subpath of {other}"))
        })?;
        if relative.as_os_str().is_empty() {
            Ok(Self::from_parts(".", SemanticType::Directory))
        } else {
            Ok(Self::from_parts(relative, self.semantic_type))
        }
    }

    /// Whether `other` lies at or below this path (lexically).
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        PathRelationship::contains(&self.path, &other.path)
    }

    /// How many segments `other` sits below this path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if `other` is not contained in this path.
    pub fn relative_depth(&self, other: &Self) -> Result<usize> {
        PathRelationship::depth_below(&self.path, &other.path).ok_or_else(|| {
            other.invalid(format!("is not contained within {self}"))
        })
    }

    // ------------------------------------------------------------------
    // Well-known locations and URIs
    // ------------------------------------------------------------------

    /// The current user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn home() -> Result<Self> {
        let home = home::home_dir().ok_or_else(|| Error::InvalidPath {
            path: PathBuf::from("~"),
            reason: "cannot determine home directory".to_string(),
        })?;
        Ok(Self::from_parts(home, SemanticType::Directory))
    }

    /// The process working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be read.
    pub fn cwd() -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| Error::from_io("current_dir", Path::new("."), e))?;
        Ok(Self::from_parts(cwd, SemanticType::Directory))
    }

    /// Expand a leading `~` to the home directory.
    ///
    /// # Errors
    ///
    /// Returns an error for `~user` syntax or an unknown home directory.
    pub fn expand_user(&self) -> Result<Self> {
        let expanded = normalize::expand_tilde(&self.path)?;
        Ok(Self::from_parts(expanded, self.semantic_type))
    }

    /// Parse a `file:` URI. A trailing slash makes a directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUri`] for anything that is not a local file URI.
    pub fn from_uri(uri: &str) -> Result<Self> {
        let invalid = || Error::InvalidUri {
            uri: uri.to_string(),
        };
        let url = Url::parse(uri).map_err(|_| invalid())?;
        if url.scheme() != "file" {
            return Err(invalid());
        }
        let path = url.to_file_path().map_err(|()| invalid())?;
        Ok(Self::from_parts(path, SemanticType::infer(url.path())))
    }

    /// Render as a `file:` URI.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] for relative paths.
    pub fn as_uri(&self) -> Result<String> {
        if !self.is_absolute() {
            return Err(self.invalid("relative path can't be expressed as a file URI"));
        }
        let url = match self.semantic_type {
            SemanticType::Directory => Url::from_directory_path(&self.path),
            SemanticType::File => Url::from_file_path(&self.path),
        }
        .map_err(|()| self.invalid("path can't be expressed as a file URI"))?;
        Ok(url.to_string())
    }

    pub(crate) fn invalid(&self, reason: impl Into<String>) -> Error {
        Error::InvalidPath {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }
}

/// The last nameable component.
fn last_name(path: &Path) -> Option<&OsStr> {
    match path.components().next_back()? {
        Component::Normal(name) => Some(name),
        Component::ParentDir => Some(OsStr::new("..")),
        Component::CurDir | Component::RootDir | Component::Prefix(_) => None,
    }
}

/// Drop the last nameable component; `.` for single-segment relative paths.
fn lexical_parent(path: &Path) -> PathBuf {
    let mut components = path.components();
    match components.next_back() {
        Some(Component::Normal(_) | Component::ParentDir) => {
            let rest = components.as_path();
            if rest.as_os_str().is_empty() {
                PathBuf::from(".")
            } else {
                rest.to_path_buf()
            }
        }
        _ => path.to_path_buf(),
    }
}

/// Split a name into stem and tail (the suffix, or the trailing-dot run).
fn split_tail(name: &str) -> (&str, &str) {
    if name.bytes().all(|b| b == b'.') {
        return (name, "");
    }
    let trimmed = name.trim_end_matches('.');
    if trimmed.len() < name.len() {
        return (trimmed, &name[trimmed.len()..]);
    }
    match name.rfind('.') {
        Some(i) if i > 0 => (&name[..i], &name[i..]),
        _ => (name, ""),
    }
}

impl SemanticallyTyped for SemanticPath {
    fn as_path(&self) -> &Path {
        &self.path
    }

    fn semantic_type(&self) -> SemanticType {
        self.semantic_type
    }
}

impl From<&SemanticPath> for PathSegment {
    fn from(value: &SemanticPath) -> Self {
        PathSegment::from_typed(value)
    }
}

impl From<SemanticPath> for PathSegment {
    fn from(value: SemanticPath) -> Self {
        PathSegment::Typed {
            path: value.path,
            semantic_type: value.semantic_type,
        }
    }
}

impl<S: Into<PathSegment>> Div<S> for &SemanticPath {
    type Output = SemanticPath;

    fn div(self, rhs: S) -> SemanticPath {
        self.join([rhs])
    }
}

impl<S: Into<PathSegment>> Div<S> for SemanticPath {
    type Output = SemanticPath;

    fn div(self, rhs: S) -> SemanticPath {
        self.join([rhs])
    }
}

impl fmt::Display for SemanticPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render().to_string_lossy())
    }
}

impl PartialEq for SemanticPath {
    fn eq(&self, other: &Self) -> bool {
        self.render() == other.render()
    }
}

impl Eq for SemanticPath {}

impl Hash for SemanticPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.render().hash(state);
    }
}

impl PartialOrd for SemanticPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SemanticPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.render().cmp(&other.render())
    }
}

impl AsRef<Path> for SemanticPath {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl FromStr for SemanticPath {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for SemanticPath {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SemanticPath {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&Path> for SemanticPath {
    fn from(value: &Path) -> Self {
        Self::new(value)
    }
}

impl From<PathBuf> for SemanticPath {
    fn from(value: PathBuf) -> Self {
        Self::new(value)
    }
}
