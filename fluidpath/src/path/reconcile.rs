//! Reconciling semantic types with the filesystem.
//!
//! Every query here performs a fresh `stat`. Nothing is cached, so two
//! successive calls may observe different states if the filesystem changes in
//! between.
//!
//! The `try_*` methods return `Result` and treat a missing path as a normal
//! outcome; any other `stat` failure is an error. The plain boolean methods
//! build on them and fold every error into `false`.

use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{is_absent, Error, Result};
use crate::path::normalize;
use crate::path::physical::PhysicalType;
use crate::path::relationship::comparable;
use crate::path::semantic::SemanticType;
use crate::path::semantic_path::SemanticPath;
use crate::platform::{self, PlatformOps};

/// Stat `path` and classify it. A missing path (or a missing intermediate
/// directory) is `DoesNotExist`, not an error.
pub(crate) fn probe(path: &Path, follow_symlinks: bool) -> Result<PhysicalType> {
    let metadata = if follow_symlinks {
        fs::metadata(path)
    } else {
        fs::symlink_metadata(path)
    };
    match metadata {
        Ok(metadata) => Ok(PhysicalType::from_metadata(&metadata)),
        Err(e) if is_absent(&e) => Ok(PhysicalType::DoesNotExist),
        Err(e) => Err(Error::from_io("stat", path, e)),
    }
}

/// Semantic type implied by what is physically at a location.
fn derive_type(found: PhysicalType, fallback: SemanticType) -> SemanticType {
    match found {
        PhysicalType::Directory => SemanticType::Directory,
        PhysicalType::DoesNotExist => fallback,
        _ => SemanticType::File,
    }
}

impl SemanticPath {
    /// Whether something exists at this path.
    ///
    /// With `strict`, the physical type must also agree with the semantic
    /// type: directories need a directory, files accept anything except a
    /// directory or an unclassifiable entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the `stat` call fails for a reason other than the
    /// path being absent.
    pub fn try_exists(&self, follow_symlinks: bool, strict: bool) -> Result<bool> {
        let found = probe(self.as_path(), follow_symlinks)?;
        if !found.exists() {
            return Ok(false);
        }
        if !strict {
            return Ok(true);
        }
        Ok(match self.semantic_type() {
            SemanticType::Directory => found == PhysicalType::Directory,
            SemanticType::File => found.counts_as_file(),
        })
    }

    /// Boolean form of [`try_exists`](Self::try_exists). Errors count as
    /// "does not exist".
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fluidpath::SemanticPath;
    ///
    /// // A regular file addressed with a trailing separator.
    /// let p = SemanticPath::new("Cargo.toml/");
    /// assert!(p.exists(true, false));
    /// assert!(!p.exists(true, true));
    /// ```
    #[must_use]
    pub fn exists(&self, follow_symlinks: bool, strict: bool) -> bool {
        self.try_exists(follow_symlinks, strict).unwrap_or_else(|e| {
            debug!("exists({self}) absorbed error: {e}");
            false
        })
    }

    /// The physical type, without following symlinks.
    ///
    /// # Errors
    ///
    /// Returns an error if the `stat` call fails for a reason other than the
    /// path being absent.
    pub fn try_physical_type(&self) -> Result<PhysicalType> {
        probe(self.as_path(), false)
    }

    /// The physical type, without following symlinks. A symlink reports
    /// `Symlink`, never its target's type.
    ///
    /// A path that cannot be examined (too long, unreadable parent, symlink
    /// loop) reports `Unknown`; use
    /// [`try_physical_type`](Self::try_physical_type) to see the error.
    #[must_use]
    pub fn physical_type(&self) -> PhysicalType {
        self.try_physical_type().unwrap_or_else(|e| {
            debug!("physical_type({self}) absorbed error: {e}");
            PhysicalType::Unknown
        })
    }

    /// Whether this path is a directory.
    ///
    /// When nothing exists and `must_exist` is false, the answer falls back
    /// to the semantic type.
    ///
    /// # Errors
    ///
    /// Returns an error if the `stat` call fails for a reason other than the
    /// path being absent.
    pub fn try_is_directory(&self, follow_symlinks: bool, must_exist: bool) -> Result<bool> {
        Ok(match probe(self.as_path(), follow_symlinks)? {
            PhysicalType::Directory => true,
            PhysicalType::DoesNotExist => {
                !must_exist && self.semantic_type() == SemanticType::Directory
            }
            _ => false,
        })
    }

    /// Whether this path is a file. Symlinks, pipes, sockets and devices all
    /// count as files.
    ///
    /// When nothing exists and `must_exist` is false, the answer falls back
    /// to the semantic type.
    ///
    /// # Errors
    ///
    /// Returns an error if the `stat` call fails for a reason other than the
    /// path being absent.
    pub fn try_is_file(&self, follow_symlinks: bool, must_exist: bool) -> Result<bool> {
        Ok(match probe(self.as_path(), follow_symlinks)? {
            PhysicalType::DoesNotExist => {
                !must_exist && self.semantic_type() == SemanticType::File
            }
            found => found.counts_as_file(),
        })
    }

    /// Boolean form of [`try_is_directory`](Self::try_is_directory). An
    /// error is `false`, with no semantic fallback.
    #[must_use]
    pub fn is_directory(&self, follow_symlinks: bool, must_exist: bool) -> bool {
        self.try_is_directory(follow_symlinks, must_exist)
            .unwrap_or_else(|e| {
                debug!("is_directory({self}) absorbed error: {e}");
                false
            })
    }

    /// Boolean form of [`try_is_file`](Self::try_is_file). An error is
    /// `false`, with no semantic fallback.
    #[must_use]
    pub fn is_file(&self, follow_symlinks: bool, must_exist: bool) -> bool {
        self.try_is_file(follow_symlinks, must_exist).unwrap_or_else(|e| {
            debug!("is_file({self}) absorbed error: {e}");
            false
        })
    }

    /// Anchor the path at the working directory. Keeps the semantic type.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be read.
    pub fn absolute(&self) -> Result<Self> {
        let absolute = normalize::absolute(self.as_path())?;
        Ok(Self::from_parts(absolute, self.semantic_type()))
    }

    /// The absolute, symlink-free form of this path.
    ///
    /// When the target exists the semantic type is re-derived from it. When
    /// it does not, the non-strict form falls back to
    /// [`absolute`](Self::absolute) and keeps the current type.
    ///
    /// # Errors
    ///
    /// With `strict`, a missing target or intermediate symlink is returned as
    /// [`Error::PathNotFound`]. Other OS failures are always returned.
    pub fn resolve(&self, strict: bool) -> Result<Self> {
        match fs::canonicalize(self.as_path()) {
            Ok(resolved) => {
                let found = probe(&resolved, true)?;
                let semantic_type = derive_type(found, self.semantic_type());
                Ok(Self::from_parts(resolved, semantic_type))
            }
            Err(e) if is_absent(&e) && !strict => {
                debug!("Cannot resolve {self} ({e}); using absolute form");
                self.absolute()
            }
            Err(e) => Err(Error::from_io("resolve", self.as_path(), e)),
        }
    }

    /// Collapse `.`/`..` lexically and re-derive the semantic type from
    /// whatever is at the resulting location.
    #[must_use]
    pub fn conform_to_filesystem(&self) -> Self {
        let collapsed = normalize::collapse(self.as_path());
        let found = probe(&collapsed, true).unwrap_or_else(|e| {
            debug!("conform_to_filesystem({self}) absorbed error: {e}");
            PhysicalType::DoesNotExist
        });
        Self::from_parts(collapsed, derive_type(found, self.semantic_type()))
    }

    /// Raw metadata for this path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PathNotFound`] if absent, or the wrapped OS error.
    pub fn stat(&self, follow_symlinks: bool) -> Result<Metadata> {
        let metadata = if follow_symlinks {
            fs::metadata(self.as_path())
        } else {
            fs::symlink_metadata(self.as_path())
        };
        metadata.map_err(|e| Error::from_io("stat", self.as_path(), e))
    }

    /// The target of a symbolic link.
    ///
    /// Relative targets are joined onto the link's parent directory.
    ///
    /// # Errors
    ///
    /// Returns an error if this path is not a symlink or cannot be read.
    pub fn read_link(&self) -> Result<Self> {
        let target = fs::read_link(self.as_path())
            .map_err(|e| Error::from_io("read_link", self.as_path(), e))?;
        let inferred = SemanticType::infer(target.as_os_str());
        let full: PathBuf = if target.is_absolute() {
            target
        } else {
            self.parent().as_path().join(target)
        };
        let found = probe(&full, true)?;
        Ok(Self::from_parts(&full, derive_type(found, inferred)))
    }

    /// Name of the user owning this path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PlatformUnsupported`] where ownership is not
    /// available, or a lookup/stat error.
    pub fn owner(&self) -> Result<String> {
        self.owner_with(platform::native())
    }

    /// Name of the group owning this path.
    ///
    /// # Errors
    ///
    /// Same as [`owner`](Self::owner).
    pub fn group(&self) -> Result<String> {
        self.group_with(platform::native())
    }

    pub(crate) fn owner_with(&self, ops: &dyn PlatformOps) -> Result<String> {
        let (uid, _) = ops.owner_ids(&self.stat(true)?)?;
        ops.user_name(uid)
    }

    pub(crate) fn group_with(&self, ops: &dyn PlatformOps) -> Result<String> {
        let (_, gid) = ops.owner_ids(&self.stat(true)?)?;
        ops.group_name(gid)
    }

    /// The form used for relationship comparisons.
    ///
    /// Lexical mode only cleans. Strict mode resolves symlinks; a side that
    /// does not exist falls back to its collapsed absolute form.
    pub(crate) fn comparison_form(&self, strict: bool) -> Result<PathBuf> {
        if !strict {
            return Ok(comparable(self.as_path()));
        }
        match fs::canonicalize(self.as_path()) {
            Ok(resolved) => Ok(resolved),
            Err(e) if is_absent(&e) => {
                debug!("Comparing {self} lexically: {e}");
                Ok(normalize::collapse(&normalize::absolute(self.as_path())?))
            }
            Err(e) => Err(Error::from_io("resolve", self.as_path(), e)),
        }
    }
}
