//! Platform capabilities.
//!
//! Ownership, permission bits and device-name rules differ between POSIX and
//! other systems. The [`PlatformOps`] trait collects those operations; one
//! implementation is chosen at build time and handed out by [`native`].
//! Operations a platform cannot perform fail with
//! [`Error::PlatformUnsupported`](crate::Error::PlatformUnsupported).

use std::ffi::OsStr;
use std::fs::Metadata;
use std::path::Path;

#[cfg(not(unix))]
use crate::error::Error;
use crate::error::Result;
use crate::operations::DiskUsage;
#[cfg(not(unix))]
use crate::path::PhysicalType;

/// Operations whose behavior depends on the operating system.
#[cfg_attr(test, mockall::automock)]
pub trait PlatformOps: Send + Sync {
    /// POSIX-style mode bits (file type and permissions) for `metadata`.
    fn mode_bits(&self, metadata: &Metadata) -> u32;

    /// Owning user and group ids.
    ///
    /// # Errors
    ///
    /// [`Error::PlatformUnsupported`](crate::Error::PlatformUnsupported) where ownership is not exposed.
    fn owner_ids(&self, metadata: &Metadata) -> Result<(u32, u32)>;

    /// User name for a uid.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownUser`](crate::Error::UnknownUser) if no such user exists.
    fn user_name(&self, uid: u32) -> Result<String>;

    /// Group name for a gid.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownGroup`](crate::Error::UnknownGroup) if no such group exists.
    fn group_name(&self, gid: u32) -> Result<String>;

    /// Uid for a user name.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownUser`](crate::Error::UnknownUser) if no such user exists.
    fn user_id(&self, name: &str) -> Result<u32>;

    /// Gid for a group name.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownGroup`](crate::Error::UnknownGroup) if no such group exists.
    fn group_id(&self, name: &str) -> Result<u32>;

    /// Change ownership. `None` leaves that id unchanged.
    ///
    /// # Errors
    ///
    /// Wrapped OS errors, or [`Error::PlatformUnsupported`](crate::Error::PlatformUnsupported).
    fn change_owner(
        &self,
        path: &Path,
        uid: Option<u32>,
        gid: Option<u32>,
        follow_symlinks: bool,
    ) -> Result<()>;

    /// Set permission bits.
    ///
    /// # Errors
    ///
    /// Wrapped OS errors, or [`Error::PlatformUnsupported`](crate::Error::PlatformUnsupported) when asked to
    /// change a symlink itself.
    fn set_mode(&self, path: &Path, mode: u32, follow_symlinks: bool) -> Result<()>;

    /// Whether `name` is reserved by the platform.
    fn is_reserved_name(&self, name: &OsStr) -> bool;

    /// Create a symbolic link at `link` pointing to `target`.
    ///
    /// # Errors
    ///
    /// Wrapped OS errors.
    fn symlink(&self, target: &Path, link: &Path, target_is_dir: bool) -> Result<()>;

    /// Space on the filesystem that holds `path`.
    ///
    /// # Errors
    ///
    /// Wrapped OS errors, or [`Error::PlatformUnsupported`](crate::Error::PlatformUnsupported).
    fn disk_usage(&self, path: &Path) -> Result<DiskUsage>;
}

/// The implementation for the current build target.
#[must_use]
pub fn native() -> &'static dyn PlatformOps {
    #[cfg(unix)]
    {
        static OPS: PosixOps = PosixOps;
        &OPS
    }
    #[cfg(not(unix))]
    {
        static OPS: PortableOps = PortableOps;
        &OPS
    }
}

/// Windows device names (`CON`, `NUL`, `COM1`, ...), with or without an
/// extension and ignoring trailing dots and spaces.
///
/// # Examples
///
/// ```
/// use fluidpath::platform::is_windows_reserved_name;
/// use std::ffi::OsStr;
///
/// assert!(is_windows_reserved_name(OsStr::new("con")));
/// assert!(is_windows_reserved_name(OsStr::new("NUL.txt")));
/// assert!(!is_windows_reserved_name(OsStr::new("console")));
/// ```
#[must_use]
pub fn is_windows_reserved_name(name: &OsStr) -> bool {
    let name = name.to_string_lossy();
    let name = name.trim_end_matches(['.', ' ']);
    let base = name.split('.').next().unwrap_or_default().trim_end();
    let upper = base.to_ascii_uppercase();
    match upper.as_str() {
        "CON" | "PRN" | "AUX" | "NUL" | "CONIN$" | "CONOUT$" => true,
        _ => {
            let (prefix, digit) = upper.split_at(upper.len().min(3));
            matches!(prefix, "COM" | "LPT")
                && digit.len() == 1
                && digit.bytes().all(|b| (b'1'..=b'9').contains(&b))
        }
    }
}

#[cfg(unix)]
pub use posix::PosixOps;

#[cfg(unix)]
mod posix {
    use std::ffi::OsStr;
    use std::fs::{self, Metadata, Permissions};
    use std::io;
    use std::os::unix::fs::{MetadataExt, PermissionsExt};
    use std::path::Path;

    use nix::sys::statvfs::statvfs;
    use nix::unistd::{Gid, Group, Uid, User};

    use super::PlatformOps;
    use crate::operations::DiskUsage;
    use crate::error::{Error, Result};

    /// POSIX implementation backed by `nix` user and group lookups.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct PosixOps;

    fn lookup_failed(operation: &'static str, err: nix::errno::Errno) -> Error {
        Error::Io {
            operation,
            path: Path::new("/etc").to_path_buf(),
            source: io::Error::from(err),
        }
    }

    impl PlatformOps for PosixOps {
        fn mode_bits(&self, metadata: &Metadata) -> u32 {
            metadata.mode()
        }

        fn owner_ids(&self, metadata: &Metadata) -> Result<(u32, u32)> {
            Ok((metadata.uid(), metadata.gid()))
        }

        fn user_name(&self, uid: u32) -> Result<String> {
            User::from_uid(Uid::from_raw(uid))
                .map_err(|e| lookup_failed("getpwuid", e))?
                .map(|user| user.name)
                .ok_or_else(|| Error::UnknownUser {
                    name: uid.to_string(),
                })
        }

        fn group_name(&self, gid: u32) -> Result<String> {
            Group::from_gid(Gid::from_raw(gid))
                .map_err(|e| lookup_failed("getgrgid", e))?
                .map(|group| group.name)
                .ok_or_else(|| Error::UnknownGroup {
                    name: gid.to_string(),
                })
        }

        fn user_id(&self, name: &str) -> Result<u32> {
            User::from_name(name)
                .map_err(|e| lookup_failed("getpwnam", e))?
                .map(|user| user.uid.as_raw())
                .ok_or_else(|| Error::UnknownUser {
                    name: name.to_string(),
                })
        }

        fn group_id(&self, name: &str) -> Result<u32> {
            Group::from_name(name)
                .map_err(|e| lookup_failed("getgrnam", e))?
                .map(|group| group.gid.as_raw())
                .ok_or_else(|| Error::UnknownGroup {
                    name: name.to_string(),
                })
        }

        fn change_owner(
            &self,
            path: &Path,
            uid: Option<u32>,
            gid: Option<u32>,
            follow_symlinks: bool,
        ) -> Result<()> {
            let result = if follow_symlinks {
                std::os::unix::fs::chown(path, uid, gid)
            } else {
                std::os::unix::fs::lchown(path, uid, gid)
            };
            result.map_err(|e| Error::from_io("chown", path, e))
        }

        fn set_mode(&self, path: &Path, mode: u32, follow_symlinks: bool) -> Result<()> {
            if !follow_symlinks {
                let metadata =
                    fs::symlink_metadata(path).map_err(|e| Error::from_io("chmod", path, e))?;
                if metadata.file_type().is_symlink() {
                    return Err(Error::PlatformUnsupported {
                        operation: "chmod on a symlink",
                    });
                }
            }
            fs::set_permissions(path, Permissions::from_mode(mode))
                .map_err(|e| Error::from_io("chmod", path, e))
        }

        fn is_reserved_name(&self, _name: &OsStr) -> bool {
            false
        }

        fn symlink(&self, target: &Path, link: &Path, _target_is_dir: bool) -> Result<()> {
            std::os::unix::fs::symlink(target, link).map_err(|e| Error::from_io("symlink", link, e))
        }

        // Field widths differ between targets.
        #[allow(clippy::useless_conversion)]
        fn disk_usage(&self, path: &Path) -> Result<DiskUsage> {
            let stats =
                statvfs(path).map_err(|e| Error::from_io("statvfs", path, io::Error::from(e)))?;
            let block = u64::from(stats.fragment_size());
            let blocks = u64::from(stats.blocks());
            Ok(DiskUsage {
                total: blocks.saturating_mul(block),
                used: blocks
                    .saturating_sub(u64::from(stats.blocks_free()))
                    .saturating_mul(block),
                free: u64::from(stats.blocks_available()).saturating_mul(block),
            })
        }
    }
}

/// Fallback for targets without POSIX ownership.
#[cfg(not(unix))]
#[derive(Debug, Default, Clone, Copy)]
pub struct PortableOps;

#[cfg(not(unix))]
impl PlatformOps for PortableOps {
    fn mode_bits(&self, metadata: &Metadata) -> u32 {
        let file_type = metadata.file_type();
        let kind = if file_type.is_symlink() {
            PhysicalType::Symlink
        } else if file_type.is_dir() {
            PhysicalType::Directory
        } else {
            PhysicalType::RegularFile
        };
        let permissions = match (kind, metadata.permissions().readonly()) {
            (PhysicalType::Directory, _) => 0o755,
            (_, true) => 0o444,
            (_, false) => 0o644,
        };
        kind.mode_bits() | permissions
    }

    fn owner_ids(&self, _metadata: &Metadata) -> Result<(u32, u32)> {
        Err(Error::PlatformUnsupported { operation: "owner" })
    }

    fn user_name(&self, _uid: u32) -> Result<String> {
        Err(Error::PlatformUnsupported {
            operation: "user name lookup",
        })
    }

    fn group_name(&self, _gid: u32) -> Result<String> {
        Err(Error::PlatformUnsupported {
            operation: "group name lookup",
        })
    }

    fn user_id(&self, _name: &str) -> Result<u32> {
        Err(Error::PlatformUnsupported {
            operation: "user id lookup",
        })
    }

    fn group_id(&self, _name: &str) -> Result<u32> {
        Err(Error::PlatformUnsupported {
            operation: "group id lookup",
        })
    }

    fn change_owner(
        &self,
        _path: &Path,
        _uid: Option<u32>,
        _gid: Option<u32>,
        _follow_symlinks: bool,
    ) -> Result<()> {
        Err(Error::PlatformUnsupported { operation: "chown" })
    }

    fn set_mode(&self, path: &Path, mode: u32, follow_symlinks: bool) -> Result<()> {
        let metadata = std::fs::symlink_metadata(path).map_err(|e| Error::from_io("chmod", path, e))?;
        if !follow_symlinks && metadata.file_type().is_symlink() {
            return Err(Error::PlatformUnsupported {
                operation: "chmod on a symlink",
            });
        }
        let mut permissions = std::fs::metadata(path)
            .map_err(|e| Error::from_io("chmod", path, e))?
            .permissions();
        permissions.set_readonly(mode & 0o200 == 0);
        std::fs::set_permissions(path, permissions).map_err(|e| Error::from_io("chmod", path, e))
    }

    fn is_reserved_name(&self, name: &OsStr) -> bool {
        is_windows_reserved_name(name)
    }

    #[cfg(windows)]
    fn symlink(&self, target: &Path, link: &Path, target_is_dir: bool) -> Result<()> {
        let result = if target_is_dir {
            std::os::windows::fs::symlink_dir(target, link)
        } else {
            std::os::windows::fs::symlink_file(target, link)
        };
        result.map_err(|e| Error::from_io("symlink", link, e))
    }

    #[cfg(not(windows))]
    fn symlink(&self, _target: &Path, _link: &Path, _target_is_dir: bool) -> Result<()> {
        Err(Error::PlatformUnsupported {
            operation: "symlink",
        })
    }

    fn disk_usage(&self, _path: &Path) -> Result<DiskUsage> {
        Err(Error::PlatformUnsupported {
            operation: "disk_usage",
        })
    }
}
