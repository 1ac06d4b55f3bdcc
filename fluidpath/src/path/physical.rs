//! Physical path types.
//!
//! A physical type is what the filesystem reports for a path at the moment
//! it is asked. It is computed on demand and never cached.

use std::fmt;
use std::fs::Metadata;

use serde::{Deserialize, Serialize};

/// File-type mask of a POSIX `st_mode`.
const S_IFMT: u32 = 0o170_000;
const S_IFSOCK: u32 = 0o140_000;
const S_IFLNK: u32 = 0o120_000;
const S_IFREG: u32 = 0o100_000;
const S_IFBLK: u32 = 0o060_000;
const S_IFDIR: u32 = 0o040_000;
const S_IFCHR: u32 = 0o020_000;
const S_IFIFO: u32 = 0o010_000;

/// The on-disk type of a path.
///
/// # Examples
///
/// ```
/// use fluidpath::PhysicalType;
///
/// assert_eq!(PhysicalType::from_mode(0o100_644), PhysicalType::RegularFile);
/// assert_eq!(PhysicalType::from_mode(0o040_755), PhysicalType::Directory);
/// assert_eq!(PhysicalType::from_mode(0), PhysicalType::Unknown);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhysicalType {
    /// A regular file.
    RegularFile,
    /// A directory.
    Directory,
    /// A symbolic link (not its target).
    Symlink,
    /// A named pipe (FIFO).
    Pipe,
    /// A character device.
    CharDevice,
    /// A block device.
    BlockDevice,
    /// A Unix domain socket.
    Socket,
    /// Something exists, but its type bits are not recognized.
    Unknown,
    /// Nothing exists at the path.
    DoesNotExist,
}

impl PhysicalType {
    /// Classify raw `st_mode` bits.
    ///
    /// Total over all inputs: the type predicates are tried in a fixed order
    /// (regular, directory, symlink, fifo, char device, block device, socket)
    /// and anything else is `Unknown`. Permission bits are ignored.
    #[must_use]
    pub const fn from_mode(mode: u32) -> Self {
        let kind = mode & S_IFMT;
        if kind == S_IFREG {
            Self::RegularFile
        } else if kind == S_IFDIR {
            Self::Directory
        } else if kind == S_IFLNK {
            Self::Symlink
        } else if kind == S_IFIFO {
            Self::Pipe
        } else if kind == S_IFCHR {
            Self::CharDevice
        } else if kind == S_IFBLK {
            Self::BlockDevice
        } else if kind == S_IFSOCK {
            Self::Socket
        } else {
            Self::Unknown
        }
    }

    /// Synthesize the `st_mode` type bits for a physical type.
    ///
    /// Used on platforms whose metadata carries no mode word.
    #[must_use]
    pub const fn mode_bits(self) -> u32 {
        match self {
            Self::RegularFile => S_IFREG,
            Self::Directory => S_IFDIR,
            Self::Symlink => S_IFLNK,
            Self::Pipe => S_IFIFO,
            Self::CharDevice => S_IFCHR,
            Self::BlockDevice => S_IFBLK,
            Self::Socket => S_IFSOCK,
            Self::Unknown | Self::DoesNotExist => 0,
        }
    }

    /// Classify metadata through the native platform.
    #[must_use]
    pub fn from_metadata(metadata: &Metadata) -> Self {
        Self::from_mode(crate::platform::native().mode_bits(metadata))
    }

    /// Whether this physical type satisfies a semantic "file".
    ///
    /// Everything that exists except directories and unrecognized entries
    /// counts, including symlinks, pipes, sockets and devices.
    #[must_use]
    pub const fn counts_as_file(self) -> bool {
        !matches!(self, Self::Directory | Self::Unknown | Self::DoesNotExist)
    }

    /// Whether anything exists.
    #[must_use]
    pub const fn exists(self) -> bool {
        !matches!(self, Self::DoesNotExist)
    }
}

impl fmt::Display for PhysicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RegularFile => "regular file",
            Self::Directory => "directory",
            Self::Symlink => "symlink",
            Self::Pipe => "pipe",
            Self::CharDevice => "character device",
            Self::BlockDevice => "block device",
            Self::Socket => "socket",
            Self::Unknown => "unknown",
            Self::DoesNotExist => "nothing",
        };
        f.write_str(name)
    }
}
