//! Disk usage of the filesystem holding a path, and byte-size units.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::path::{probe, SemanticPath};
use crate::platform::{self, PlatformOps};

/// Space on the filesystem that holds a path, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiskUsage {
    /// Capacity of the filesystem.
    pub total: u64,
    /// Bytes in use.
    pub used: u64,
    /// Bytes available to an unprivileged user.
    pub free: u64,
}

impl DiskUsage {
    /// `total` expressed in `unit`.
    #[must_use]
    pub fn total_in(&self, unit: SizeUnit) -> f64 {
        unit.convert(self.total)
    }

    /// `used` expressed in `unit`.
    #[must_use]
    pub fn used_in(&self, unit: SizeUnit) -> f64 {
        unit.convert(self.used)
    }

    /// `free` expressed in `unit`.
    #[must_use]
    pub fn free_in(&self, unit: SizeUnit) -> f64 {
        unit.convert(self.free)
    }
}

/// A byte-size unit: SI prefixes (powers of 1000) or IEC prefixes (powers
/// of 1024), from bytes up to quetta/quebi.
///
/// # Examples
///
/// ```
/// use fluidpath::SizeUnit;
///
/// let unit: SizeUnit = "MiB".parse()?;
/// assert_eq!(unit.convert(3 * 1024 * 1024), 3.0);
/// assert_eq!(SizeUnit::KB.convert(1500), 1.5);
/// # Ok::<(), fluidpath::Error>(())
/// ```
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SizeUnit {
    B,
    KB,
    MB,
    GB,
    TB,
    PB,
    EB,
    ZB,
    YB,
    RB,
    QB,
    KiB,
    MiB,
    GiB,
    TiB,
    PiB,
    EiB,
    ZiB,
    YiB,
    RiB,
    QiB,
}

impl SizeUnit {
    const DECIMAL: [Self; 11] = [
        Self::B,
        Self::KB,
        Self::MB,
        Self::GB,
        Self::TB,
        Self::PB,
        Self::EB,
        Self::ZB,
        Self::YB,
        Self::RB,
        Self::QB,
    ];

    const BINARY: [Self; 10] = [
        Self::KiB,
        Self::MiB,
        Self::GiB,
        Self::TiB,
        Self::PiB,
        Self::EiB,
        Self::ZiB,
        Self::YiB,
        Self::RiB,
        Self::QiB,
    ];

    /// The unit's symbol, e.g. `"GiB"`.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::B => "B",
            Self::KB => "KB",
            Self::MB => "MB",
            Self::GB => "GB",
            Self::TB => "TB",
            Self::PB => "PB",
            Self::EB => "EB",
            Self::ZB => "ZB",
            Self::YB => "YB",
            Self::RB => "RB",
            Self::QB => "QB",
            Self::KiB => "KiB",
            Self::MiB => "MiB",
            Self::GiB => "GiB",
            Self::TiB => "TiB",
            Self::PiB => "PiB",
            Self::EiB => "EiB",
            Self::ZiB => "ZiB",
            Self::YiB => "YiB",
            Self::RiB => "RiB",
            Self::QiB => "QiB",
        }
    }

    /// Bytes in one of this unit.
    #[must_use]
    pub fn bytes(self) -> f64 {
        if let Some(power) = Self::DECIMAL.iter().position(|u| *u == self) {
            return 1000_f64.powi(exponent(power));
        }
        let power = Self::BINARY
            .iter()
            .position(|u| *u == self)
            .map_or(0, |i| i + 1);
        1024_f64.powi(exponent(power))
    }

    /// Convert a byte count into this unit.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn convert(self, bytes: u64) -> f64 {
        bytes as f64 / self.bytes()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn exponent(power: usize) -> i32 {
    power as i32
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for SizeUnit {
    type Err = Error;

    /// Symbols are case-sensitive: `Mb` is not `MB`.
    fn from_str(s: &str) -> Result<Self> {
        Self::DECIMAL
            .into_iter()
            .chain(Self::BINARY)
            .find(|unit| unit.symbol() == s)
            .ok_or_else(|| Error::Validation {
                field: "size unit".to_string(),
                message: format!("unknown unit `{s}`"),
            })
    }
}

impl SemanticPath {
    /// Total, used and free space of the filesystem holding this path.
    ///
    /// # Errors
    ///
    /// [`Error::PathNotFound`] if nothing is at this path,
    /// [`Error::PlatformUnsupported`] where the platform cannot report it, or
    /// the wrapped OS error.
    pub fn disk_usage(&self) -> Result<DiskUsage> {
        self.disk_usage_with(platform::native())
    }

    pub(crate) fn disk_usage_with(&self, ops: &dyn PlatformOps) -> Result<DiskUsage> {
        if !probe(self.as_path(), false)?.exists() {
            return Err(Error::PathNotFound {
                path: self.to_path_buf(),
                operation: "disk_usage",
            });
        }
        ops.disk_usage(self.as_path())
    }
}
