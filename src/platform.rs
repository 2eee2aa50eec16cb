//! Platform identity, the metrics that can be queried, and which platform
//! supports what.

use std::fmt;

use crate::error::MemInfoError;

/// Whether `sysconf(_SC_AVPHYS_PAGES)` exists on the target, which is what
/// free RAM comes from on [`PlatformIdentity::Posix`].
pub(crate) const HAS_AVAILABLE_PAGES: bool = cfg!(any(
    target_os = "linux",
    target_os = "android",
    target_os = "solaris",
    target_os = "illumos"
));

/// The family of native data sources in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformIdentity {
    /// Linux and Android: `sysinfo(2)` plus `/proc` and `/sys`.
    LinuxLike,

    /// FreeBSD: named sysctl values.
    Bsd,

    /// macOS: named sysctl values and Mach host statistics.
    MacOs,

    /// Windows: Win32 memory status and logical processor information.
    Windows,

    /// Any other Unix: page counts from `sysconf(3)`.
    Posix,

    /// No known source of memory information.
    Unsupported,
}

impl PlatformIdentity {
    /// The platform this crate was compiled for. This is fixed at compile
    /// time and never changes.
    pub const fn current() -> Self {
        cfg_if::cfg_if! {
            if #[cfg(any(target_os = "linux", target_os = "android"))] {
                PlatformIdentity::LinuxLike
            } else if #[cfg(target_os = "freebsd")] {
                PlatformIdentity::Bsd
            } else if #[cfg(target_os = "macos")] {
                PlatformIdentity::MacOs
            } else if #[cfg(target_os = "windows")] {
                PlatformIdentity::Windows
            } else if #[cfg(unix)] {
                PlatformIdentity::Posix
            } else {
                PlatformIdentity::Unsupported
            }
        }
    }

    /// Whether this platform has any native source for `metric`.
    pub const fn supports(self, metric: Metric) -> bool {
        use Metric::*;

        match self {
            PlatformIdentity::LinuxLike => true,
            PlatformIdentity::Bsd => matches!(
                metric,
                TotalRam | FreeRam | BufferRam | CachedRam | TotalSwap
            ),
            PlatformIdentity::MacOs | PlatformIdentity::Windows => {
                matches!(metric, TotalRam | FreeRam | TotalSwap | FreeSwap)
            }
            PlatformIdentity::Posix => match metric {
                TotalRam => true,
                FreeRam => HAS_AVAILABLE_PAGES,
                _ => false,
            },
            PlatformIdentity::Unsupported => false,
        }
    }

    /// Whether this platform can report CPU cache sizes at all. Individual
    /// levels may still be missing on a given machine.
    pub const fn supports_cache(self) -> bool {
        matches!(
            self,
            PlatformIdentity::LinuxLike | PlatformIdentity::MacOs | PlatformIdentity::Windows
        )
    }
}

impl fmt::Display for PlatformIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlatformIdentity::LinuxLike => "Linux",
            PlatformIdentity::Bsd => "FreeBSD",
            PlatformIdentity::MacOs => "macOS",
            PlatformIdentity::Windows => "Windows",
            PlatformIdentity::Posix => "POSIX",
            PlatformIdentity::Unsupported => "unsupported platform",
        };

        f.write_str(name)
    }
}

/// One of the RAM/swap statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    TotalRam,
    FreeRam,
    BufferRam,
    CachedRam,
    TotalSwap,
    FreeSwap,
    CachedSwap,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::TotalRam,
        Metric::FreeRam,
        Metric::BufferRam,
        Metric::CachedRam,
        Metric::TotalSwap,
        Metric::FreeSwap,
        Metric::CachedSwap,
    ];
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::TotalRam => "total RAM",
            Metric::FreeRam => "free RAM",
            Metric::BufferRam => "buffer RAM",
            Metric::CachedRam => "cached RAM",
            Metric::TotalSwap => "total swap",
            Metric::FreeSwap => "free swap",
            Metric::CachedSwap => "cached swap",
        };

        f.write_str(name)
    }
}

/// A CPU data cache level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheLevel {
    L1 = 1,
    L2 = 2,
    L3 = 3,
}

impl CacheLevel {
    pub const ALL: [CacheLevel; 3] = [CacheLevel::L1, CacheLevel::L2, CacheLevel::L3];

    /// The numeric level, as most native APIs report it.
    #[inline]
    pub const fn get(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u32> for CacheLevel {
    type Error = MemInfoError;

    fn try_from(level: u32) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(CacheLevel::L1),
            2 => Ok(CacheLevel::L2),
            3 => Ok(CacheLevel::L3),
            _ => Err(MemInfoError::InvalidArgument(format!(
                "cache level must be 1, 2, or 3, got {level}"
            ))),
        }
    }
}

impl fmt::Display for CacheLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.get())
    }
}
