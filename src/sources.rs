//! Native sources of memory facts, one per platform family. This module just
//! re-exports the right one for the target as [`NativeSource`].

pub mod processor;
pub mod text_counter;

#[cfg(unix)]
pub mod sysconf;

#[cfg(unix)]
pub mod posix;

pub mod fallback;

cfg_if::cfg_if! {
    if #[cfg(any(target_os = "linux", target_os = "android"))] {
        pub mod linux;
        pub use linux::LinuxSource as NativeSource;
    } else if #[cfg(target_os = "freebsd")] {
        pub mod freebsd;
        pub use freebsd::FreeBsdSource as NativeSource;
    } else if #[cfg(target_os = "macos")] {
        pub mod macos;
        pub use macos::MacOsSource as NativeSource;
    } else if #[cfg(target_os = "windows")] {
        pub mod windows;
        pub use windows::WindowsSource as NativeSource;
    } else if #[cfg(unix)] {
        pub use posix::PosixSource as NativeSource;
    } else {
        pub use fallback::FallbackSource as NativeSource;
    }
}

use crate::{
    error::MemInfoResult,
    platform::{CacheLevel, Metric, PlatformIdentity},
    units::RawFact,
};

/// What a per-platform source of memory facts should implement.
///
/// A source only fetches the raw value in whatever unit the OS reports it in;
/// normalization and the supported-metric checks happen in
/// [`MemInfo`](crate::MemInfo).
pub trait MemorySource {
    /// The platform family this source reads from.
    fn identity(&self) -> PlatformIdentity;

    /// Fetch the raw value for a RAM/swap metric.
    fn fact(&self, metric: Metric) -> MemInfoResult<RawFact>;

    /// Fetch the raw size of the data cache at `level`.
    fn cache_fact(&self, level: CacheLevel) -> MemInfoResult<RawFact>;
}

impl<S: MemorySource + ?Sized> MemorySource for &S {
    fn identity(&self) -> PlatformIdentity {
        (**self).identity()
    }

    fn fact(&self, metric: Metric) -> MemInfoResult<RawFact> {
        (**self).fact(metric)
    }

    fn cache_fact(&self, level: CacheLevel) -> MemInfoResult<RawFact> {
        (**self).cache_fact(level)
    }
}
