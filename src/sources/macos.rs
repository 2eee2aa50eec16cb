//! Memory facts for macOS, from sysctl and Mach host statistics. The kernel
//! exposes no buffer or disk cache figures, so those are unsupported.

mod sysctl_bindings;

use crate::{
    error::{MemInfoError, MemInfoResult},
    platform::{CacheLevel, Metric, PlatformIdentity},
    sources::MemorySource,
    units::RawFact,
};

use self::sysctl_bindings::{free_page_count, swap_usage, sysctl_integer, vm_page_size};

/// The [`MemorySource`] for macOS.
#[derive(Debug, Default, Clone, Copy)]
pub struct MacOsSource;

impl MemorySource for MacOsSource {
    fn identity(&self) -> PlatformIdentity {
        PlatformIdentity::MacOs
    }

    fn fact(&self, metric: Metric) -> MemInfoResult<RawFact> {
        match metric {
            Metric::TotalRam => sysctl_integer("hw.memsize").map(RawFact::bytes),
            Metric::FreeRam => {
                let pages = free_page_count()?;
                Ok(RawFact::pages(pages, vm_page_size()?))
            }
            Metric::TotalSwap => swap_usage().map(|usage| RawFact::bytes(usage.xsu_total)),
            Metric::FreeSwap => swap_usage().map(|usage| RawFact::bytes(usage.xsu_avail)),
            Metric::BufferRam | Metric::CachedRam | Metric::CachedSwap => {
                Err(MemInfoError::unsupported(metric))
            }
        }
    }

    fn cache_fact(&self, level: CacheLevel) -> MemInfoResult<RawFact> {
        let key = match level {
            CacheLevel::L1 => "hw.l1dcachesize",
            CacheLevel::L2 => "hw.l2cachesize",
            CacheLevel::L3 => "hw.l3cachesize",
        };

        // Machines without a given level (Apple Silicon has no L3) just don't
        // have the key.
        match sysctl_integer(key) {
            Ok(size) => Ok(RawFact::bytes(size)),
            Err(err) if err.raw_os_error() == Some(libc::ENOENT) => {
                Err(MemInfoError::NotFound(format!("{level} data cache")))
            }
            Err(err) => Err(err),
        }
    }
}
