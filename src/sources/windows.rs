//! Memory facts for Windows.
//!
//! Windows has no buffer or disk cache figures comparable to other platforms,
//! so those are unsupported. Swap is the page file, derived from the commit
//! limit beyond physical memory.

mod bindings;

use crate::{
    error::{MemInfoError, MemInfoResult},
    platform::{CacheLevel, Metric, PlatformIdentity},
    sources::{processor::find_cache_size, MemorySource},
    units::RawFact,
};

use self::bindings::{logical_processor_records, memory_status, performance_info};

/// The [`MemorySource`] for Windows.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsSource;

/// Total and used page file size, in pages.
fn page_file_pages() -> MemInfoResult<(u64, u64, u64)> {
    let perf_info = performance_info()?;

    let physical_used = perf_info
        .PhysicalTotal
        .saturating_sub(perf_info.PhysicalAvailable);
    let total = perf_info.CommitLimit.saturating_sub(perf_info.PhysicalTotal);
    let used = perf_info.CommitTotal.saturating_sub(physical_used).min(total);

    Ok((total as u64, used as u64, perf_info.PageSize as u64))
}

impl MemorySource for WindowsSource {
    fn identity(&self) -> PlatformIdentity {
        PlatformIdentity::Windows
    }

    fn fact(&self, metric: Metric) -> MemInfoResult<RawFact> {
        match metric {
            Metric::TotalRam => memory_status().map(|status| RawFact::bytes(status.ullTotalPhys)),
            Metric::FreeRam => memory_status().map(|status| RawFact::bytes(status.ullAvailPhys)),
            Metric::TotalSwap => {
                let (total, _, page_size) = page_file_pages()?;
                Ok(RawFact::pages(total, page_size))
            }
            Metric::FreeSwap => {
                let (total, used, page_size) = page_file_pages()?;
                Ok(RawFact::pages(total - used, page_size))
            }
            Metric::BufferRam | Metric::CachedRam | Metric::CachedSwap => {
                Err(MemInfoError::unsupported(metric))
            }
        }
    }

    fn cache_fact(&self, level: CacheLevel) -> MemInfoResult<RawFact> {
        let records = logical_processor_records()?;

        find_cache_size(&records, level).map(RawFact::bytes)
    }
}
