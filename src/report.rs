//! Collecting every query at once.

use crate::{
    error::MemInfoResult,
    platform::{CacheLevel, Metric, PlatformIdentity},
    resolver::MemInfo,
    sources::MemorySource,
};

/// The outcome of every RAM/swap query and every cache level, taken one after
/// the other. Each field is independent; values are not a consistent snapshot.
#[derive(Debug)]
pub struct MemReport {
    pub platform: PlatformIdentity,
    pub total_ram: MemInfoResult<u64>,
    pub free_ram: MemInfoResult<u64>,
    pub buffer_ram: MemInfoResult<u64>,
    pub cached_ram: MemInfoResult<u64>,
    pub total_swap: MemInfoResult<u64>,
    pub free_swap: MemInfoResult<u64>,
    pub cached_swap: MemInfoResult<u64>,

    /// Indexed by cache level minus one.
    pub caches: [MemInfoResult<u64>; 3],
}

impl MemReport {
    /// Runs every query against the native source.
    pub fn collect() -> Self {
        Self::collect_from(MemInfo::native())
    }

    pub fn collect_from<S: MemorySource>(info: &MemInfo<S>) -> Self {
        Self {
            platform: info.identity(),
            total_ram: info.total_ram(),
            free_ram: info.free_ram(),
            buffer_ram: info.buffer_ram(),
            cached_ram: info.cached_ram(),
            total_swap: info.total_swap(),
            free_swap: info.free_swap(),
            cached_swap: info.cached_swap(),
            caches: CacheLevel::ALL.map(|level| info.cache(level)),
        }
    }

    pub fn get(&self, metric: Metric) -> &MemInfoResult<u64> {
        match metric {
            Metric::TotalRam => &self.total_ram,
            Metric::FreeRam => &self.free_ram,
            Metric::BufferRam => &self.buffer_ram,
            Metric::CachedRam => &self.cached_ram,
            Metric::TotalSwap => &self.total_swap,
            Metric::FreeSwap => &self.free_swap,
            Metric::CachedSwap => &self.cached_swap,
        }
    }

    pub fn cache(&self, level: CacheLevel) -> &MemInfoResult<u64> {
        &self.caches[usize::from(level.get()) - 1]
    }

    /// The value of `metric`, or zero if its query failed.
    pub fn value_or_zero(&self, metric: Metric) -> u64 {
        self.get(metric).as_ref().copied().unwrap_or_default()
    }

    /// Used RAM: total minus free. `None` if either is unavailable.
    pub fn used_ram(&self) -> Option<u64> {
        let total = self.total_ram.as_ref().ok()?;
        let free = self.free_ram.as_ref().ok()?;

        Some(total.saturating_sub(*free))
    }

    /// Used swap: total minus free. `None` if either is unavailable.
    pub fn used_swap(&self) -> Option<u64> {
        let total = self.total_swap.as_ref().ok()?;
        let free = self.free_swap.as_ref().ok()?;

        Some(total.saturating_sub(*free))
    }
}
