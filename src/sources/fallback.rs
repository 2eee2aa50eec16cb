//! The source for platforms with no known way of reading memory information.

use crate::{
    error::{MemInfoError, MemInfoResult},
    platform::{CacheLevel, Metric, PlatformIdentity},
    sources::MemorySource,
    units::RawFact,
};

/// The fallback [`MemorySource`]. Everything is unsupported.
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackSource;

impl MemorySource for FallbackSource {
    fn identity(&self) -> PlatformIdentity {
        PlatformIdentity::Unsupported
    }

    fn fact(&self, metric: Metric) -> MemInfoResult<RawFact> {
        Err(MemInfoError::unsupported(metric))
    }

    fn cache_fact(&self, level: CacheLevel) -> MemInfoResult<RawFact> {
        Err(MemInfoError::unsupported(level))
    }
}
