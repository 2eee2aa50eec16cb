//! The portable Unix source, for platforms we have nothing better for. Only
//! physical and available page counts are standardized enough to use.

use crate::{
    error::{MemInfoError, MemInfoResult},
    platform::{CacheLevel, Metric, PlatformIdentity},
    sources::{
        sysconf::{page_size, sysconf},
        MemorySource,
    },
    units::RawFact,
};

/// The [`MemorySource`] for Unix platforms without a dedicated source.
#[derive(Debug, Default, Clone, Copy)]
pub struct PosixSource;

impl PosixSource {
    fn physical_pages() -> MemInfoResult<u64> {
        sysconf(libc::_SC_PHYS_PAGES, "_SC_PHYS_PAGES")
    }

    #[cfg(any(
        target_os = "linux",
        target_os = "android",
        target_os = "solaris",
        target_os = "illumos"
    ))]
    fn available_pages() -> MemInfoResult<u64> {
        sysconf(libc::_SC_AVPHYS_PAGES, "_SC_AVPHYS_PAGES")
    }

    #[cfg(not(any(
        target_os = "linux",
        target_os = "android",
        target_os = "solaris",
        target_os = "illumos"
    )))]
    fn available_pages() -> MemInfoResult<u64> {
        Err(MemInfoError::unsupported(Metric::FreeRam))
    }
}

impl MemorySource for PosixSource {
    fn identity(&self) -> PlatformIdentity {
        PlatformIdentity::Posix
    }

    fn fact(&self, metric: Metric) -> MemInfoResult<RawFact> {
        let pages = match metric {
            Metric::TotalRam => Self::physical_pages()?,
            Metric::FreeRam => Self::available_pages()?,
            _ => return Err(MemInfoError::unsupported(metric)),
        };

        Ok(RawFact::pages(pages, page_size()?))
    }

    fn cache_fact(&self, level: CacheLevel) -> MemInfoResult<RawFact> {
        Err(MemInfoError::unsupported(level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_free_ram_matches_support_table() {
        let supported = PlatformIdentity::Posix.supports(Metric::FreeRam);

        match PosixSource.fact(Metric::FreeRam) {
            Ok(_) => assert!(supported),
            Err(err) if err.kind() == ErrorKind::Unsupported => assert!(!supported),
            Err(err) => panic!("unexpected error: {err}"),
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_page_counts() {
        let total = PosixSource.fact(Metric::TotalRam).unwrap();
        let free = PosixSource.fact(Metric::FreeRam).unwrap();

        assert!(total.value > 0);
        assert!(free.to_bytes().unwrap() <= total.to_bytes().unwrap());
    }
}
