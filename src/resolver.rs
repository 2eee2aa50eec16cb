//! Turning raw facts from a [`MemorySource`] into byte counts.

use std::{fmt::Display, sync::OnceLock};

use crate::{
    error::{MemInfoError, MemInfoResult},
    platform::{CacheLevel, Metric, PlatformIdentity},
    report::MemReport,
    sources::{MemorySource, NativeSource},
};

static NATIVE: OnceLock<MemInfo<NativeSource>> = OnceLock::new();

/// Answers memory queries using a [`MemorySource`].
///
/// Every call goes to the source; nothing is cached, so each answer reflects
/// the system at the time of the call. Separate calls are not a consistent
/// snapshot of each other.
#[derive(Debug, Clone, Default)]
pub struct MemInfo<S = NativeSource> {
    source: S,
}

impl MemInfo<NativeSource> {
    /// The resolver for the platform this crate was built for. It is set up on
    /// first use and shared afterwards.
    pub fn native() -> &'static Self {
        NATIVE.get_or_init(|| MemInfo::new(NativeSource::default()))
    }
}

impl<S: MemorySource> MemInfo<S> {
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn identity(&self) -> PlatformIdentity {
        self.source.identity()
    }

    /// Total physical memory in bytes. Never `Ok(0)`.
    pub fn total_ram(&self) -> MemInfoResult<u64> {
        self.resolve(Metric::TotalRam)
    }

    /// Free physical memory in bytes.
    pub fn free_ram(&self) -> MemInfoResult<u64> {
        self.resolve(Metric::FreeRam)
    }

    /// Memory used for kernel buffers in bytes.
    pub fn buffer_ram(&self) -> MemInfoResult<u64> {
        self.resolve(Metric::BufferRam)
    }

    /// Memory used for the page/disk cache in bytes.
    pub fn cached_ram(&self) -> MemInfoResult<u64> {
        self.resolve(Metric::CachedRam)
    }

    pub fn total_swap(&self) -> MemInfoResult<u64> {
        self.resolve(Metric::TotalSwap)
    }

    pub fn free_swap(&self) -> MemInfoResult<u64> {
        self.resolve(Metric::FreeSwap)
    }

    /// Swap that has been read back into memory but is still kept in swap.
    pub fn cached_swap(&self) -> MemInfoResult<u64> {
        self.resolve(Metric::CachedSwap)
    }

    /// Size of the CPU data cache at `level` (1, 2, or 3) in bytes.
    ///
    /// Any other level is a [`MemInfoError::InvalidArgument`], whatever the
    /// platform.
    pub fn total_cache(&self, level: u32) -> MemInfoResult<u64> {
        self.cache(CacheLevel::try_from(level)?)
    }

    /// Size of the CPU data cache at `level` in bytes.
    pub fn cache(&self, level: CacheLevel) -> MemInfoResult<u64> {
        logged(level, self.resolve_cache(level))
    }

    /// Runs every query once. See [`MemReport`].
    pub fn report(&self) -> MemReport {
        MemReport::collect_from(self)
    }

    /// Resolves any of the RAM/swap metrics.
    pub fn metric(&self, metric: Metric) -> MemInfoResult<u64> {
        self.resolve(metric)
    }

    fn resolve(&self, metric: Metric) -> MemInfoResult<u64> {
        logged(metric, self.resolve_metric(metric))
    }

    fn resolve_metric(&self, metric: Metric) -> MemInfoResult<u64> {
        if !self.identity().supports(metric) {
            return Err(MemInfoError::unsupported(metric));
        }

        let bytes = self.source.fact(metric)?.to_bytes()?;

        if metric == Metric::TotalRam && bytes == 0 {
            return Err(MemInfoError::platform(
                "the platform reported zero bytes of total RAM",
            ));
        }

        Ok(bytes)
    }

    fn resolve_cache(&self, level: CacheLevel) -> MemInfoResult<u64> {
        if !self.identity().supports_cache() {
            return Err(MemInfoError::unsupported(level));
        }

        match self.source.cache_fact(level)?.to_bytes()? {
            0 => Err(MemInfoError::NotFound(format!("{level} data cache"))),
            bytes => Ok(bytes),
        }
    }
}

#[cfg(feature = "logging")]
fn logged<T>(what: impl Display, result: MemInfoResult<T>) -> MemInfoResult<T> {
    if let Err(err) = &result {
        log::debug!("{what} query failed ({:?}): {err}", err.kind());
    }

    result
}

#[cfg(not(feature = "logging"))]
#[inline]
fn logged<T>(_what: impl Display, result: MemInfoResult<T>) -> MemInfoResult<T> {
    result
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, io::Cursor};

    use super::*;
    use crate::{
        error::ErrorKind,
        sources::{
            processor::{find_cache_size, CacheKind, ProcessorRecord},
            text_counter::find_counter,
        },
        units::{RawFact, Unit},
    };

    /// A source that answers from fixed data, and counts how often it's asked.
    struct FakeSource {
        identity: PlatformIdentity,
        meminfo: &'static str,
        records: Vec<ProcessorRecord>,
        calls: Cell<usize>,
    }

    impl FakeSource {
        fn new(identity: PlatformIdentity) -> Self {
            Self {
                identity,
                meminfo: "",
                records: vec![],
                calls: Cell::new(0),
            }
        }
    }

    impl MemorySource for FakeSource {
        fn identity(&self) -> PlatformIdentity {
            self.identity
        }

        fn fact(&self, metric: Metric) -> MemInfoResult<RawFact> {
            self.calls.set(self.calls.get() + 1);

            match metric {
                Metric::TotalRam => Ok(RawFact::new(4, Unit::Multiplier(1 << 30))),
                Metric::FreeRam => Ok(RawFact::pages(1000, 4096)),
                Metric::CachedRam => {
                    find_counter(Cursor::new(self.meminfo), "Cached:").map(RawFact::kibibytes)
                }
                Metric::TotalSwap => Ok(RawFact::bytes(0)),
                _ => Err(MemInfoError::platform("no such counter")),
            }
        }

        fn cache_fact(&self, level: CacheLevel) -> MemInfoResult<RawFact> {
            self.calls.set(self.calls.get() + 1);
            find_cache_size(&self.records, level).map(RawFact::bytes)
        }
    }

    /// A sysctl-style source whose key lookups all fail.
    struct FailingSysctl;

    impl MemorySource for FailingSysctl {
        fn identity(&self) -> PlatformIdentity {
            PlatformIdentity::MacOs
        }

        fn fact(&self, _metric: Metric) -> MemInfoResult<RawFact> {
            Err(MemInfoError::platform("sysctl hw.memsize failed"))
        }

        fn cache_fact(&self, _level: CacheLevel) -> MemInfoResult<RawFact> {
            Err(MemInfoError::platform("sysctl hw.l2cachesize failed"))
        }
    }

    /// A source that reports zero for everything.
    struct ZeroSource(PlatformIdentity);

    impl MemorySource for ZeroSource {
        fn identity(&self) -> PlatformIdentity {
            self.0
        }

        fn fact(&self, _metric: Metric) -> MemInfoResult<RawFact> {
            Ok(RawFact::bytes(0))
        }

        fn cache_fact(&self, _level: CacheLevel) -> MemInfoResult<RawFact> {
            Ok(RawFact::bytes(0))
        }
    }

    #[test]
    fn test_normalizes() {
        let info = MemInfo::new(FakeSource::new(PlatformIdentity::LinuxLike));

        assert_eq!(info.total_ram().unwrap(), 4 << 30);
        assert_eq!(info.free_ram().unwrap(), 1000 * 4096);
    }

    #[test]
    fn test_synthetic_cached_line() {
        let mut source = FakeSource::new(PlatformIdentity::LinuxLike);
        source.meminfo = "MemTotal: 4096 kB\nCached:    2048 kB\n";

        assert_eq!(MemInfo::new(source).cached_ram().unwrap(), 2048 * 1024);
    }

    #[test]
    fn test_missing_cached_line() {
        let mut source = FakeSource::new(PlatformIdentity::LinuxLike);
        source.meminfo = "MemTotal: 4096 kB\n";

        assert_eq!(
            MemInfo::new(source).cached_ram().unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_zero_swap_is_fine() {
        let info = MemInfo::new(FakeSource::new(PlatformIdentity::LinuxLike));
        assert_eq!(info.total_swap().unwrap(), 0);
    }

    #[test]
    fn test_unsupported_is_idempotent_and_skips_source() {
        for identity in [PlatformIdentity::MacOs, PlatformIdentity::Windows] {
            let info = MemInfo::new(FakeSource::new(identity));

            for _ in 0..3 {
                assert_eq!(info.buffer_ram().unwrap_err().kind(), ErrorKind::Unsupported);
                assert_eq!(info.cached_ram().unwrap_err().kind(), ErrorKind::Unsupported);
            }

            assert_eq!(info.source().calls.get(), 0);
        }
    }

    #[test]
    fn test_invalid_cache_level_on_every_platform() {
        for identity in [
            PlatformIdentity::LinuxLike,
            PlatformIdentity::Bsd,
            PlatformIdentity::MacOs,
            PlatformIdentity::Windows,
            PlatformIdentity::Posix,
            PlatformIdentity::Unsupported,
        ] {
            let info = MemInfo::new(FakeSource::new(identity));

            for level in [0, 4, 42] {
                assert_eq!(
                    info.total_cache(level).unwrap_err().kind(),
                    ErrorKind::InvalidArgument
                );
            }

            assert_eq!(info.source().calls.get(), 0);
        }
    }

    #[test]
    fn test_cache_scan() {
        let mut source = FakeSource::new(PlatformIdentity::Windows);
        source.records = vec![
            ProcessorRecord::Cache {
                level: 2,
                kind: CacheKind::Unified,
                size: 262_144,
            },
            ProcessorRecord::Other,
        ];
        let info = MemInfo::new(source);

        assert_eq!(info.total_cache(2).unwrap(), 262_144);
        assert_eq!(info.total_cache(3).unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_cache_unsupported_platform() {
        let info = MemInfo::new(FakeSource::new(PlatformIdentity::Bsd));

        assert_eq!(info.total_cache(1).unwrap_err().kind(), ErrorKind::Unsupported);
        assert_eq!(info.source().calls.get(), 0);
    }

    #[test]
    fn test_failed_sysctl() {
        let info = MemInfo::new(FailingSysctl);
        let result = info.total_ram();

        assert_eq!(
            result.as_ref().unwrap_err().kind(),
            ErrorKind::PlatformError
        );
        assert_eq!(result.unwrap_or_default(), 0);
        assert_eq!(info.total_cache(2).unwrap_err().kind(), ErrorKind::PlatformError);
    }

    #[test]
    fn test_zero_total_ram_is_an_error() {
        let info = MemInfo::new(ZeroSource(PlatformIdentity::LinuxLike));

        assert_eq!(info.total_ram().unwrap_err().kind(), ErrorKind::PlatformError);
        assert_eq!(info.free_ram().unwrap(), 0);
    }

    #[test]
    fn test_zero_cache_is_not_found() {
        let info = MemInfo::new(ZeroSource(PlatformIdentity::MacOs));
        assert_eq!(info.total_cache(3).unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_unsupported_platform() {
        let info = MemInfo::new(ZeroSource(PlatformIdentity::Unsupported));

        for metric in Metric::ALL {
            assert_eq!(info.metric(metric).unwrap_err().kind(), ErrorKind::Unsupported);
        }
    }

    #[cfg(feature = "logging")]
    #[test]
    fn test_logged_results_pass_through() {
        let info = MemInfo::new(FailingSysctl);

        let failed = logged(Metric::TotalRam, info.resolve_metric(Metric::TotalRam));
        assert_eq!(failed.unwrap_err().kind(), ErrorKind::PlatformError);

        let failed = logged(CacheLevel::L2, info.resolve_cache(CacheLevel::L2));
        assert_eq!(failed.unwrap_err().kind(), ErrorKind::PlatformError);

        assert_eq!(logged(Metric::FreeRam, Ok::<_, MemInfoError>(7)).unwrap(), 7);
    }

    #[test]
    fn test_borrowed_source() {
        let source = FakeSource::new(PlatformIdentity::LinuxLike);
        let info = MemInfo::new(&source);

        assert!(info.total_ram().is_ok());
        assert_eq!(source.calls.get(), 1);
    }
}
