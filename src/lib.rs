//! Physical memory, swap, and CPU cache sizes, queried the same way on every
//! platform.
//!
//! Every query returns a byte count or a [`MemInfoError`] whose
//! [`ErrorKind`] says whether the native call failed, the platform has no such
//! figure at all, a search came up empty, or the caller passed a bad argument.
//!
//! | Query            | Linux | FreeBSD | macOS | Windows | Other Unix |
//! |------------------|:-----:|:-------:|:-----:|:-------:|:----------:|
//! | [`total_ram`]    |   ✓   |    ✓    |   ✓   |    ✓    |     ✓      |
//! | [`free_ram`]     |   ✓   |    ✓    |   ✓   |    ✓    |     *      |
//! | [`buffer_ram`]   |   ✓   |    ✓    |       |         |            |
//! | [`cached_ram`]   |   ✓   |    ✓    |       |         |            |
//! | [`total_swap`]   |   ✓   |    ✓    |   ✓   |    ✓    |            |
//! | [`free_swap`]    |   ✓   |         |   ✓   |    ✓    |            |
//! | [`cached_swap`]  |   ✓   |         |       |         |            |
//! | [`total_cache`]  |   ✓   |         |   ✓   |    ✓    |            |
//!
//! \* Only where `sysconf(_SC_AVPHYS_PAGES)` exists (Solaris and illumos).
//!
//! Nothing is cached; every call reads the current state of the system.
//!
//! ```no_run
//! let total = meminfo::total_ram()?;
//! let free = meminfo::free_ram()?;
//! println!("{free} of {total} bytes free");
//!
//! // Not every platform has this.
//! let cached = meminfo::cached_ram().unwrap_or_default();
//! # Ok::<(), meminfo::MemInfoError>(())
//! ```

#![warn(rust_2018_idioms)]

pub mod error;
pub mod platform;
pub mod report;
pub mod resolver;
pub mod sources;
pub mod units;

pub use error::{ErrorKind, MemInfoError, MemInfoResult, Query};
pub use platform::{CacheLevel, Metric, PlatformIdentity};
pub use report::MemReport;
pub use resolver::MemInfo;
pub use sources::{MemorySource, NativeSource};

/// A byte count.
pub type Bytes = u64;

/// Total physical memory in bytes.
pub fn total_ram() -> MemInfoResult<Bytes> {
    MemInfo::native().total_ram()
}

/// Free physical memory in bytes.
pub fn free_ram() -> MemInfoResult<Bytes> {
    MemInfo::native().free_ram()
}

/// Memory used by kernel buffers in bytes.
pub fn buffer_ram() -> MemInfoResult<Bytes> {
    MemInfo::native().buffer_ram()
}

/// Memory used by the disk cache in bytes.
pub fn cached_ram() -> MemInfoResult<Bytes> {
    MemInfo::native().cached_ram()
}

/// Total swap in bytes.
pub fn total_swap() -> MemInfoResult<Bytes> {
    MemInfo::native().total_swap()
}

/// Free swap in bytes.
pub fn free_swap() -> MemInfoResult<Bytes> {
    MemInfo::native().free_swap()
}

/// Swap that is also held in memory, in bytes.
pub fn cached_swap() -> MemInfoResult<Bytes> {
    MemInfo::native().cached_swap()
}

/// Size of the CPU data cache at `level` (1, 2, or 3) in bytes.
pub fn total_cache(level: u32) -> MemInfoResult<Bytes> {
    MemInfo::native().total_cache(level)
}
