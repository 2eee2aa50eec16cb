//! Memory facts for Linux (and Android), from `sysinfo(2)`, `/proc/meminfo`,
//! and the CPU cache topology under `/sys`.

use std::{
    fs, io,
    mem::MaybeUninit,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    error::{MemInfoError, MemInfoResult},
    platform::{CacheLevel, Metric, PlatformIdentity},
    sources::{
        processor::{find_cache_size, CacheKind, ProcessorRecord},
        text_counter::read_counter,
        MemorySource,
    },
    units::{parse_binary_size, RawFact, Unit},
};

const MEMINFO_PATH: &str = "/proc/meminfo";
const CPU0_CACHE_DIR: &str = "/sys/devices/system/cpu/cpu0/cache";

/// The [`MemorySource`] for Linux.
///
/// The locations it reads text facts from can be overridden, which is mostly
/// useful for pointing it at synthetic files.
#[derive(Debug, Clone)]
pub struct LinuxSource {
    meminfo_path: PathBuf,
    cache_dir: PathBuf,
}

impl Default for LinuxSource {
    fn default() -> Self {
        Self {
            meminfo_path: PathBuf::from(MEMINFO_PATH),
            cache_dir: PathBuf::from(CPU0_CACHE_DIR),
        }
    }
}

impl LinuxSource {
    /// Read `Cached:`-style counters from `path` instead of `/proc/meminfo`.
    pub fn with_meminfo_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.meminfo_path = path.into();
        self
    }

    /// Read the cache topology from `dir` instead of
    /// `/sys/devices/system/cpu/cpu0/cache`. The directory is expected to hold
    /// `index*` subdirectories with `level`, `type`, and `size` files.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    pub fn meminfo_path(&self) -> &Path {
        &self.meminfo_path
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Reads a `/proc/meminfo` line; these are always in KiB.
    fn meminfo_fact(&self, label: &str) -> MemInfoResult<RawFact> {
        read_counter(&self.meminfo_path, label).map(RawFact::kibibytes)
    }

    /// Every cache listed for the CPU.
    fn cache_records(&self) -> MemInfoResult<Vec<ProcessorRecord>> {
        let entries = match fs::read_dir(&self.cache_dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(MemInfoError::NotFound(format!(
                    "CPU cache topology at {}",
                    self.cache_dir.display()
                )));
            }
            Err(err) => {
                return Err(anyhow::Error::new(err)
                    .context(format!("failed to read {}", self.cache_dir.display()))
                    .into());
            }
        };

        let mut records = vec![];
        for entry in entries {
            let entry =
                entry.with_context(|| format!("failed to read {}", self.cache_dir.display()))?;
            if entry.file_name().to_string_lossy().starts_with("index") {
                records.push(read_cache_index(&entry.path()));
            }
        }

        Ok(records)
    }
}

/// Reads one `index*` directory. Anything unreadable or unrecognized is
/// treated as not being a usable cache rather than failing the whole scan.
fn read_cache_index(index: &Path) -> ProcessorRecord {
    let read = |name: &str| fs::read_to_string(index.join(name)).ok();

    let level = read("level").and_then(|level| level.trim().parse::<u8>().ok());
    let kind = read("type").and_then(|kind| match kind.trim() {
        "Data" => Some(CacheKind::Data),
        "Instruction" => Some(CacheKind::Instruction),
        "Unified" => Some(CacheKind::Unified),
        _ => None,
    });
    let size = read("size").and_then(|size| parse_binary_size(&size));

    match (level, kind, size) {
        (Some(level), Some(kind), Some(size)) => ProcessorRecord::Cache { level, kind, size },
        _ => ProcessorRecord::Other,
    }
}

/// Calls `sysinfo(2)`.
fn sysinfo() -> MemInfoResult<libc::sysinfo> {
    let mut info = MaybeUninit::<libc::sysinfo>::zeroed();

    // SAFETY: libc binding; `info` is a valid, writable `sysinfo` struct.
    let result = unsafe { libc::sysinfo(info.as_mut_ptr()) };

    if result != 0 {
        return Err(anyhow::Error::new(io::Error::last_os_error())
            .context("sysinfo failed")
            .into());
    }

    // SAFETY: The call succeeded, so the kernel filled it in. It was zeroed
    // beforehand anyway.
    Ok(unsafe { info.assume_init() })
}

impl MemorySource for LinuxSource {
    fn identity(&self) -> PlatformIdentity {
        PlatformIdentity::LinuxLike
    }

    fn fact(&self, metric: Metric) -> MemInfoResult<RawFact> {
        let counter: fn(&libc::sysinfo) -> u64 = match metric {
            Metric::CachedRam => return self.meminfo_fact("Cached:"),
            Metric::CachedSwap => return self.meminfo_fact("SwapCached:"),
            Metric::TotalRam => |info| info.totalram as u64,
            Metric::FreeRam => |info| info.freeram as u64,
            Metric::BufferRam => |info| info.bufferram as u64,
            Metric::TotalSwap => |info| info.totalswap as u64,
            Metric::FreeSwap => |info| info.freeswap as u64,
        };

        let info = sysinfo()?;

        // Older kernels leave `mem_unit` as 0, meaning bytes.
        let mem_unit = u64::from(info.mem_unit).max(1);

        Ok(RawFact::new(counter(&info), Unit::Multiplier(mem_unit)))
    }

    fn cache_fact(&self, level: CacheLevel) -> MemInfoResult<RawFact> {
        let records = self.cache_records()?;

        find_cache_size(&records, level).map(RawFact::bytes)
    }
}
