//! Memory facts for FreeBSD, read from named sysctl values.

use anyhow::Context;
use sysctl::{CtlValue, Sysctl};

use crate::{
    error::{MemInfoError, MemInfoResult},
    platform::{CacheLevel, Metric, PlatformIdentity},
    sources::{sysconf::page_size, MemorySource},
    units::RawFact,
};

/// The [`MemorySource`] for FreeBSD.
#[derive(Debug, Default, Clone, Copy)]
pub struct FreeBsdSource;

/// Looks up `key` and returns it as an unsigned integer.
pub(crate) fn sysctl_value(key: &'static str) -> MemInfoResult<u64> {
    let value = sysctl::Ctl::new(key)
        .and_then(|ctl| ctl.value())
        .with_context(|| format!("sysctl {key} failed"))?;

    let value = match value {
        CtlValue::U64(value) | CtlValue::Ulong(value) => Some(value),
        CtlValue::Uint(value) => Some(u64::from(value)),
        CtlValue::Int(value) => u64::try_from(value).ok(),
        CtlValue::Long(value) | CtlValue::S64(value) => u64::try_from(value).ok(),
        _ => None,
    };

    value.ok_or_else(|| {
        MemInfoError::platform(format!("sysctl {key} is not a non-negative integer"))
    })
}

impl MemorySource for FreeBsdSource {
    fn identity(&self) -> PlatformIdentity {
        PlatformIdentity::Bsd
    }

    fn fact(&self, metric: Metric) -> MemInfoResult<RawFact> {
        match metric {
            Metric::TotalRam => sysctl_value("hw.physmem").map(RawFact::bytes),
            Metric::FreeRam => {
                let pages = sysctl_value("vm.stats.vm.v_free_count")?;
                Ok(RawFact::pages(pages, page_size()?))
            }
            Metric::BufferRam => sysctl_value("vfs.bufspace").map(RawFact::bytes),
            Metric::CachedRam => {
                let pages = sysctl_value("vm.stats.vm.v_cache_count")?;
                Ok(RawFact::pages(pages, page_size()?))
            }
            Metric::TotalSwap => sysctl_value("vm.swap_total").map(RawFact::bytes),
            Metric::FreeSwap | Metric::CachedSwap => Err(MemInfoError::unsupported(metric)),
        }
    }

    fn cache_fact(&self, level: CacheLevel) -> MemInfoResult<RawFact> {
        Err(MemInfoError::unsupported(level))
    }
}
