//! Windows bindings for memory status, commit/page file figures, and the
//! logical processor (cache) listing.

use std::mem::size_of;

use anyhow::Context;
use windows::Win32::{
    Foundation::ERROR_INSUFFICIENT_BUFFER,
    System::{
        ProcessStatus::{GetPerformanceInfo, PERFORMANCE_INFORMATION},
        SystemInformation::{
            CacheData, CacheInstruction, CacheTrace, CacheUnified, GetLogicalProcessorInformation,
            GlobalMemoryStatusEx, RelationCache, MEMORYSTATUSEX,
            SYSTEM_LOGICAL_PROCESSOR_INFORMATION,
        },
    },
};

use crate::{
    error::{MemInfoError, MemInfoResult},
    sources::processor::{CacheKind, ProcessorRecord},
};

const PERFORMANCE_INFORMATION_SIZE: u32 = size_of::<PERFORMANCE_INFORMATION>() as _;
const RECORD_SIZE: usize = size_of::<SYSTEM_LOGICAL_PROCESSOR_INFORMATION>();

/// Calls `GlobalMemoryStatusEx`.
pub(crate) fn memory_status() -> MemInfoResult<MEMORYSTATUSEX> {
    let mut status = MEMORYSTATUSEX {
        dwLength: size_of::<MEMORYSTATUSEX>() as u32,
        ..Default::default()
    };

    // SAFETY: API call; `dwLength` is set as the API requires.
    unsafe { GlobalMemoryStatusEx(&mut status) }.context("GlobalMemoryStatusEx failed")?;

    Ok(status)
}

/// Calls `GetPerformanceInfo`. Counts in the result are in pages of
/// `PageSize` bytes.
pub(crate) fn performance_info() -> MemInfoResult<PERFORMANCE_INFORMATION> {
    let mut perf_info = PERFORMANCE_INFORMATION::default();

    // SAFETY: API call; we only touch `perf_info` if it succeeds.
    unsafe { GetPerformanceInfo(&mut perf_info, PERFORMANCE_INFORMATION_SIZE) }
        .context("GetPerformanceInfo failed")?;

    Ok(perf_info)
}

/// Returns every record from `GetLogicalProcessorInformation`.
///
/// The first call only reports how big the buffer has to be; the second fills
/// a buffer of exactly that size, which is dropped once converted.
pub(crate) fn logical_processor_records() -> MemInfoResult<Vec<ProcessorRecord>> {
    let mut length = 0_u32;

    // SAFETY: API call with no buffer; it only writes the required length.
    match unsafe { GetLogicalProcessorInformation(None, &mut length) } {
        Ok(()) => {
            return Err(MemInfoError::platform(
                "GetLogicalProcessorInformation succeeded without a buffer",
            ));
        }
        Err(err) if err.code() == ERROR_INSUFFICIENT_BUFFER.to_hresult() => {}
        Err(err) => {
            return Err(anyhow::Error::new(err)
                .context("GetLogicalProcessorInformation failed to report a size")
                .into());
        }
    }

    let mut buffer =
        vec![SYSTEM_LOGICAL_PROCESSOR_INFORMATION::default(); length as usize / RECORD_SIZE];

    // SAFETY: API call; `buffer` holds `length` bytes worth of records, and
    // `length` says so.
    unsafe { GetLogicalProcessorInformation(Some(buffer.as_mut_ptr()), &mut length) }
        .context("GetLogicalProcessorInformation failed")?;

    buffer.truncate(length as usize / RECORD_SIZE);

    Ok(buffer.iter().map(to_record).collect())
}

fn to_record(info: &SYSTEM_LOGICAL_PROCESSOR_INFORMATION) -> ProcessorRecord {
    if info.Relationship != RelationCache {
        return ProcessorRecord::Other;
    }

    // SAFETY: `Cache` is the active union member for `RelationCache` records.
    let cache = unsafe { info.Anonymous.Cache };

    let kind = if cache.Type == CacheUnified {
        CacheKind::Unified
    } else if cache.Type == CacheData {
        CacheKind::Data
    } else if cache.Type == CacheInstruction {
        CacheKind::Instruction
    } else if cache.Type == CacheTrace {
        CacheKind::Trace
    } else {
        return ProcessorRecord::Other;
    };

    ProcessorRecord::Cache {
        level: cache.Level,
        kind,
        size: u64::from(cache.Size),
    }
}
