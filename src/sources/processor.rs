//! A platform-neutral view of the per-processor topology records that some
//! platforms enumerate, and the search for a cache level within them.

use crate::{
    error::{MemInfoError, MemInfoResult},
    platform::CacheLevel,
};

/// What a cache holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    Unified,
    Instruction,
    Data,
    Trace,
}

impl CacheKind {
    /// Whether the cache holds data, and so counts as a data cache level.
    #[inline]
    pub const fn holds_data(self) -> bool {
        matches!(self, CacheKind::Unified | CacheKind::Data)
    }
}

/// One entry in a processor topology listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorRecord {
    Cache { level: u8, kind: CacheKind, size: u64 },

    /// Anything else: cores, packages, NUMA nodes...
    Other,
}

/// Returns the size in bytes of the first data cache at `level`.
///
/// Every record is looked at before giving up with [`MemInfoError::NotFound`].
/// A cache reported with a size of zero is treated the same as a missing one.
pub fn find_cache_size<'a>(
    records: impl IntoIterator<Item = &'a ProcessorRecord>, level: CacheLevel,
) -> MemInfoResult<u64> {
    records
        .into_iter()
        .find_map(|record| match *record {
            ProcessorRecord::Cache {
                level: record_level,
                kind,
                size,
            } if record_level == level.get() && kind.holds_data() && size > 0 => Some(size),
            _ => None,
        })
        .ok_or_else(|| MemInfoError::NotFound(format!("{level} data cache")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_two_entry_buffer() {
        let records = [
            ProcessorRecord::Cache {
                level: 2,
                kind: CacheKind::Unified,
                size: 262_144,
            },
            ProcessorRecord::Other,
        ];

        assert_eq!(find_cache_size(&records, CacheLevel::L2).unwrap(), 262_144);
        assert_eq!(
            find_cache_size(&records, CacheLevel::L3).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_skips_instruction_cache() {
        let records = [
            ProcessorRecord::Cache {
                level: 1,
                kind: CacheKind::Instruction,
                size: 65_536,
            },
            ProcessorRecord::Cache {
                level: 1,
                kind: CacheKind::Data,
                size: 32_768,
            },
        ];

        assert_eq!(find_cache_size(&records, CacheLevel::L1).unwrap(), 32_768);
    }

    #[test]
    fn test_zero_sized_cache_is_missing() {
        let records = [ProcessorRecord::Cache {
            level: 3,
            kind: CacheKind::Unified,
            size: 0,
        }];

        assert_eq!(
            find_cache_size(&records, CacheLevel::L3).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(
            find_cache_size(&[], CacheLevel::L1).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }
}
