//! Conversion of raw native values into bytes.

use crate::error::{MemInfoError, MemInfoResult};

pub const KIBI_LIMIT: u64 = 1024;
pub const MEBI_LIMIT: u64 = 1024 * 1024;
pub const GIBI_LIMIT: u64 = 1024 * 1024 * 1024;

/// The unit a native source reports a value in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Bytes,

    /// Kibibytes, as `/proc/meminfo` reports everything (despite saying "kB").
    Kibibytes,

    /// A page count, with the page size in bytes.
    Pages(u64),

    /// A platform-reported multiplier, like `mem_unit` from `sysinfo(2)`.
    Multiplier(u64),
}

impl Unit {
    /// How many bytes one of this unit is.
    #[inline]
    pub const fn factor(self) -> u64 {
        match self {
            Unit::Bytes => 1,
            Unit::Kibibytes => KIBI_LIMIT,
            Unit::Pages(page_size) => page_size,
            Unit::Multiplier(multiplier) => multiplier,
        }
    }
}

/// A value as returned by a native source, before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFact {
    pub value: u64,
    pub unit: Unit,
}

impl RawFact {
    #[inline]
    pub const fn new(value: u64, unit: Unit) -> Self {
        Self { value, unit }
    }

    #[inline]
    pub const fn bytes(value: u64) -> Self {
        Self::new(value, Unit::Bytes)
    }

    #[inline]
    pub const fn kibibytes(value: u64) -> Self {
        Self::new(value, Unit::Kibibytes)
    }

    #[inline]
    pub const fn pages(count: u64, page_size: u64) -> Self {
        Self::new(count, Unit::Pages(page_size))
    }

    /// Converts to a byte count. This is exact; the only failure is overflow.
    pub fn to_bytes(self) -> MemInfoResult<u64> {
        let factor = self.unit.factor();

        self.value.checked_mul(factor).ok_or_else(|| {
            MemInfoError::platform(format!(
                "{} * {factor} bytes overflows a 64-bit byte count",
                self.value
            ))
        })
    }
}

/// Parses a size like `32K` or `8M`, as the kernel writes cache sizes in sysfs.
/// Suffixes are binary. A bare number is taken as bytes.
pub fn parse_binary_size(size: &str) -> Option<u64> {
    let size = size.trim();
    let (number, multiplier) = match size.as_bytes().last()? {
        b'K' | b'k' => (&size[..size.len() - 1], KIBI_LIMIT),
        b'M' | b'm' => (&size[..size.len() - 1], MEBI_LIMIT),
        b'G' | b'g' => (&size[..size.len() - 1], GIBI_LIMIT),
        _ => (size, 1),
    };

    number.parse::<u64>().ok()?.checked_mul(multiplier)
}
