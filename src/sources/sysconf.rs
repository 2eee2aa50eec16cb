//! Page-counted facts from `sysconf(3)`.

use libc::c_int;

use crate::error::{MemInfoError, MemInfoResult};

/// Reads a `sysconf` value. `-1` means the option isn't supported (or the call
/// failed), which is an error; zero is a perfectly good answer.
pub fn sysconf(name: c_int, what: &'static str) -> MemInfoResult<u64> {
    // SAFETY: libc binding, takes no pointers.
    let value = unsafe { libc::sysconf(name) };

    if value < 0 {
        Err(MemInfoError::platform(format!(
            "sysconf({what}) is not supported"
        )))
    } else {
        Ok(value as u64)
    }
}

/// The size of a memory page in bytes.
#[inline]
pub fn page_size() -> MemInfoResult<u64> {
    sysconf(libc::_SC_PAGESIZE, "_SC_PAGESIZE")
}
