//! Thin bindings for reading sysctl values and Mach host statistics.

use std::{
    ffi::CString,
    io,
    mem::{self, MaybeUninit},
    ptr,
};

use anyhow::Context;
use mach2::{
    kern_return::{kern_return_t, KERN_SUCCESS},
    port::mach_port_t,
    vm_types::vm_size_t,
};

use crate::error::{MemInfoError, MemInfoResult};

extern "C" {
    fn host_page_size(host: mach_port_t, out_page_size: *mut vm_size_t) -> kern_return_t;
}

/// Copies the value of `key` into `out`, returning how many bytes were written.
///
/// # Safety
///
/// `out` must be valid for writes of `len` bytes.
unsafe fn sysctl_raw(key: &str, out: *mut libc::c_void, len: usize) -> MemInfoResult<usize> {
    let name = CString::new(key).with_context(|| format!("bad sysctl key {key:?}"))?;
    let mut size = len;

    // SAFETY: libc binding. `out` is valid for `len` bytes per this function's
    // contract, and `size` tells the kernel exactly that.
    let result = unsafe { libc::sysctlbyname(name.as_ptr(), out, &mut size, ptr::null_mut(), 0) };

    if result != 0 {
        return Err(anyhow::Error::new(io::Error::last_os_error())
            .context(format!("sysctl {key} failed"))
            .into());
    }

    Ok(size)
}

/// Reads an integer sysctl value. The kernel reports these as either 32 or 64
/// bits depending on the key; any other size is an error.
pub(crate) fn sysctl_integer(key: &str) -> MemInfoResult<u64> {
    let mut buffer = [0_u8; 8];

    // SAFETY: `buffer` is 8 writable bytes.
    let size = unsafe { sysctl_raw(key, buffer.as_mut_ptr().cast(), buffer.len())? };

    match size {
        4 => Ok(u64::from(u32::from_ne_bytes([
            buffer[0], buffer[1], buffer[2], buffer[3],
        ]))),
        8 => Ok(u64::from_ne_bytes(buffer)),
        _ => Err(MemInfoError::platform(format!(
            "sysctl {key} returned {size} bytes, expected 4 or 8"
        ))),
    }
}

/// Reads `vm.swapusage`.
pub(crate) fn swap_usage() -> MemInfoResult<libc::xsw_usage> {
    const EXPECTED: usize = mem::size_of::<libc::xsw_usage>();
    let mut usage = MaybeUninit::<libc::xsw_usage>::zeroed();

    // SAFETY: `usage` is a writable `xsw_usage`.
    let size = unsafe { sysctl_raw("vm.swapusage", usage.as_mut_ptr().cast(), EXPECTED)? };

    if size != EXPECTED {
        return Err(MemInfoError::platform(format!(
            "sysctl vm.swapusage returned {size} bytes, expected {EXPECTED}"
        )));
    }

    // SAFETY: Zeroed up front, and the kernel filled in all of it.
    Ok(unsafe { usage.assume_init() })
}

/// Returns the number of free pages, from the host's VM statistics.
pub(crate) fn free_page_count() -> MemInfoResult<u64> {
    let mut stats = MaybeUninit::<libc::vm_statistics64>::zeroed();
    let mut count = (mem::size_of::<libc::vm_statistics64>() / mem::size_of::<libc::c_int>())
        as libc::mach_msg_type_number_t;

    // SAFETY: Mach API; `stats` is large enough for `count` integers, which is
    // what HOST_VM_INFO64 fills in.
    #[allow(deprecated)]
    let result = unsafe {
        libc::host_statistics64(
            libc::mach_host_self(),
            libc::HOST_VM_INFO64,
            stats.as_mut_ptr().cast(),
            &mut count,
        )
    };

    if result != KERN_SUCCESS {
        return Err(MemInfoError::platform(format!(
            "host_statistics64 failed with kern_return_t {result}"
        )));
    }

    // SAFETY: KERN_SUCCESS means the statistics were written.
    let stats = unsafe { stats.assume_init() };

    Ok(u64::from(stats.free_count))
}

/// Returns the page size the host's VM statistics are counted in. This can
/// differ from the process page size, e.g. for translated binaries.
pub(crate) fn vm_page_size() -> MemInfoResult<u64> {
    let mut page_size: vm_size_t = 0;

    // SAFETY: Mach API; `page_size` is a writable `vm_size_t`.
    #[allow(deprecated)]
    let result = unsafe { host_page_size(libc::mach_host_self(), &mut page_size) };

    if result != KERN_SUCCESS {
        return Err(MemInfoError::platform(format!(
            "host_page_size failed with kern_return_t {result}"
        )));
    }

    Ok(page_size as u64)
}
