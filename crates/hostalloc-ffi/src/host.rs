//! Host-facing allocation entry points.
//!
//! The host library calls these for every internal allocation instead of
//! its own `malloc` family. Each call first makes sure startup
//! registration has run, then routes to the installed allocator, or to
//! the C library while nothing is installed or the bridge is compiled out.
//!
//! These are on the allocation hot path: no panic guard, no logging.

use std::ffi::c_void;

use hostalloc_core::startup::ensure_registered;
use hostalloc_core::HostAllocator;

#[inline]
fn host() -> HostAllocator<'static> {
    ensure_registered();
    HostAllocator::global()
}

/// Host `malloc`.
///
/// # Safety
///
/// Standard `malloc` contract.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn hostalloc_malloc(size: usize) -> *mut c_void {
    // SAFETY: forwarded to caller.
    unsafe { host().malloc(size) }
}

/// Host `calloc`.
///
/// # Safety
///
/// Standard `calloc` contract.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn hostalloc_calloc(count: usize, size: usize) -> *mut c_void {
    // SAFETY: forwarded to caller.
    unsafe { host().calloc(count, size) }
}

/// Host `realloc`.
///
/// # Safety
///
/// `ptr` must be null or a live block returned by these entry points.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn hostalloc_realloc(ptr: *mut c_void, size: usize) -> *mut c_void {
    // SAFETY: forwarded to caller.
    unsafe { host().realloc(ptr, size) }
}

/// Host `free`.
///
/// # Safety
///
/// `ptr` must be null or a live block returned by these entry points.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn hostalloc_free(ptr: *mut c_void) {
    // SAFETY: forwarded to caller.
    unsafe { host().free(ptr) }
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;

    #[test]
    fn malloc_realloc_free_cycle() {
        unsafe {
            let p = hostalloc_malloc(24).cast::<u8>();
            assert!(!p.is_null());
            p.write_bytes(0xAB, 24);
            let q = hostalloc_realloc(p.cast(), 1024).cast::<u8>();
            assert!(!q.is_null());
            assert!(std::slice::from_raw_parts(q, 24).iter().all(|&b| b == 0xAB));
            hostalloc_free(q.cast());
        }
    }

    #[test]
    fn calloc_zeroes() {
        unsafe {
            let p = hostalloc_calloc(32, 4).cast::<u8>();
            assert!(!p.is_null());
            assert!(std::slice::from_raw_parts(p, 128).iter().all(|&b| b == 0));
            hostalloc_free(p.cast());
        }
    }

    #[test]
    fn free_null_is_noop() {
        unsafe { hostalloc_free(std::ptr::null_mut()) };
    }
}
