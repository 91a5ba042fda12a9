//! The C library allocator.

#![allow(unsafe_code)]

use std::ffi::c_void;

use crate::vtable::{AllocatorFns, AllocatorVTable};

unsafe extern "C" fn system_malloc(size: usize) -> *mut c_void {
    libc::malloc(size).cast()
}

unsafe extern "C" fn system_calloc(count: usize, size: usize) -> *mut c_void {
    libc::calloc(count, size).cast()
}

unsafe extern "C" fn system_realloc(ptr: *mut c_void, size: usize) -> *mut c_void {
    libc::realloc(ptr.cast(), size).cast()
}

unsafe extern "C" fn system_free(ptr: *mut c_void) {
    libc::free(ptr.cast())
}

const FNS: AllocatorFns = AllocatorFns::new(system_malloc, system_calloc, system_realloc, system_free);

/// The C library allocator as validated entry points.
pub const fn fns() -> AllocatorFns {
    FNS
}

/// The C library allocator as a vtable.
pub fn vtable() -> AllocatorVTable {
    AllocatorVTable::from(FNS)
}
