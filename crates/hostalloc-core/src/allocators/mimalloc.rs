//! The mimalloc allocator, via `libmimalloc-sys`.

#![allow(unsafe_code)]

use std::ffi::c_void;

use libmimalloc_sys as ffi;

use crate::vtable::{AllocatorFns, AllocatorVTable};

unsafe extern "C" fn mi_malloc(size: usize) -> *mut c_void {
    ffi::mi_malloc(size).cast()
}

unsafe extern "C" fn mi_calloc(count: usize, size: usize) -> *mut c_void {
    ffi::mi_calloc(count, size).cast()
}

unsafe extern "C" fn mi_realloc(ptr: *mut c_void, size: usize) -> *mut c_void {
    ffi::mi_realloc(ptr.cast(), size).cast()
}

unsafe extern "C" fn mi_free(ptr: *mut c_void) {
    ffi::mi_free(ptr.cast())
}

const FNS: AllocatorFns = AllocatorFns::new(mi_malloc, mi_calloc, mi_realloc, mi_free);

/// mimalloc as validated entry points.
pub const fn fns() -> AllocatorFns {
    FNS
}

/// mimalloc as a vtable.
pub fn vtable() -> AllocatorVTable {
    AllocatorVTable::from(FNS)
}
