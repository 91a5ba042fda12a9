//! Stub allocator families for unit tests.
//!
//! Each family is four functions that count their calls in family-local
//! statics and delegate to the C library. The family-local counters keep
//! function bodies (and therefore addresses) distinct between families.

#![allow(unsafe_code)]

macro_rules! stub_family {
    ($name:ident) => {
        pub(crate) mod $name {
            use std::ffi::c_void;
            use std::sync::atomic::{AtomicUsize, Ordering};

            pub(crate) static CALLS: [AtomicUsize; 4] = [
                AtomicUsize::new(0),
                AtomicUsize::new(0),
                AtomicUsize::new(0),
                AtomicUsize::new(0),
            ];

            pub(crate) unsafe extern "C" fn allocate(size: usize) -> *mut c_void {
                CALLS[0].fetch_add(1, Ordering::Relaxed);
                libc::malloc(size).cast()
            }

            pub(crate) unsafe extern "C" fn zero_allocate(count: usize, size: usize) -> *mut c_void {
                CALLS[1].fetch_add(1, Ordering::Relaxed);
                libc::calloc(count, size).cast()
            }

            pub(crate) unsafe extern "C" fn reallocate(ptr: *mut c_void, size: usize) -> *mut c_void {
                CALLS[2].fetch_add(1, Ordering::Relaxed);
                libc::realloc(ptr.cast(), size).cast()
            }

            pub(crate) unsafe extern "C" fn free(ptr: *mut c_void) {
                CALLS[3].fetch_add(1, Ordering::Relaxed);
                libc::free(ptr.cast())
            }

            pub(crate) fn vtable() -> crate::vtable::AllocatorVTable {
                crate::vtable::AllocatorVTable::new(allocate, zero_allocate, reallocate, free)
            }

            pub(crate) fn calls(op: crate::vtable::AllocatorOp) -> usize {
                CALLS[op.index()].load(Ordering::Relaxed)
            }
        }
    };
}

stub_family!(alpha);
stub_family!(beta);
