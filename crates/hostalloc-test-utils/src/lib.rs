//! Test utilities and recording allocators for hostalloc development.
//!
//! Provides [`TAG_COUNT`] families of tagged allocators. Each family is
//! four distinct `extern "C"` functions that count their calls, remember
//! the last requested size, and delegate to the C library. Distinct
//! families have distinct addresses, so a test can tell which family a
//! slot holds ([`tag_of`]) and which family served a host call
//! ([`CallSnapshot`]).

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::atomic::{AtomicUsize, Ordering};

use hostalloc_core::{AllocatorFns, AllocatorOp, AllocatorVTable};

/// Number of tagged allocator families.
pub const TAG_COUNT: usize = 8;

macro_rules! tagged_family {
    ($name:ident) => {
        #[allow(unsafe_code)]
        mod $name {
            use std::ffi::c_void;
            use std::sync::atomic::{AtomicUsize, Ordering};

            pub(crate) static CALLS: [AtomicUsize; 4] = [
                AtomicUsize::new(0),
                AtomicUsize::new(0),
                AtomicUsize::new(0),
                AtomicUsize::new(0),
            ];
            pub(crate) static LAST_SIZE: AtomicUsize = AtomicUsize::new(0);

            pub(crate) unsafe extern "C" fn allocate(size: usize) -> *mut c_void {
                CALLS[0].fetch_add(1, Ordering::SeqCst);
                LAST_SIZE.store(size, Ordering::SeqCst);
                libc::malloc(size).cast()
            }

            pub(crate) unsafe extern "C" fn zero_allocate(count: usize, size: usize) -> *mut c_void {
                CALLS[1].fetch_add(1, Ordering::SeqCst);
                LAST_SIZE.store(count.saturating_mul(size), Ordering::SeqCst);
                libc::calloc(count, size).cast()
            }

            pub(crate) unsafe extern "C" fn reallocate(ptr: *mut c_void, size: usize) -> *mut c_void {
                CALLS[2].fetch_add(1, Ordering::SeqCst);
                LAST_SIZE.store(size, Ordering::SeqCst);
                libc::realloc(ptr.cast(), size).cast()
            }

            pub(crate) unsafe extern "C" fn free(ptr: *mut c_void) {
                CALLS[3].fetch_add(1, Ordering::SeqCst);
                libc::free(ptr.cast())
            }

            pub(crate) fn vtable() -> hostalloc_core::AllocatorVTable {
                hostalloc_core::AllocatorVTable::new(allocate, zero_allocate, reallocate, free)
            }
        }
    };
}

tagged_family!(tag0);
tagged_family!(tag1);
tagged_family!(tag2);
tagged_family!(tag3);
tagged_family!(tag4);
tagged_family!(tag5);
tagged_family!(tag6);
tagged_family!(tag7);

type Family = (
    &'static [AtomicUsize; 4],
    &'static AtomicUsize,
    AllocatorVTable,
);

fn family(tag: usize) -> Family {
    match tag {
        0 => (&tag0::CALLS, &tag0::LAST_SIZE, tag0::vtable()),
        1 => (&tag1::CALLS, &tag1::LAST_SIZE, tag1::vtable()),
        2 => (&tag2::CALLS, &tag2::LAST_SIZE, tag2::vtable()),
        3 => (&tag3::CALLS, &tag3::LAST_SIZE, tag3::vtable()),
        4 => (&tag4::CALLS, &tag4::LAST_SIZE, tag4::vtable()),
        5 => (&tag5::CALLS, &tag5::LAST_SIZE, tag5::vtable()),
        6 => (&tag6::CALLS, &tag6::LAST_SIZE, tag6::vtable()),
        7 => (&tag7::CALLS, &tag7::LAST_SIZE, tag7::vtable()),
        _ => panic!("tag {tag} out of range (TAG_COUNT = {TAG_COUNT})"),
    }
}

/// The complete vtable of family `tag`.
///
/// # Panics
///
/// Panics if `tag >= TAG_COUNT`.
pub fn tagged_vtable(tag: usize) -> AllocatorVTable {
    family(tag).2
}

/// Validated entry points of family `tag`.
pub fn tagged_fns(tag: usize) -> AllocatorFns {
    tagged_vtable(tag)
        .validate()
        .expect("tagged vtables are complete")
}

/// Number of calls family `tag` has received for `op`.
pub fn calls(tag: usize, op: AllocatorOp) -> usize {
    family(tag).0[op.index()].load(Ordering::SeqCst)
}

/// The size passed to the most recent sizing call of family `tag`.
///
/// For `zero_allocate` this is `count * size`.
pub fn last_size(tag: usize) -> usize {
    family(tag).1.load(Ordering::SeqCst)
}

/// Which tagged family `fns` is, if any.
pub fn tag_of(fns: &AllocatorFns) -> Option<usize> {
    (0..TAG_COUNT).find(|&tag| tagged_fns(tag).same_as(fns))
}

/// Point-in-time copy of every family's call counters.
///
/// Counters are process-global, so tests compare against a snapshot
/// rather than against zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallSnapshot {
    counts: [[usize; 4]; TAG_COUNT],
}

impl CallSnapshot {
    /// Capture all counters now.
    pub fn take() -> Self {
        let mut counts = [[0; 4]; TAG_COUNT];
        for (tag, row) in counts.iter_mut().enumerate() {
            for op in AllocatorOp::ALL {
                row[op.index()] = calls(tag, op);
            }
        }
        Self { counts }
    }

    /// Calls family `tag` received for `op` since this snapshot.
    pub fn delta(&self, tag: usize, op: AllocatorOp) -> usize {
        calls(tag, op) - self.counts[tag][op.index()]
    }

    /// Total calls family `tag` received for any op since this snapshot.
    pub fn total_delta(&self, tag: usize) -> usize {
        AllocatorOp::ALL.iter().map(|&op| self.delta(tag, op)).sum()
    }
}
