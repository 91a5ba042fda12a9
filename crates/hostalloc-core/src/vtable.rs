//! Allocator vtables: the four-entry capability set an allocator exposes.
//!
//! [`AllocatorVTable`] is the caller-facing form. Each entry is an
//! `Option` so a missing (null) function pointer can be represented and
//! rejected. [`AllocatorFns`] is the validated form, the only one a
//! [`RegistrationSlot`](crate::slot::RegistrationSlot) accepts.

use std::ffi::c_void;
use std::fmt;

use crate::error::BridgeError;

/// `malloc`-shaped entry point: `(size) -> pointer`.
pub type AllocateFn = unsafe extern "C" fn(size: usize) -> *mut c_void;

/// `calloc`-shaped entry point: `(count, size) -> zeroed pointer`.
pub type ZeroAllocateFn = unsafe extern "C" fn(count: usize, size: usize) -> *mut c_void;

/// `realloc`-shaped entry point: `(pointer, new_size) -> pointer`.
pub type ReallocateFn = unsafe extern "C" fn(ptr: *mut c_void, size: usize) -> *mut c_void;

/// `free`-shaped entry point: `(pointer)`.
pub type FreeFn = unsafe extern "C" fn(ptr: *mut c_void);

/// One of the four operations an allocator must supply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AllocatorOp {
    /// `allocate(size)`.
    Allocate,
    /// `zero_allocate(count, size)`.
    ZeroAllocate,
    /// `reallocate(ptr, size)`.
    Reallocate,
    /// `free(ptr)`.
    Free,
}

impl AllocatorOp {
    /// All four operations, in validation order.
    pub const ALL: [AllocatorOp; 4] = [
        AllocatorOp::Allocate,
        AllocatorOp::ZeroAllocate,
        AllocatorOp::Reallocate,
        AllocatorOp::Free,
    ];

    /// Position of this operation in [`ALL`](Self::ALL).
    pub const fn index(self) -> usize {
        match self {
            AllocatorOp::Allocate => 0,
            AllocatorOp::ZeroAllocate => 1,
            AllocatorOp::Reallocate => 2,
            AllocatorOp::Free => 3,
        }
    }
}

impl fmt::Display for AllocatorOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allocate => write!(f, "allocate"),
            Self::ZeroAllocate => write!(f, "zero_allocate"),
            Self::Reallocate => write!(f, "reallocate"),
            Self::Free => write!(f, "free"),
        }
    }
}

/// An allocator's four entry points as supplied by the caller.
///
/// Any entry may be `None`; [`validate`](Self::validate) rejects such a
/// vtable before anything is installed.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct AllocatorVTable {
    /// `malloc`-shaped entry point.
    pub allocate: Option<AllocateFn>,
    /// `calloc`-shaped entry point.
    pub zero_allocate: Option<ZeroAllocateFn>,
    /// `realloc`-shaped entry point.
    pub reallocate: Option<ReallocateFn>,
    /// `free`-shaped entry point.
    pub free: Option<FreeFn>,
}

impl AllocatorVTable {
    /// Build a vtable with all four entries present.
    pub const fn new(
        allocate: AllocateFn,
        zero_allocate: ZeroAllocateFn,
        reallocate: ReallocateFn,
        free: FreeFn,
    ) -> Self {
        Self {
            allocate: Some(allocate),
            zero_allocate: Some(zero_allocate),
            reallocate: Some(reallocate),
            free: Some(free),
        }
    }

    /// Returns `true` if the entry for `op` is present.
    pub fn has(&self, op: AllocatorOp) -> bool {
        match op {
            AllocatorOp::Allocate => self.allocate.is_some(),
            AllocatorOp::ZeroAllocate => self.zero_allocate.is_some(),
            AllocatorOp::Reallocate => self.reallocate.is_some(),
            AllocatorOp::Free => self.free.is_some(),
        }
    }

    /// Return a copy with the entry for `op` cleared.
    pub fn without(mut self, op: AllocatorOp) -> Self {
        match op {
            AllocatorOp::Allocate => self.allocate = None,
            AllocatorOp::ZeroAllocate => self.zero_allocate = None,
            AllocatorOp::Reallocate => self.reallocate = None,
            AllocatorOp::Free => self.free = None,
        }
        self
    }

    /// Check that all four entries are present.
    ///
    /// Entries are checked in [`AllocatorOp::ALL`] order; the first missing
    /// one is reported.
    pub fn validate(&self) -> Result<AllocatorFns, BridgeError> {
        let missing = |op| BridgeError::InvalidAllocatorKind { missing: op };
        Ok(AllocatorFns {
            allocate: self.allocate.ok_or(missing(AllocatorOp::Allocate))?,
            zero_allocate: self.zero_allocate.ok_or(missing(AllocatorOp::ZeroAllocate))?,
            reallocate: self.reallocate.ok_or(missing(AllocatorOp::Reallocate))?,
            free: self.free.ok_or(missing(AllocatorOp::Free))?,
        })
    }
}

impl From<AllocatorFns> for AllocatorVTable {
    fn from(fns: AllocatorFns) -> Self {
        Self::new(fns.allocate, fns.zero_allocate, fns.reallocate, fns.free)
    }
}

/// A validated allocator: all four entry points are present.
#[derive(Clone, Copy, Debug)]
pub struct AllocatorFns {
    allocate: AllocateFn,
    zero_allocate: ZeroAllocateFn,
    reallocate: ReallocateFn,
    free: FreeFn,
}

impl AllocatorFns {
    /// Bundle four entry points.
    pub const fn new(
        allocate: AllocateFn,
        zero_allocate: ZeroAllocateFn,
        reallocate: ReallocateFn,
        free: FreeFn,
    ) -> Self {
        Self {
            allocate,
            zero_allocate,
            reallocate,
            free,
        }
    }

    /// Call the `allocate` entry.
    ///
    /// # Safety
    ///
    /// The allocator's own contract for `malloc`-style calls applies.
    #[allow(unsafe_code)]
    #[inline]
    pub unsafe fn allocate(&self, size: usize) -> *mut c_void {
        // SAFETY: forwarded to caller.
        unsafe { (self.allocate)(size) }
    }

    /// Call the `zero_allocate` entry.
    ///
    /// # Safety
    ///
    /// The allocator's own contract for `calloc`-style calls applies.
    #[allow(unsafe_code)]
    #[inline]
    pub unsafe fn zero_allocate(&self, count: usize, size: usize) -> *mut c_void {
        // SAFETY: forwarded to caller.
        unsafe { (self.zero_allocate)(count, size) }
    }

    /// Call the `reallocate` entry.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a live pointer obtained from this allocator.
    #[allow(unsafe_code)]
    #[inline]
    pub unsafe fn reallocate(&self, ptr: *mut c_void, size: usize) -> *mut c_void {
        // SAFETY: forwarded to caller.
        unsafe { (self.reallocate)(ptr, size) }
    }

    /// Call the `free` entry.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a live pointer obtained from this allocator,
    /// and must not be used afterwards.
    #[allow(unsafe_code)]
    #[inline]
    pub unsafe fn free(&self, ptr: *mut c_void) {
        // SAFETY: forwarded to caller.
        unsafe { (self.free)(ptr) }
    }

    /// Entry-point addresses in [`AllocatorOp::ALL`] order.
    pub fn addresses(&self) -> [usize; 4] {
        [
            self.allocate as usize,
            self.zero_allocate as usize,
            self.reallocate as usize,
            self.free as usize,
        ]
    }

    /// Returns `true` if both bundles point at the same four functions.
    pub fn same_as(&self, other: &AllocatorFns) -> bool {
        self.addresses() == other.addresses()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{alpha, beta};

    #[test]
    fn full_vtable_validates() {
        let fns = alpha::vtable().validate().unwrap();
        assert!(fns.same_as(&alpha::vtable().validate().unwrap()));
    }

    #[test]
    fn distinct_families_are_not_the_same() {
        let a = alpha::vtable().validate().unwrap();
        let b = beta::vtable().validate().unwrap();
        assert!(!a.same_as(&b));
    }

    #[test]
    fn default_vtable_reports_allocate_first() {
        assert_eq!(
            AllocatorVTable::default().validate().unwrap_err(),
            BridgeError::InvalidAllocatorKind {
                missing: AllocatorOp::Allocate
            }
        );
    }

    #[test]
    fn each_missing_entry_is_named() {
        for op in AllocatorOp::ALL {
            let vt = alpha::vtable().without(op);
            assert!(!vt.has(op));
            assert_eq!(
                vt.validate().unwrap_err(),
                BridgeError::InvalidAllocatorKind { missing: op }
            );
        }
    }

    #[test]
    #[allow(unsafe_code)]
    fn fns_call_through_to_entries() {
        let fns = beta::vtable().validate().unwrap();
        let before = beta::calls(AllocatorOp::ZeroAllocate);
        unsafe {
            let p = fns.zero_allocate(4, 16).cast::<u8>();
            assert!(!p.is_null());
            assert!(std::slice::from_raw_parts(p, 64).iter().all(|&b| b == 0));
            fns.free(p.cast());
        }
        assert!(beta::calls(AllocatorOp::ZeroAllocate) > before);
    }

    #[test]
    fn op_index_matches_all_order() {
        for (i, op) in AllocatorOp::ALL.iter().enumerate() {
            assert_eq!(op.index(), i);
        }
    }

    #[test]
    fn op_display_names() {
        assert_eq!(AllocatorOp::ZeroAllocate.to_string(), "zero_allocate");
        assert_eq!(AllocatorOp::Free.to_string(), "free");
    }
}
