//! The host library's side of the slot: every host allocation is routed
//! through a [`HostAllocator`].

use std::ffi::c_void;

use crate::allocators::system;
use crate::features::BridgeFeatures;
use crate::slot::{host_slot, RegistrationSlot};
use crate::vtable::AllocatorFns;

/// Where a host allocation request is served from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// The allocator installed through the bridge.
    Installed,
    /// The host's built-in default.
    BuiltinDefault,
}

/// Dispatches the host's `malloc`-family calls.
///
/// With the bridge enabled, each call reads the slot: if an allocator is
/// installed it is used, otherwise the built-in default serves the call.
/// With the bridge disabled, the slot is never read or written.
#[derive(Clone, Copy, Debug)]
pub struct HostAllocator<'s> {
    slot: &'s RegistrationSlot,
    features: BridgeFeatures,
    default: AllocatorFns,
}

impl HostAllocator<'static> {
    /// The host allocator over the process-wide slot, with the compiled-in
    /// switches and the C library as built-in default.
    pub fn global() -> Self {
        Self::new(host_slot(), BridgeFeatures::COMPILED, system::fns())
    }
}

impl<'s> HostAllocator<'s> {
    /// Build a host allocator over `slot`.
    pub const fn new(
        slot: &'s RegistrationSlot,
        features: BridgeFeatures,
        default: AllocatorFns,
    ) -> Self {
        Self {
            slot,
            features,
            default,
        }
    }

    /// The switches this host was built with.
    pub fn features(&self) -> BridgeFeatures {
        self.features
    }

    /// Where the next call will be served from.
    pub fn route(&self) -> Route {
        if self.features.enabled() && self.slot.is_set() {
            Route::Installed
        } else {
            Route::BuiltinDefault
        }
    }

    #[inline]
    fn target(&self) -> AllocatorFns {
        if !self.features.enabled() {
            return self.default;
        }
        match self.slot.get() {
            Some(fns) => fns,
            None => {
                self.slot.note_default_served();
                self.default
            }
        }
    }

    /// Host `malloc`.
    ///
    /// # Safety
    ///
    /// The `malloc` contract of the routed allocator applies.
    #[allow(unsafe_code)]
    pub unsafe fn malloc(&self, size: usize) -> *mut c_void {
        // SAFETY: forwarded to caller.
        unsafe { self.target().allocate(size) }
    }

    /// Host `calloc`.
    ///
    /// # Safety
    ///
    /// The `calloc` contract of the routed allocator applies.
    #[allow(unsafe_code)]
    pub unsafe fn calloc(&self, count: usize, size: usize) -> *mut c_void {
        // SAFETY: forwarded to caller.
        unsafe { self.target().zero_allocate(count, size) }
    }

    /// Host `realloc`.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a live block from the allocator this host
    /// currently routes to.
    #[allow(unsafe_code)]
    pub unsafe fn realloc(&self, ptr: *mut c_void, size: usize) -> *mut c_void {
        // SAFETY: forwarded to caller.
        unsafe { self.target().reallocate(ptr, size) }
    }

    /// Host `free`.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a live block from the allocator this host
    /// currently routes to.
    #[allow(unsafe_code)]
    pub unsafe fn free(&self, ptr: *mut c_void) {
        // SAFETY: forwarded to caller.
        unsafe { self.target().free(ptr) }
    }
}
