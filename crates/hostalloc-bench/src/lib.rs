//! Benchmark fixtures for the hostalloc allocator bridge.
//!
//! - [`installed_host`]: host routed through an installed allocator
//! - [`default_host`]: enabled host with nothing installed
//! - [`disabled_host`]: host with the bridge compiled out

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use hostalloc_core::allocators::system;
use hostalloc_core::{AllocatorBridge, BridgeFeatures, HostAllocator, RegistrationSlot};
use hostalloc_test_utils::fixtures::leak_slot;

/// Host over a fresh slot with the C library installed through the bridge.
pub fn installed_host() -> HostAllocator<'static> {
    let slot = leak_slot();
    // A fresh slot always accepts the complete system vtable.
    let _ = AllocatorBridge::new(slot).register(&system::vtable());
    HostAllocator::new(slot, BridgeFeatures::ENABLED, system::fns())
}

/// Enabled host over a slot that stays unset.
pub fn default_host() -> HostAllocator<'static> {
    HostAllocator::new(leak_slot(), BridgeFeatures::ENABLED, system::fns())
}

/// Host with the bridge compiled out.
pub fn disabled_host() -> HostAllocator<'static> {
    HostAllocator::new(leak_slot(), BridgeFeatures::DISABLED, system::fns())
}

/// A fresh, unset slot for registration benchmarks.
pub fn fresh_slot() -> RegistrationSlot {
    RegistrationSlot::new()
}
