//! Startup registration of the alternate allocator.
//!
//! When both build switches are on, the alternate allocator (mimalloc) is
//! registered with the global bridge before the host's first allocation.
//! When either switch is off, everything here compiles to a no-op and the
//! host keeps its built-in default.

use std::sync::OnceLock;

use crate::bridge::AllocatorBridge;
use crate::error::BridgeError;
use crate::features::BridgeFeatures;
use crate::slot::{host_slot, RegistrationResult, RegistrationSlot};
use crate::vtable::AllocatorVTable;

static STARTUP: OnceLock<Option<RegistrationResult>> = OnceLock::new();

/// Register `vtable` through `bridge` if `features` enables the bridge.
///
/// Returns `None`, without touching the bridge, when disabled.
pub fn register_if_enabled(
    bridge: &AllocatorBridge<'_>,
    features: BridgeFeatures,
    vtable: &AllocatorVTable,
) -> Option<Result<RegistrationResult, BridgeError>> {
    if !features.enabled() {
        log::debug!("allocator bridge disabled ({features:?}); host keeps its default");
        return None;
    }
    Some(bridge.register(vtable))
}

/// Register mimalloc with the global bridge.
#[cfg(all(feature = "host", feature = "mimalloc"))]
pub fn register_alternate_allocator() -> Option<Result<RegistrationResult, BridgeError>> {
    register_if_enabled(
        &AllocatorBridge::global(),
        BridgeFeatures::COMPILED,
        &crate::allocators::mimalloc::vtable(),
    )
}

/// Register the alternate allocator with the global bridge.
///
/// Compiled out: this build lacks the host library or the alternate
/// allocator, so there is nothing to register.
#[cfg(not(all(feature = "host", feature = "mimalloc")))]
pub fn register_alternate_allocator() -> Option<Result<RegistrationResult, BridgeError>> {
    None
}

/// Run [`register_alternate_allocator`] at most once per process.
///
/// Every host entry point calls this before serving its first request,
/// which makes "register before the first host allocation" hold without
/// relying on the embedder's startup order. Later calls return the
/// memoized outcome of the first.
///
/// If another caller won the slot but has not yet published its
/// allocator, this waits for the publication, so the host never serves a
/// request from its default that the installed `free` would later see.
pub fn ensure_registered() -> Option<RegistrationResult> {
    *STARTUP.get_or_init(|| settle(host_slot(), register_alternate_allocator()))
}

/// Reduce a startup outcome, waiting out a concurrent winner's claim
/// window when this registration lost the race.
fn settle(
    slot: &RegistrationSlot,
    outcome: Option<Result<RegistrationResult, BridgeError>>,
) -> Option<RegistrationResult> {
    // Built-in vtables are complete, so the error arm is unreachable.
    let result = outcome?.ok()?;
    if result == RegistrationResult::AlreadyInstalled {
        slot.wait_published();
    }
    Some(result)
}
