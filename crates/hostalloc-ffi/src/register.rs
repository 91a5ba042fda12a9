//! Registration and query entry points.
//!
//! All functions act on the process-wide host slot. Registration is
//! at-most-once: the first successful call returns `HOSTALLOC_STATUS_OK`,
//! later calls return `HOSTALLOC_STATUS_ALREADY_INSTALLED`.

use hostalloc_core::startup::register_alternate_allocator;
use hostalloc_core::{AllocatorBridge, AllocatorVTable, BridgeFeatures};

use crate::status::HostAllocStatus;
use crate::vtable::HostAllocVTable;

/// Register through `bridge`, honoring `features`. Shared by the exported
/// entry point and tests that use a private slot.
pub(crate) fn register_with(
    bridge: &AllocatorBridge<'_>,
    features: BridgeFeatures,
    vtable: Option<&HostAllocVTable>,
) -> HostAllocStatus {
    let Some(vtable) = vtable else {
        return HostAllocStatus::InvalidArgument;
    };
    if !features.enabled() {
        return HostAllocStatus::Disabled;
    }
    HostAllocStatus::from(bridge.register(&AllocatorVTable::from(*vtable)))
}

/// Install `vtable` as the host allocator.
///
/// Returns `HOSTALLOC_STATUS_OK` if this call installed it,
/// `HOSTALLOC_STATUS_ALREADY_INSTALLED` if an allocator was already
/// installed (the argument is discarded), `HOSTALLOC_STATUS_INVALID_ALLOCATOR_KIND`
/// if any entry is null, `HOSTALLOC_STATUS_INVALID_ARGUMENT` if `vtable`
/// is null, and `HOSTALLOC_STATUS_DISABLED` if the bridge is compiled out.
///
/// Must be called before the host's first allocation.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn hostalloc_register(vtable: *const HostAllocVTable) -> i32 {
    ffi_guard!({
        // SAFETY: vtable is null or points to a valid HostAllocVTable per caller contract.
        let vtable = unsafe { vtable.as_ref() };
        register_with(&AllocatorBridge::global(), BridgeFeatures::COMPILED, vtable) as i32
    })
}

/// Install the alternate allocator (mimalloc) compiled into this build.
///
/// Same return codes as [`hostalloc_register`]. Returns
/// `HOSTALLOC_STATUS_DISABLED` when the host library or mimalloc is not
/// compiled in.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn hostalloc_register_default() -> i32 {
    ffi_guard!({
        match register_alternate_allocator() {
            Some(result) => HostAllocStatus::from(result) as i32,
            None => HostAllocStatus::Disabled as i32,
        }
    })
}

/// Returns 1 if an allocator is installed, 0 otherwise.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn hostalloc_is_installed() -> i32 {
    ffi_guard!({ i32::from(AllocatorBridge::global().is_installed()) })
}

/// Copy the installed allocator's entry points into `out`.
///
/// Writes all-null entries if nothing is installed. Returns
/// `HOSTALLOC_STATUS_INVALID_ARGUMENT` if `out` is null.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn hostalloc_installed_vtable(out: *mut HostAllocVTable) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return HostAllocStatus::InvalidArgument as i32;
        }
        let vtable = AllocatorBridge::global()
            .installed()
            .map(HostAllocVTable::from)
            .unwrap_or_default();
        // SAFETY: out is non-null and valid for writes per caller contract.
        unsafe { out.write(vtable) };
        HostAllocStatus::Ok as i32
    })
}
