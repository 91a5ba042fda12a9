//! C-compatible status codes.
//!
//! [`HostAllocStatus`] is a `repr(i32)` enum returned by every
//! registration and query entry point. `Ok` is 0, informational outcomes
//! are positive, errors are negative.

use hostalloc_core::{BridgeError, RegistrationResult};

/// C-compatible status code. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostAllocStatus {
    /// Success. For registration: this call installed its allocator.
    Ok = 0,
    /// An allocator was already installed; this call's vtable was discarded.
    AlreadyInstalled = 1,
    /// One of the vtable's four entry points is null.
    InvalidAllocatorKind = -1,
    /// A pointer argument is null.
    InvalidArgument = -2,
    /// The bridge is compiled out: the host library or the alternate
    /// allocator is absent from this build.
    Disabled = -3,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<RegistrationResult> for HostAllocStatus {
    fn from(r: RegistrationResult) -> Self {
        match r {
            RegistrationResult::Installed => HostAllocStatus::Ok,
            RegistrationResult::AlreadyInstalled => HostAllocStatus::AlreadyInstalled,
        }
    }
}

impl From<&BridgeError> for HostAllocStatus {
    fn from(e: &BridgeError) -> Self {
        match e {
            BridgeError::InvalidAllocatorKind { .. } => HostAllocStatus::InvalidAllocatorKind,
        }
    }
}

impl From<Result<RegistrationResult, BridgeError>> for HostAllocStatus {
    fn from(r: Result<RegistrationResult, BridgeError>) -> Self {
        match r {
            Ok(r) => HostAllocStatus::from(r),
            Err(e) => HostAllocStatus::from(&e),
        }
    }
}
