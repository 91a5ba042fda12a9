//! Error types for allocator registration.
//!
//! Registration has a single failure mode: the supplied vtable is
//! incomplete. A repeated registration is not an error and is reported
//! through [`RegistrationResult::AlreadyInstalled`](crate::RegistrationResult).

use std::error::Error;
use std::fmt;

use crate::vtable::AllocatorOp;

/// Errors from [`AllocatorBridge::register`](crate::AllocatorBridge::register).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BridgeError {
    /// One of the vtable's four entries is missing (`HOSTALLOC_INVALID_ALLOCATOR_KIND`).
    ///
    /// Nothing is written to the slot when this is returned.
    InvalidAllocatorKind {
        /// The first missing operation, in [`AllocatorOp::ALL`] order.
        missing: AllocatorOp,
    },
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAllocatorKind { missing } => {
                write!(f, "invalid allocator: missing '{missing}' entry point")
            }
        }
    }
}

impl Error for BridgeError {}
