//! Once-only registration of a substitute allocator into a host library's
//! allocation hooks.
//!
//! A host library (typically a numerical library) consults four hooks for
//! all of its internal allocations: allocate, zero-allocate, reallocate
//! and free. This crate lets a program point those hooks at a different
//! allocator exactly once per process, with well-defined results under
//! repeated and concurrent registration.
//!
//! # Architecture
//!
//! ```text
//! AllocatorVTable ──validate──▶ AllocatorFns
//!                                   │
//! AllocatorBridge::register ──CAS──▶ RegistrationSlot (Unset → Set, terminal)
//!                                   │
//! HostAllocator::{malloc,calloc,realloc,free} ──reads──┘
//!         └── falls back to the built-in default while Unset
//! ```
//!
//! The bridge is compiled in only when both build switches are on
//! (cargo features `host` and `mimalloc`, see [`BridgeFeatures`]).
//! Otherwise the host serves every request from its built-in default and
//! never reads the slot.
//!
//! # Example
//!
//! ```rust
//! use hostalloc_core::allocators::system;
//! use hostalloc_core::{AllocatorBridge, RegistrationResult, RegistrationSlot};
//!
//! let slot = RegistrationSlot::new();
//! let bridge = AllocatorBridge::new(&slot);
//! assert_eq!(bridge.register(&system::vtable()), Ok(RegistrationResult::Installed));
//! assert_eq!(bridge.register(&system::vtable()), Ok(RegistrationResult::AlreadyInstalled));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod allocators;
pub mod bridge;
pub mod error;
pub mod features;
pub mod host;
pub mod slot;
pub mod startup;
pub mod vtable;

#[cfg(test)]
mod testing;

pub use bridge::AllocatorBridge;
pub use error::BridgeError;
pub use features::BridgeFeatures;
pub use host::{HostAllocator, Route};
pub use slot::{host_slot, RegistrationResult, RegistrationSlot, SlotState};
pub use vtable::{
    AllocateFn, AllocatorFns, AllocatorOp, AllocatorVTable, FreeFn, ReallocateFn, ZeroAllocateFn,
};
