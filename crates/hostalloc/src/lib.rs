//! hostalloc: point a host library's allocation hooks at a substitute
//! allocator, once per process.
//!
//! This is the facade crate re-exporting the public API of the hostalloc
//! sub-crates. Enable the `host` and `mimalloc` features together to
//! compile the bridge in; with either off, the host keeps its built-in
//! default allocator and registration is a no-op.
//!
//! # Quick start
//!
//! ```rust
//! use hostalloc::prelude::*;
//! use hostalloc::allocators::system;
//!
//! let slot = RegistrationSlot::new();
//! let bridge = AllocatorBridge::new(&slot);
//! assert_eq!(bridge.register(&system::vtable()), Ok(RegistrationResult::Installed));
//!
//! // A vtable with a missing entry is rejected without touching the slot.
//! let partial = system::vtable().without(AllocatorOp::Free);
//! assert!(matches!(
//!     bridge.register(&partial),
//!     Err(BridgeError::InvalidAllocatorKind { missing: AllocatorOp::Free })
//! ));
//!
//! let host = HostAllocator::new(&slot, BridgeFeatures::ENABLED, system::fns());
//! assert_eq!(host.route(), Route::Installed);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `hostalloc-core` | Slot, bridge, vtables, host dispatch |
//! | [`allocators`] | `hostalloc-core` | Built-in allocator vtables |
//! | [`ffi`] | `hostalloc-ffi` | C ABI and status codes |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types: the registration slot, bridge, vtables and host dispatch
/// (`hostalloc-core`).
pub use hostalloc_core as types;

/// Built-in allocator vtables: the C library, and mimalloc when the
/// `mimalloc` feature is on.
pub use hostalloc_core::allocators;

/// C ABI for embedding (`hostalloc-ffi`).
///
/// See [`ffi::HostAllocStatus`] for the stable status codes.
pub use hostalloc_ffi as ffi;

/// Startup registration of the alternate allocator.
pub use hostalloc_core::startup::{ensure_registered, register_alternate_allocator};

/// Common imports.
///
/// ```rust
/// use hostalloc::prelude::*;
/// ```
pub mod prelude {
    pub use hostalloc_core::{
        AllocatorBridge, AllocatorFns, AllocatorOp, AllocatorVTable, BridgeError,
        BridgeFeatures, HostAllocator, RegistrationResult, RegistrationSlot, Route, SlotState,
    };
    pub use hostalloc_core::startup::ensure_registered;
}
