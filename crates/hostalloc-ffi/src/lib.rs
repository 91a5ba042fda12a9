//! C ABI for the hostalloc allocator bridge.
//!
//! Exposes registration, query, and host-side `malloc`-family entry points
//! to C. A header (`include/hostalloc.h`) is generated by cbindgen at
//! build time. This crate is one of two that may contain `unsafe` code
//! (along with `hostalloc-core`).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

/// Run `$body` (which evaluates to an `i32` status), converting a panic
/// into `HostAllocStatus::Panicked`. Unwinding must not cross `extern "C"`.
macro_rules! ffi_guard {
    ($body:block) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| $body)) {
            Ok(status) => status,
            Err(_) => {
                log::error!("panic caught at the hostalloc FFI boundary");
                $crate::status::HostAllocStatus::Panicked as i32
            }
        }
    };
}

pub mod host;
pub mod register;
pub mod status;
pub mod vtable;

pub use status::HostAllocStatus;
pub use vtable::HostAllocVTable;
