//! Ready-made allocator vtables.
//!
//! - [`system`]: the C library's `malloc` family. This is the host's
//!   built-in default.
//! - `mimalloc` (cargo feature `mimalloc`): the alternate allocator.

#[cfg(feature = "mimalloc")]
pub mod mimalloc;
pub mod system;
