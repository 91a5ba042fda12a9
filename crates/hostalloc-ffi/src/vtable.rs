//! C-side allocator vtable.

use std::ffi::c_void;

use hostalloc_core::{AllocatorFns, AllocatorVTable};

/// An allocator's four entry points, as passed from C.
///
/// Every entry must be non-null for registration to succeed. The
/// functions must stay valid, thread-safe and reentrant for the rest of
/// the process once installed.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct HostAllocVTable {
    /// `void *(*)(size_t size)`.
    pub malloc_fn: Option<unsafe extern "C" fn(usize) -> *mut c_void>,
    /// `void *(*)(size_t count, size_t size)`.
    pub calloc_fn: Option<unsafe extern "C" fn(usize, usize) -> *mut c_void>,
    /// `void *(*)(void *ptr, size_t size)`.
    pub realloc_fn: Option<unsafe extern "C" fn(*mut c_void, usize) -> *mut c_void>,
    /// `void (*)(void *ptr)`.
    pub free_fn: Option<unsafe extern "C" fn(*mut c_void)>,
}

// Four nullable function pointers, no padding.
const _: () = assert!(std::mem::size_of::<HostAllocVTable>() == 4 * std::mem::size_of::<usize>());
const _: () = assert!(std::mem::size_of::<HostAllocVTable>() == std::mem::size_of::<AllocatorVTable>());

impl From<HostAllocVTable> for AllocatorVTable {
    fn from(v: HostAllocVTable) -> Self {
        AllocatorVTable {
            allocate: v.malloc_fn,
            zero_allocate: v.calloc_fn,
            reallocate: v.realloc_fn,
            free: v.free_fn,
        }
    }
}

impl From<AllocatorVTable> for HostAllocVTable {
    fn from(v: AllocatorVTable) -> Self {
        HostAllocVTable {
            malloc_fn: v.allocate,
            calloc_fn: v.zero_allocate,
            realloc_fn: v.reallocate,
            free_fn: v.free,
        }
    }
}

impl From<AllocatorFns> for HostAllocVTable {
    fn from(fns: AllocatorFns) -> Self {
        HostAllocVTable::from(AllocatorVTable::from(fns))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostalloc_core::allocators::system;
    use hostalloc_core::AllocatorOp;

    #[test]
    fn null_entries_map_to_missing_ops() {
        let full = HostAllocVTable::from(system::vtable());
        let cases = [
            (HostAllocVTable { malloc_fn: None, ..full }, AllocatorOp::Allocate),
            (HostAllocVTable { calloc_fn: None, ..full }, AllocatorOp::ZeroAllocate),
            (HostAllocVTable { realloc_fn: None, ..full }, AllocatorOp::Reallocate),
            (HostAllocVTable { free_fn: None, ..full }, AllocatorOp::Free),
        ];
        for (c_vt, op) in cases {
            assert!(!AllocatorVTable::from(c_vt).has(op));
        }
    }

    #[test]
    fn fns_convert_to_complete_c_vtable() {
        let c_vt = HostAllocVTable::from(system::fns());
        let fns = AllocatorVTable::from(c_vt).validate().unwrap();
        assert!(fns.same_as(&system::fns()));
    }

    #[test]
    fn default_is_all_null() {
        let v = HostAllocVTable::default();
        assert!(v.malloc_fn.is_none() && v.calloc_fn.is_none());
        assert!(v.realloc_fn.is_none() && v.free_fn.is_none());
    }
}
