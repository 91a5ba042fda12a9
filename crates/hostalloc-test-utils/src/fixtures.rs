//! Slot and vtable fixtures.

use hostalloc_core::{AllocatorOp, AllocatorVTable, RegistrationSlot};

use crate::tagged_vtable;

/// A fresh slot that lives for the rest of the process.
///
/// For tests that hand the slot to `std::thread::spawn` and need
/// `'static`. Leaks a few bytes per call.
pub fn leak_slot() -> &'static RegistrationSlot {
    Box::leak(Box::new(RegistrationSlot::new()))
}

/// Family `tag`'s vtable with the entries in `missing` cleared.
pub fn partial_vtable(tag: usize, missing: &[AllocatorOp]) -> AllocatorVTable {
    missing
        .iter()
        .fold(tagged_vtable(tag), |vt, &op| vt.without(op))
}

/// Bitmask (bit `op.index()`) to list of missing ops.
pub fn ops_from_mask(mask: u8) -> Vec<AllocatorOp> {
    AllocatorOp::ALL
        .into_iter()
        .filter(|op| mask & (1 << op.index()) != 0)
        .collect()
}
