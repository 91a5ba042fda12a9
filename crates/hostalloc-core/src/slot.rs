//! The registration slot: process-wide, written once, read on every
//! host allocation.
//!
//! The slot's lifecycle is a three-value atomic flag:
//!
//! ```text
//! UNSET ──CAS (one winner)──▶ CLAIMED ──write fns, Release──▶ SET
//! ```
//!
//! Exactly one `try_install` wins the compare-and-set and is the only
//! writer of the function pointers. Losers return immediately without
//! touching the pointers and without waiting for the winner to publish.
//! Readers load the flag with `Acquire` and read the pointers only after
//! observing `SET`, so a half-written vtable is never visible. `CLAIMED`
//! is reported to readers as [`SlotState::Unset`]; callers that must not
//! fall back to the default during that window use
//! [`RegistrationSlot::wait_published`].

#![allow(unsafe_code)]

use std::cell::UnsafeCell;
use std::fmt;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use crate::vtable::AllocatorFns;

const UNSET: u8 = 0;
const CLAIMED: u8 = 1;
const SET: u8 = 2;

/// Outcome of an installation attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrationResult {
    /// This call won and its allocator is now active.
    Installed,
    /// An allocator was already installed (or is being installed by a
    /// concurrent winner); this call's vtable was discarded.
    AlreadyInstalled,
}

/// Observable lifecycle state of a [`RegistrationSlot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotState {
    /// No allocator is visible; the host uses its built-in default.
    Unset,
    /// An allocator is installed. Terminal.
    Set,
}

/// Once-only storage for the allocator the host routes through.
///
/// There is no way to clear or replace the contents: pointers handed out
/// by one allocator must never reach another allocator's `free`.
pub struct RegistrationSlot {
    state: AtomicU8,
    fns: UnsafeCell<MaybeUninit<AllocatorFns>>,
    /// Set by the host when it serves a request from its built-in default
    /// while the slot is unset.
    default_served: AtomicBool,
}

// SAFETY: `fns` is written exactly once, by the thread that won the
// UNSET -> CLAIMED compare-and-set, and only read after the SET store
// (Release) is observed with an Acquire load. `AllocatorFns` is `Copy`
// plain data (function pointers).
unsafe impl Sync for RegistrationSlot {}

static HOST_SLOT: RegistrationSlot = RegistrationSlot::new();

/// The process-wide slot consulted by [`HostAllocator::global`](crate::HostAllocator::global).
pub fn host_slot() -> &'static RegistrationSlot {
    &HOST_SLOT
}

impl RegistrationSlot {
    /// Create an unset slot.
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(UNSET),
            fns: UnsafeCell::new(MaybeUninit::uninit()),
            default_served: AtomicBool::new(false),
        }
    }

    /// Install `fns` if the slot is unset.
    ///
    /// A single compare-and-set decides the winner. Never blocks.
    pub fn try_install(&self, fns: AllocatorFns) -> RegistrationResult {
        if self
            .state
            .compare_exchange(UNSET, CLAIMED, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return RegistrationResult::AlreadyInstalled;
        }

        // SAFETY: we won the CAS, so no other thread writes `fns`, and no
        // reader touches it until it observes SET below.
        unsafe { (*self.fns.get()).write(fns) };
        self.state.store(SET, Ordering::Release);
        RegistrationResult::Installed
    }

    /// The installed allocator, or `None` while the slot is unset.
    #[inline]
    pub fn get(&self) -> Option<AllocatorFns> {
        if self.state.load(Ordering::Acquire) != SET {
            return None;
        }
        // SAFETY: SET is only stored after `fns` was initialised, and the
        // Acquire load above synchronises with that Release store. `fns`
        // is never written again.
        Some(unsafe { (*self.fns.get()).assume_init_read() })
    }

    /// Wait out an install that has been claimed but not yet published.
    ///
    /// Returns the installed allocator once visible, or `None` straight
    /// away if nothing has claimed the slot. Spins for at most the
    /// winner's single write of the four entries.
    pub fn wait_published(&self) -> Option<AllocatorFns> {
        loop {
            match self.state.load(Ordering::Acquire) {
                CLAIMED => std::hint::spin_loop(),
                SET => return self.get(),
                _ => return None,
            }
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SlotState {
        match self.state.load(Ordering::Acquire) {
            SET => SlotState::Set,
            _ => SlotState::Unset,
        }
    }

    /// Returns `true` once an allocator is installed and visible.
    pub fn is_set(&self) -> bool {
        self.state() == SlotState::Set
    }

    /// Record that the host served an allocation from its built-in default.
    pub(crate) fn note_default_served(&self) {
        if !self.default_served.load(Ordering::Relaxed) {
            self.default_served.store(true, Ordering::Relaxed);
        }
    }

    /// Returns `true` if the host has served any allocation from its
    /// built-in default through this slot.
    pub fn default_served(&self) -> bool {
        self.default_served.load(Ordering::Relaxed)
    }
}

impl Default for RegistrationSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RegistrationSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationSlot")
            .field("state", &self.state())
            .field("installed", &self.get())
            .field("default_served", &self.default_served())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{alpha, beta};

    #[test]
    fn new_slot_is_unset() {
        let slot = RegistrationSlot::new();
        assert_eq!(slot.state(), SlotState::Unset);
        assert!(slot.get().is_none());
        assert!(!slot.default_served());
    }

    #[test]
    fn first_install_wins() {
        let slot = RegistrationSlot::new();
        let a = alpha::vtable().validate().unwrap();
        let b = beta::vtable().validate().unwrap();

        assert_eq!(slot.try_install(a), RegistrationResult::Installed);
        assert_eq!(slot.try_install(b), RegistrationResult::AlreadyInstalled);
        assert_eq!(slot.try_install(a), RegistrationResult::AlreadyInstalled);

        assert_eq!(slot.state(), SlotState::Set);
        assert!(slot.get().unwrap().same_as(&a));
    }

    #[test]
    fn claimed_slot_reads_as_unset_and_rejects() {
        let slot = RegistrationSlot::new();
        // Simulate a winner that has claimed but not yet published.
        slot.state.store(CLAIMED, Ordering::Relaxed);

        assert_eq!(slot.state(), SlotState::Unset);
        assert!(slot.get().is_none());
        let a = alpha::vtable().validate().unwrap();
        assert_eq!(slot.try_install(a), RegistrationResult::AlreadyInstalled);
    }

    #[test]
    fn wait_published_returns_immediately_when_unset_or_set() {
        let slot = RegistrationSlot::new();
        assert!(slot.wait_published().is_none());

        let a = alpha::vtable().validate().unwrap();
        slot.try_install(a);
        assert!(slot.wait_published().unwrap().same_as(&a));
    }

    #[test]
    fn wait_published_outlasts_claim_window() {
        let slot = RegistrationSlot::new();
        let a = alpha::vtable().validate().unwrap();
        let b = beta::vtable().validate().unwrap();
        // A winner that has claimed but not yet published.
        slot.state.store(CLAIMED, Ordering::Relaxed);

        std::thread::scope(|s| {
            let waiter = s.spawn(|| {
                // Losing the race must not leave this caller on the default.
                assert_eq!(slot.try_install(b), RegistrationResult::AlreadyInstalled);
                slot.wait_published()
            });

            std::thread::sleep(std::time::Duration::from_millis(20));
            unsafe { (*slot.fns.get()).write(a) };
            slot.state.store(SET, Ordering::Release);

            let seen = waiter.join().unwrap().expect("published allocator");
            assert!(seen.same_as(&a));
        });
    }

    #[test]
    fn default_served_is_sticky() {
        let slot = RegistrationSlot::new();
        slot.note_default_served();
        slot.note_default_served();
        assert!(slot.default_served());
    }

    #[test]
    fn global_slot_is_one_instance() {
        assert!(std::ptr::eq(host_slot(), host_slot()));
    }

    #[test]
    fn debug_shows_state() {
        let slot = RegistrationSlot::new();
        let s = format!("{slot:?}");
        assert!(s.contains("Unset"), "{s}");
    }
}
