//! The allocator bridge: validates a vtable and installs it into a slot.

use crate::error::BridgeError;
use crate::slot::{host_slot, RegistrationResult, RegistrationSlot};
use crate::vtable::{AllocatorFns, AllocatorVTable};

/// Installs a caller-supplied allocator into a [`RegistrationSlot`], at
/// most once.
///
/// The first successful [`register`](Self::register) wins; every later
/// call returns [`RegistrationResult::AlreadyInstalled`] and leaves the
/// original allocator active. There is no uninstall.
#[derive(Clone, Copy, Debug)]
pub struct AllocatorBridge<'s> {
    slot: &'s RegistrationSlot,
}

impl AllocatorBridge<'static> {
    /// The bridge bound to the process-wide host slot.
    pub fn global() -> Self {
        Self::new(host_slot())
    }
}

impl<'s> AllocatorBridge<'s> {
    /// Bind a bridge to `slot`.
    pub const fn new(slot: &'s RegistrationSlot) -> Self {
        Self { slot }
    }

    /// Install `vtable` if nothing is installed yet.
    ///
    /// Fails with [`BridgeError::InvalidAllocatorKind`] if any entry is
    /// missing; the slot is left untouched in that case, whatever its
    /// state. Safe to call concurrently: exactly one caller observes
    /// `Installed`.
    pub fn register(&self, vtable: &AllocatorVTable) -> Result<RegistrationResult, BridgeError> {
        let fns = vtable.validate()?;
        let result = self.slot.try_install(fns);
        match result {
            RegistrationResult::Installed => {
                if self.slot.default_served() {
                    log::warn!(
                        "allocator installed after the host already allocated from its \
                         built-in default; earlier blocks must not reach the new free()"
                    );
                }
                log::debug!("allocator installed: {:#x?}", fns.addresses());
            }
            RegistrationResult::AlreadyInstalled => {
                log::debug!("allocator already installed; discarding {:#x?}", fns.addresses());
            }
        }
        Ok(result)
    }

    /// Returns `true` once an allocator is installed.
    pub fn is_installed(&self) -> bool {
        self.slot.is_set()
    }

    /// The installed allocator, if any.
    pub fn installed(&self) -> Option<AllocatorFns> {
        self.slot.get()
    }

    /// The slot this bridge writes to.
    pub fn slot(&self) -> &'s RegistrationSlot {
        self.slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;
    use crate::slot::SlotState;
    use crate::testing::{alpha, beta};
    use crate::vtable::AllocatorOp;

    #[test]
    fn register_then_already_installed() {
        let slot = RegistrationSlot::new();
        let bridge = AllocatorBridge::new(&slot);

        assert_eq!(bridge.register(&alpha::vtable()), Ok(RegistrationResult::Installed));
        assert_eq!(
            bridge.register(&beta::vtable()),
            Ok(RegistrationResult::AlreadyInstalled)
        );
        assert!(bridge.is_installed());
        let installed = bridge.installed().unwrap();
        assert!(installed.same_as(&alpha::vtable().validate().unwrap()));
    }

    #[test]
    fn invalid_vtable_leaves_unset_slot_unset() {
        let slot = RegistrationSlot::new();
        let bridge = AllocatorBridge::new(&slot);

        let err = bridge
            .register(&alpha::vtable().without(AllocatorOp::Reallocate))
            .unwrap_err();
        assert_eq!(
            err,
            BridgeError::InvalidAllocatorKind {
                missing: AllocatorOp::Reallocate
            }
        );
        assert_eq!(slot.state(), SlotState::Unset);

        // The slot is still claimable after a rejected attempt.
        assert_eq!(bridge.register(&beta::vtable()), Ok(RegistrationResult::Installed));
    }

    #[test]
    fn invalid_vtable_leaves_set_slot_unchanged() {
        let slot = RegistrationSlot::new();
        let bridge = AllocatorBridge::new(&slot);
        bridge.register(&alpha::vtable()).unwrap();

        assert!(bridge
            .register(&beta::vtable().without(AllocatorOp::Free))
            .is_err());
        assert!(bridge
            .installed()
            .unwrap()
            .same_as(&alpha::vtable().validate().unwrap()));
    }

    #[test]
    fn invalid_vtable_is_reported_before_already_installed() {
        let slot = RegistrationSlot::new();
        let bridge = AllocatorBridge::new(&slot);
        bridge.register(&alpha::vtable()).unwrap();

        assert!(matches!(
            bridge.register(&AllocatorVTable::default()),
            Err(BridgeError::InvalidAllocatorKind { .. })
        ));
    }

    mod late_registration_log {
        use std::sync::{Mutex, Once};
        use std::thread::{self, ThreadId};

        use log::{Level, LevelFilter, Log, Metadata, Record};

        use super::*;
        use crate::allocators::system;
        use crate::features::BridgeFeatures;
        use crate::host::HostAllocator;

        /// Records every log line with the thread that emitted it, so
        /// tests running in parallel only count their own.
        struct Capture;

        static RECORDS: Mutex<Vec<(ThreadId, Level)>> = Mutex::new(Vec::new());
        static CAPTURE: Capture = Capture;
        static INSTALL: Once = Once::new();

        impl Log for Capture {
            fn enabled(&self, _: &Metadata<'_>) -> bool {
                true
            }

            fn log(&self, record: &Record<'_>) {
                RECORDS
                    .lock()
                    .unwrap()
                    .push((thread::current().id(), record.level()));
            }

            fn flush(&self) {}
        }

        fn install() {
            INSTALL.call_once(|| {
                log::set_logger(&CAPTURE).unwrap();
                log::set_max_level(LevelFilter::Trace);
            });
        }

        fn warnings_here() -> usize {
            let me = thread::current().id();
            RECORDS
                .lock()
                .unwrap()
                .iter()
                .filter(|(id, level)| *id == me && *level == Level::Warn)
                .count()
        }

        #[test]
        #[allow(unsafe_code)]
        fn warns_once_when_default_already_served() {
            install();
            let slot = RegistrationSlot::new();
            let host = HostAllocator::new(&slot, BridgeFeatures::ENABLED, system::fns());
            unsafe { host.free(host.malloc(32)) };

            let before = warnings_here();
            assert_eq!(
                AllocatorBridge::new(&slot).register(&alpha::vtable()),
                Ok(RegistrationResult::Installed)
            );
            assert_eq!(warnings_here() - before, 1);

            // The discarded repeat is not a late registration.
            AllocatorBridge::new(&slot)
                .register(&beta::vtable())
                .unwrap();
            assert_eq!(warnings_here() - before, 1);
        }

        #[test]
        #[allow(unsafe_code)]
        fn no_warning_when_registered_first() {
            install();
            let slot = RegistrationSlot::new();
            let before = warnings_here();
            AllocatorBridge::new(&slot)
                .register(&alpha::vtable())
                .unwrap();

            let host = HostAllocator::new(&slot, BridgeFeatures::ENABLED, system::fns());
            unsafe { host.free(host.malloc(32)) };
            assert_eq!(warnings_here(), before);
        }
    }

    #[test]
    fn global_bridge_targets_host_slot() {
        assert!(std::ptr::eq(AllocatorBridge::global().slot(), host_slot()));
    }
}
