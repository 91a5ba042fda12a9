//! Build switches controlling whether the bridge is active.

/// The two independent switches that decide whether the bridge exists.
///
/// The bridge is active only when the host library and the alternate
/// allocator are both present. When either is absent the host uses its
/// built-in default and never consults a [`RegistrationSlot`](crate::RegistrationSlot).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BridgeFeatures {
    /// The host library whose allocation hooks are redirected is linked in
    /// (cargo feature `host`).
    pub host_library: bool,
    /// The alternate allocator is linked in (cargo feature `mimalloc`).
    pub alternate_allocator: bool,
}

impl BridgeFeatures {
    /// The switches this build was compiled with.
    pub const COMPILED: BridgeFeatures = BridgeFeatures {
        host_library: cfg!(feature = "host"),
        alternate_allocator: cfg!(feature = "mimalloc"),
    };

    /// Both switches on.
    pub const ENABLED: BridgeFeatures = BridgeFeatures::new(true, true);

    /// Both switches off.
    pub const DISABLED: BridgeFeatures = BridgeFeatures::new(false, false);

    /// Construct from explicit switch values.
    pub const fn new(host_library: bool, alternate_allocator: bool) -> Self {
        Self {
            host_library,
            alternate_allocator,
        }
    }

    /// Returns `true` if the bridge is compiled in: both switches are on.
    pub const fn enabled(&self) -> bool {
        self.host_library && self.alternate_allocator
    }
}

impl Default for BridgeFeatures {
    /// Defaults to [`COMPILED`](Self::COMPILED).
    fn default() -> Self {
        Self::COMPILED
    }
}
