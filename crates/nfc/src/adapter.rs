//! Host NFC environment probes

use core::fmt;

/// Capability checks against the host NFC environment
///
/// Answers the two questions the surface exposes before any tag is
/// involved: is NFC hardware present at all, and is the radio currently
/// switched on. Both are instantaneous probes with no tag interaction.
pub trait NfcAdapter: fmt::Debug {
    /// Whether the device has NFC hardware
    fn is_available(&self) -> bool;

    /// Whether NFC is switched on right now
    fn is_enabled(&self) -> bool;
}

/// Fixed adapter state, for tests and simulations
#[derive(Debug, Clone, Copy)]
pub struct StaticAdapter {
    /// Hardware present
    pub available: bool,
    /// Radio switched on
    pub enabled: bool,
}

impl NfcAdapter for StaticAdapter {
    fn is_available(&self) -> bool {
        self.available
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
