//! Application state owned by the controller.

use crate::config;

/// The single piece of mutable application state.
///
/// Owned exclusively by [`AppController`](crate::controller::AppController);
/// other components only ever see a shared reference or a copied flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AppState {
    /// Last observed HID connection state.
    pub connected: bool,
    /// Whether actions are confirmed with a haptic pulse.
    pub vibration_enabled: bool,
    /// Main loop continuation flag.
    pub running: bool,
}

impl AppState {
    /// Initial state given the first connection probe.
    pub const fn new(connected: bool) -> Self {
        Self {
            connected,
            vibration_enabled: config::VIBRATION_DEFAULT,
            running: true,
        }
    }

    /// Record a fresh probe result. Returns `true` if it changed.
    pub fn observe_connection(&mut self, connected: bool) -> bool {
        if self.connected == connected {
            return false;
        }
        self.connected = connected;
        true
    }

    /// Flip the vibration preference, returning the new value.
    pub fn toggle_vibration(&mut self) -> bool {
        self.vibration_enabled = !self.vibration_enabled;
        self.vibration_enabled
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(false)
    }
}
