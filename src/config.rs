//! Application-wide constants and compile-time configuration.
//!
//! There are no runtime settings: key bindings, timing parameters and
//! BLE parameters are all fixed here so they can be tuned in one place.

use crate::dispatch::Action;
use crate::hid::MediaKey;
use crate::input::InputKey;

// Main loop

/// Event-queue receive timeout (ms). Doubles as the connection poll cadence.
pub const POLL_INTERVAL_MS: u64 = 100;

/// Capacity of the bounded input event queue.
pub const EVENT_QUEUE_DEPTH: usize = 8;

/// Haptic feedback preference at startup.
pub const VIBRATION_DEFAULT: bool = true;

// Key bindings

/// Key that requests application exit, honoured in any connection state.
pub const EXIT_KEY: InputKey = InputKey::Back;

/// Short-press bindings that apply only while the host is connected.
///
/// Keys missing from this table (and not [`EXIT_KEY`]) do nothing.
pub const KEY_BINDINGS: [(InputKey, Action); 4] = [
    (InputKey::Ok, Action::SendMediaKey(MediaKey::PlayPause)),
    (InputKey::Right, Action::SendMediaKey(MediaKey::Next)),
    (InputKey::Left, Action::SendMediaKey(MediaKey::Previous)),
    (InputKey::Up, Action::ToggleVibration),
];

// Input classification

/// Hold time after which a press becomes a long press (ms).
pub const LONG_PRESS_MS: u64 = 300;

/// Interval between repeat events while a key stays held (ms).
pub const REPEAT_INTERVAL_MS: u64 = 150;

/// Button debounce time (ms).
pub const BUTTON_DEBOUNCE_MS: u64 = 20;

// Haptics

/// Length of one vibration-motor pulse (ms).
pub const HAPTIC_PULSE_MS: u64 = 40;

// BLE

/// GAP device name advertised to hosts.
pub const BLE_DEVICE_NAME: &str = "Media Remote";

/// GAP appearance: generic remote control (0x0180).
pub const BLE_APPEARANCE: u16 = 0x0180;

/// Advertising interval (in 0.625 ms units). 160 = 100 ms.
pub const BLE_ADV_INTERVAL: u32 = 160;

/// Preferred connection interval range (in 1.25 ms units).
pub const BLE_CONN_INTERVAL_MIN: u16 = 12;
pub const BLE_CONN_INTERVAL_MAX: u16 = 24;

/// BLE slave latency (connection events the remote may skip while idle).
pub const BLE_SLAVE_LATENCY: u16 = 4;

/// BLE supervision timeout (in 10 ms units). 400 = 4 s.
pub const BLE_SUP_TIMEOUT: u16 = 400;

/// Maximum number of bonded hosts kept in RAM.
pub const MAX_BONDED_HOSTS: usize = 2;

// GPIO pin assignments (nRF52840-DK style board)
//
// Actual `embassy_nrf::peripherals::*` types are selected in `main.rs`.
//
//   Button UP      → P0.11
//   Button DOWN    → P0.12
//   Button LEFT    → P0.24
//   Button RIGHT   → P0.25
//   Button OK      → P0.03
//   Button BACK    → P0.04
//   I²C SDA        → P0.26
//   I²C SCL        → P0.27
//   Vibration motor→ P0.06
