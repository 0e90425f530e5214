//! Unified error type for media-remote.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

/// External resources the controller acquires at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resource {
    /// Bluetooth HID service handle.
    Bluetooth,
    /// Notification / haptic service handle.
    Notification,
    /// Bounded input event queue.
    EventQueue,
    /// Display surface registration.
    Display,
}

/// Top-level error type used across the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Startup / shutdown
    /// A resource could not be acquired; the controller cannot start.
    ResourceUnavailable(Resource),

    /// Releasing a resource failed during shutdown.
    ReleaseFailed(Resource),

    // Bluetooth
    /// Connection state could not be queried.
    ProbeFailed,

    /// No host is connected to receive HID reports.
    NotConnected,

    /// The BLE stack rejected the HID report notification.
    HidSendFailed,

    // Feedback / Display
    /// The vibration motor could not be triggered.
    FeedbackFailed,

    /// Presenting a frame to the display failed.
    DisplayFailed,
}
