//! Platform service interfaces.
//!
//! The controller drives the hardware only through these traits. The
//! firmware binary implements them on top of the SoftDevice, the OLED and
//! GPIO; tests implement them with recording doubles.
//!
//! # `no_std` Compatibility
//!
//! All implementations must be `#![no_std]` compatible with no heap
//! allocation.

use crate::error::Error;
use crate::hid::MediaKey;
use crate::input::InputEvent;
use crate::render::FrameDescription;

pub use crate::feedback::Haptics;
pub use crate::probe::ConnectionProbe;

/// Sends media key presses to the connected host.
pub trait HidSender {
    /// Send one key press (key-down followed by key-up).
    ///
    /// Best effort: the caller logs failures and moves on.
    fn send_media_key(&mut self, key: MediaKey) -> Result<(), Error>;
}

/// The screen the status frame is presented on.
pub trait Display {
    /// Draw `frame` and push it to the panel.
    fn present(&mut self, frame: &FrameDescription) -> Result<(), Error>;
}

/// Consumer end of the bounded input event queue.
pub trait EventSource {
    /// Wait up to `timeout_ms` for the next event.
    ///
    /// `None` means the timeout elapsed; it is the controller's polling
    /// tick, not an error.
    fn next_event(
        &mut self,
        timeout_ms: u64,
    ) -> impl core::future::Future<Output = Option<InputEvent>>;
}

/// A scoped handle that must be handed back explicitly on shutdown.
pub trait Release: Sized {
    fn release(self) -> Result<(), Error>;
}

/// Constructs the process-wide service handles.
///
/// Passed by value into [`AppController::new`](crate::controller::AppController::new);
/// each `open_*` is called exactly once during startup.
pub trait Platform {
    type Bluetooth: ConnectionProbe + HidSender + Release;
    type Notification: Haptics + Release;
    type Events: EventSource + Release;
    type Display: Display + Release;

    fn open_bluetooth(&mut self) -> Result<Self::Bluetooth, Error>;
    fn open_notification(&mut self) -> Result<Self::Notification, Error>;
    fn open_events(&mut self) -> Result<Self::Events, Error>;
    fn open_display(&mut self) -> Result<Self::Display, Error>;
}
