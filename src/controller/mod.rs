//! Application controller - owns the state, the service handles and the
//! main loop.
//!
//! ```text
//! Starting ──▶ Running ──(exit)──▶ Stopping ──▶ Stopped
//!    │                                            ▲
//!    └──────────(resource unavailable)────────────┘
//! ```
//!
//! Each `Running` iteration waits on the event queue for at most
//! [`POLL_INTERVAL_MS`], applies whatever the dispatcher decided, re-probes
//! the connection and presents at most one frame. A handled key event and
//! a connection change both request a redraw; requests made during an
//! iteration coalesce into that single frame.


use crate::config::POLL_INTERVAL_MS;
use crate::dispatch::{self, Action};
use crate::error::{Error, Resource};
use crate::platform::{Display, EventSource, HidSender, Platform, Release};
use crate::render::{self, FrameDescription};
use crate::state::AppState;
use crate::{feedback, probe};

/// Controller lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Lifecycle {
    Starting,
    Running,
    Stopping,
    Stopped,
}

/// Service handles acquired in `Starting`, released in `Stopping`.
struct Handles<P: Platform> {
    bluetooth: P::Bluetooth,
    notification: P::Notification,
    events: P::Events,
    display: P::Display,
}

impl<P: Platform> Handles<P> {
    /// Open every service in order. On failure, whatever was already
    /// opened is released again before returning.
    fn acquire(platform: &mut P) -> Result<Self, Error> {
        let bluetooth = platform
            .open_bluetooth()
            .map_err(|e| unavailable(Resource::Bluetooth, e))?;

        let notification = match platform.open_notification() {
            Ok(handle) => handle,
            Err(e) => {
                release_one(Resource::Bluetooth, bluetooth);
                return Err(unavailable(Resource::Notification, e));
            }
        };

        let events = match platform.open_events() {
            Ok(handle) => handle,
            Err(e) => {
                release_one(Resource::Notification, notification);
                release_one(Resource::Bluetooth, bluetooth);
                return Err(unavailable(Resource::EventQueue, e));
            }
        };

        let display = match platform.open_display() {
            Ok(handle) => handle,
            Err(e) => {
                release_one(Resource::EventQueue, events);
                release_one(Resource::Notification, notification);
                release_one(Resource::Bluetooth, bluetooth);
                return Err(unavailable(Resource::Display, e));
            }
        };

        Ok(Self {
            bluetooth,
            notification,
            events,
            display,
        })
    }

    /// Release in reverse acquisition order. Returns the failure count.
    fn release(self) -> u8 {
        let mut failures = 0;
        failures += release_one(Resource::Display, self.display) as u8;
        failures += release_one(Resource::EventQueue, self.events) as u8;
        failures += release_one(Resource::Notification, self.notification) as u8;
        failures += release_one(Resource::Bluetooth, self.bluetooth) as u8;
        failures
    }
}

fn unavailable(resource: Resource, cause: Error) -> Error {
    error!("Cannot open {:?}: {:?}", resource, cause);
    Error::ResourceUnavailable(resource)
}

/// Release one handle, logging failure. Returns `true` if it failed.
fn release_one(resource: Resource, handle: impl Release) -> bool {
    match handle.release() {
        Ok(()) => {
            debug!("Released {:?}", resource);
            false
        }
        Err(e) => {
            warn!("Release of {:?} failed: {:?}", resource, e);
            true
        }
    }
}

/// The media remote application.
pub struct AppController<P: Platform> {
    platform: P,
    lifecycle: Lifecycle,
    state: AppState,
    handles: Option<Handles<P>>,
    redraw_pending: bool,
    frames_presented: u32,
    release_failures: u8,
}

impl<P: Platform> AppController<P> {
    /// Create a controller around `platform`. Nothing is opened until
    /// [`start`](Self::start).
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            lifecycle: Lifecycle::Starting,
            state: AppState::default(),
            handles: None,
            redraw_pending: false,
            frames_presented: 0,
            release_failures: 0,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Frames successfully handed to the display so far.
    pub fn frames_presented(&self) -> u32 {
        self.frames_presented
    }

    /// Releases that failed during the last shutdown.
    pub fn release_failures(&self) -> u8 {
        self.release_failures
    }

    /// Draw callback: the frame for the current state.
    pub fn render(&self) -> FrameDescription {
        render::render(&self.state)
    }

    /// Ask for a frame at the end of the current iteration. Idempotent.
    pub fn request_redraw(&mut self) {
        self.redraw_pending = true;
    }

    /// `Starting` → `Running`.
    ///
    /// Opens every service, takes the first connection reading and draws
    /// the first frame. If any service is unavailable the controller goes
    /// straight to `Stopped` without ever running.
    pub fn start(&mut self) -> Result<(), Error> {
        if self.lifecycle != Lifecycle::Starting {
            warn!("start() called in {:?}", self.lifecycle);
            return Ok(());
        }

        let handles = match Handles::acquire(&mut self.platform) {
            Ok(handles) => handles,
            Err(e) => {
                self.lifecycle = Lifecycle::Stopped;
                return Err(e);
            }
        };

        self.state = AppState::new(probe::read(&handles.bluetooth));
        self.handles = Some(handles);
        self.lifecycle = Lifecycle::Running;
        info!("Running (connected={})", self.state.connected);

        self.request_redraw();
        self.flush_redraw();
        Ok(())
    }

    /// One `Running` iteration. Returns the lifecycle afterwards.
    pub async fn step(&mut self) -> Lifecycle {
        if self.lifecycle != Lifecycle::Running {
            return self.lifecycle;
        }

        let Some(handles) = self.handles.as_mut() else {
            self.lifecycle = Lifecycle::Stopping;
            return self.lifecycle;
        };

        let received = handles.events.next_event(POLL_INTERVAL_MS).await;
        if let Some(event) = received {
            trace!("Input: {:?}", event);
            let action = dispatch::handle(event, &self.state);
            self.apply(action);
            // Every handled key refreshes the screen, even when it did nothing.
            if self.lifecycle == Lifecycle::Running {
                self.redraw_pending = true;
            }
        }

        if self.lifecycle == Lifecycle::Running {
            self.refresh_connection();
            self.flush_redraw();
        }

        self.lifecycle
    }

    /// `Stopping` → `Stopped`. Safe to call in any state; runs at most once.
    pub fn stop(&mut self) {
        if self.lifecycle == Lifecycle::Stopped {
            return;
        }

        self.lifecycle = Lifecycle::Stopping;
        self.state.running = false;

        if let Some(handles) = self.handles.take() {
            self.release_failures = handles.release();
        }

        self.lifecycle = Lifecycle::Stopped;
        info!("Stopped ({} release failures)", self.release_failures);
    }

    /// Run the whole lifecycle to completion.
    ///
    /// Fails only when startup cannot acquire its resources.
    pub async fn run(&mut self) -> Result<(), Error> {
        self.start()?;
        while self.step().await == Lifecycle::Running {}
        self.stop();
        Ok(())
    }

    fn apply(&mut self, action: Action) {
        let Some(handles) = self.handles.as_mut() else {
            return;
        };

        match action {
            Action::None => {}
            Action::SendMediaKey(key) => {
                debug!("Media key {:?}", key);
                if let Err(e) = handles.bluetooth.send_media_key(key) {
                    warn!("HID send failed: {:?}", e);
                }
                feedback::pulse(&mut handles.notification, self.state.vibration_enabled);
            }
            Action::ToggleVibration => {
                let enabled = self.state.toggle_vibration();
                info!("Vibration {}", enabled);
                feedback::pulse(&mut handles.notification, enabled);
            }
            Action::RequestExit => {
                info!("Exit requested");
                self.state.running = false;
                self.lifecycle = Lifecycle::Stopping;
            }
        }
    }

    fn refresh_connection(&mut self) {
        let Some(handles) = self.handles.as_ref() else {
            return;
        };

        let connected = probe::read(&handles.bluetooth);
        if self.state.observe_connection(connected) {
            info!("Connection changed: connected={}", connected);
            self.redraw_pending = true;
        }
    }

    fn flush_redraw(&mut self) {
        if !self.redraw_pending {
            return;
        }
        let Some(handles) = self.handles.as_mut() else {
            return;
        };

        self.redraw_pending = false;
        let frame = render::render(&self.state);
        match handles.display.present(&frame) {
            Ok(()) => self.frames_presented += 1,
            Err(e) => warn!("Frame dropped: {:?}", e),
        }
    }
}

impl<P: Platform> Drop for AppController<P> {
    fn drop(&mut self) {
        // Covers early returns and abandoned futures.
        self.stop();
    }
}
