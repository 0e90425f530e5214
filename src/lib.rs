//! Bluetooth HID media remote - host-testable core.
//!
//! Everything that decides *what* the remote does lives here and runs on
//! the host: input classification, the dispatcher, the status renderer
//! and the controller loop. The firmware binary (`main.rs`, feature
//! `embedded`) only implements the [`platform`] traits on real hardware.
//!
//! Usage: `cargo test` (host) / `cargo run --release --features embedded`
//! (nRF52840 + probe-rs).
//!
//! ## Data flow
//!
//! ```text
//! buttons ──▶ PressTracker ──▶ queue(8) ──▶ AppController ──▶ dispatch::handle
//!                                               │   │                │
//!                             probe (every tick)┘   └▶ render     Action
//!                                                        │           │
//!                                                     Display   HID / haptics
//! ```

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod bonds;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod feedback;
pub mod hid;
pub mod input;
pub mod platform;
pub mod probe;
pub mod render;
pub mod state;

pub use controller::{AppController, Lifecycle};
pub use dispatch::Action;
pub use error::{Error, Resource};
pub use hid::MediaKey;
pub use input::{InputEvent, InputKey, InputKind, PressTracker};
pub use platform::{ConnectionProbe, Display, EventSource, Haptics, HidSender, Platform, Release};
pub use render::FrameDescription;
pub use state::AppState;
