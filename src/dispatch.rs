//! Input dispatcher - maps input events to application actions.
//!
//! This is a pure classifier: it never touches the HID sender, haptics or
//! state. The controller performs whatever the returned [`Action`] asks.
//!
//! All event-kind filtering happens here, once: only short presses are
//! acted upon, the exit key included.

use crate::config::{EXIT_KEY, KEY_BINDINGS};
use crate::hid::MediaKey;
use crate::input::{InputEvent, InputKey};
use crate::state::AppState;

/// What the controller should do in response to an input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Nothing to do.
    None,
    /// Send a media key to the connected host.
    SendMediaKey(MediaKey),
    /// Flip the haptic feedback preference.
    ToggleVibration,
    /// Leave the main loop.
    RequestExit,
}

/// Classify `event` against the current state.
pub fn handle(event: InputEvent, state: &AppState) -> Action {
    if !event.is_short() {
        return Action::None;
    }

    if event.key == EXIT_KEY {
        return Action::RequestExit;
    }

    // Nobody is listening for HID reports.
    if !state.connected {
        return Action::None;
    }

    binding(event.key)
}

/// Connected-mode binding for `key`.
pub fn binding(key: InputKey) -> Action {
    KEY_BINDINGS
        .iter()
        .find_map(|&(bound, action)| (bound == key).then_some(action))
        .unwrap_or(Action::None)
}
