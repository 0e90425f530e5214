//! Status screen renderer.
//!
//! [`render`] is a pure function of [`AppState`]: it only picks static
//! strings, so the same state always yields an identical frame. Drawing the
//! frame is the display back end's job.

use crate::state::AppState;

pub const TITLE: &str = "Media Remote";
pub const STATUS_CONNECTED: &str = "CONNECTED";
pub const STATUS_DISCONNECTED: &str = "DISCONNECTED";
pub const FOOTER_READY: &str = "READY";
pub const FOOTER_NOT_READY: &str = "ENABLE HID FIRST";
pub const BADGE_VIBRATION_ON: &str = "VIB";
pub const BADGE_VIBRATION_OFF: &str = "---";

/// Control legend, one line per bound media action.
pub const LEGEND: [&str; 3] = ["OK: Play/Pause", "RIGHT: Next", "LEFT: Previous"];

/// Renderer-agnostic description of one screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameDescription {
    pub title: &'static str,
    /// Right-aligned in the title bar.
    pub badge: &'static str,
    pub status: &'static str,
    pub legend: [&'static str; 3],
    pub footer: &'static str,
}

impl FrameDescription {
    /// Number of text rows, top to bottom.
    pub const ROWS: usize = 6;

    /// Rows in display order: title, status, legend, footer.
    pub fn lines(&self) -> [&'static str; Self::ROWS] {
        [
            self.title,
            self.status,
            self.legend[0],
            self.legend[1],
            self.legend[2],
            self.footer,
        ]
    }
}

/// Build the frame for `state`.
pub fn render(state: &AppState) -> FrameDescription {
    let (status, footer) = if state.connected {
        (STATUS_CONNECTED, FOOTER_READY)
    } else {
        (STATUS_DISCONNECTED, FOOTER_NOT_READY)
    };

    let badge = if state.vibration_enabled {
        BADGE_VIBRATION_ON
    } else {
        BADGE_VIBRATION_OFF
    };

    FrameDescription {
        title: TITLE,
        badge,
        status,
        legend: LEGEND,
        footer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connected_frame() {
        let frame = render(&AppState::new(true));
        assert_eq!(frame.title, TITLE);
        assert_eq!(frame.status, "CONNECTED");
        assert_eq!(frame.footer, "READY");
        assert_eq!(frame.legend, LEGEND);
    }

    #[test]
    fn disconnected_frame() {
        let frame = render(&AppState::new(false));
        assert_eq!(frame.status, "DISCONNECTED");
        assert_eq!(frame.footer, "ENABLE HID FIRST");
        assert_eq!(frame.legend, LEGEND);
    }

    #[test]
    fn render_is_pure() {
        for connected in [true, false] {
            for vibration in [true, false] {
                let mut state = AppState::new(connected);
                state.vibration_enabled = vibration;
                assert_eq!(render(&state), render(&state));
            }
        }
    }

    #[test]
    fn badge_tracks_vibration() {
        let mut state = AppState::new(true);
        assert_eq!(render(&state).badge, BADGE_VIBRATION_ON);
        state.vibration_enabled = false;
        assert_eq!(render(&state).badge, BADGE_VIBRATION_OFF);
    }

    #[test]
    fn lines_follow_screen_order() {
        let lines = render(&AppState::default()).lines();
        assert_eq!(lines[0], TITLE);
        assert_eq!(lines[1], STATUS_DISCONNECTED);
        assert_eq!(&lines[2..5], &LEGEND[..]);
        assert_eq!(lines[5], FOOTER_NOT_READY);
    }
}
