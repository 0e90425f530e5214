//! Input events and press classification.
//!
//! Buttons only report debounced press / release edges. [`PressTracker`]
//! turns those edges plus a millisecond clock into the event kinds the
//! dispatcher understands:
//!
//! ```text
//! press ── release < LONG_PRESS_MS ──────────────▶ Short, Release
//! press ── held LONG_PRESS_MS ─▶ Long ─▶ Repeat… ─▶ Release
//! ```

use crate::config::{LONG_PRESS_MS, REPEAT_INTERVAL_MS};

/// Physical keys on the remote.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputKey {
    Up,
    Down,
    Left,
    Right,
    Ok,
    Back,
}

impl InputKey {
    /// Every key, in board wiring order.
    pub const ALL: [InputKey; 6] = [
        InputKey::Up,
        InputKey::Down,
        InputKey::Left,
        InputKey::Right,
        InputKey::Ok,
        InputKey::Back,
    ];
}

/// Classification of a key actuation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputKind {
    /// Pressed and released before the long-press threshold.
    Short,
    /// Held past the long-press threshold (emitted once per press).
    Long,
    /// Still held; emitted periodically after `Long`.
    Repeat,
    /// Key went up. Always the last event of a press.
    Release,
}

/// A classified input event as delivered onto the event queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputEvent {
    pub key: InputKey,
    pub kind: InputKind,
}

impl InputEvent {
    pub const fn new(key: InputKey, kind: InputKind) -> Self {
        Self { key, kind }
    }

    pub const fn short(key: InputKey) -> Self {
        Self::new(key, InputKind::Short)
    }

    pub fn is_short(&self) -> bool {
        self.kind == InputKind::Short
    }
}

/// Per-key press state machine.
#[derive(Clone, Copy, Debug)]
pub struct PressTracker {
    key: InputKey,
    pressed_at: Option<u64>,
    long_sent: bool,
    next_repeat_at: u64,
}

impl PressTracker {
    pub const fn new(key: InputKey) -> Self {
        Self {
            key,
            pressed_at: None,
            long_sent: false,
            next_repeat_at: 0,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed_at.is_some()
    }

    /// Record a press edge. A second press without a release is ignored.
    pub fn press(&mut self, now_ms: u64) {
        if self.pressed_at.is_some() {
            return;
        }
        self.pressed_at = Some(now_ms);
        self.long_sent = false;
        self.next_repeat_at = 0;
    }

    /// Time at which [`poll`](Self::poll) will next produce an event.
    pub fn deadline(&self) -> Option<u64> {
        let pressed_at = self.pressed_at?;
        if self.long_sent {
            Some(self.next_repeat_at)
        } else {
            Some(pressed_at.saturating_add(LONG_PRESS_MS))
        }
    }

    /// Emit at most one `Long` or `Repeat` event that is due at `now_ms`.
    pub fn poll(&mut self, now_ms: u64) -> Option<InputEvent> {
        let deadline = self.deadline()?;
        if now_ms < deadline {
            return None;
        }

        if self.long_sent {
            self.next_repeat_at = self.next_repeat_at.saturating_add(REPEAT_INTERVAL_MS);
            Some(InputEvent::new(self.key, InputKind::Repeat))
        } else {
            self.long_sent = true;
            self.next_repeat_at = deadline.saturating_add(REPEAT_INTERVAL_MS);
            Some(InputEvent::new(self.key, InputKind::Long))
        }
    }

    /// Record a release edge, emitting the closing events of the press.
    pub fn release(&mut self, now_ms: u64, mut emit: impl FnMut(InputEvent)) {
        let Some(pressed_at) = self.pressed_at.take() else {
            return;
        };

        if !self.long_sent {
            let held = now_ms.saturating_sub(pressed_at);
            let kind = if held < LONG_PRESS_MS {
                InputKind::Short
            } else {
                // Threshold passed between polls.
                InputKind::Long
            };
            emit(InputEvent::new(self.key, kind));
        }

        self.long_sent = false;
        emit(InputEvent::new(self.key, InputKind::Release));
    }

    /// Resync with a sampled (debounced) pin level.
    ///
    /// Level-driven, so a press that began while the sampler was busy is
    /// picked up on the next sample instead of waiting for a fresh edge.
    pub fn update(&mut self, pressed: bool, now_ms: u64, emit: impl FnMut(InputEvent)) {
        match (pressed, self.is_pressed()) {
            (true, false) => self.press(now_ms),
            (false, true) => self.release(now_ms, emit),
            _ => {}
        }
    }
}
