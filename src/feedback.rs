//! Haptic feedback unit.

use crate::error::Error;

/// Vibration motor (or any other short physical cue).
pub trait Haptics {
    /// Fire one short pulse. Must not block the caller for its duration.
    fn short_pulse(&mut self) -> Result<(), Error>;
}

/// Fire a single pulse if `enabled`. Failures are swallowed.
pub fn pulse(haptics: &mut impl Haptics, enabled: bool) {
    if !enabled {
        return;
    }
    if let Err(e) = haptics.short_pulse() {
        debug!("Haptic pulse dropped: {:?}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        pulses: u32,
        fail: bool,
    }

    impl Haptics for Counter {
        fn short_pulse(&mut self) -> Result<(), Error> {
            self.pulses += 1;
            if self.fail {
                Err(Error::FeedbackFailed)
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn enabled_pulses_once() {
        let mut h = Counter { pulses: 0, fail: false };
        pulse(&mut h, true);
        assert_eq!(h.pulses, 1);
    }

    #[test]
    fn disabled_is_silent() {
        let mut h = Counter { pulses: 0, fail: false };
        pulse(&mut h, false);
        assert_eq!(h.pulses, 0);
    }

    #[test]
    fn failure_is_not_propagated() {
        let mut h = Counter { pulses: 0, fail: true };
        pulse(&mut h, true);
        assert_eq!(h.pulses, 1);
    }
}
