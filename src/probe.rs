//! Connection probe - asks the Bluetooth service whether a host is attached.

use crate::error::Error;

/// Synchronous, side-effect-free connection query.
pub trait ConnectionProbe {
    fn is_connected(&self) -> Result<bool, Error>;
}

/// Query `probe`, treating any failure as "not connected".
pub fn read(probe: &impl ConnectionProbe) -> bool {
    match probe.is_connected() {
        Ok(connected) => connected,
        Err(e) => {
            warn!("Connection probe failed: {:?}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Result<bool, Error>);

    impl ConnectionProbe for Fixed {
        fn is_connected(&self) -> Result<bool, Error> {
            self.0
        }
    }

    #[test]
    fn passes_through_answers() {
        assert!(read(&Fixed(Ok(true))));
        assert!(!read(&Fixed(Ok(false))));
    }

    #[test]
    fn failure_reads_as_disconnected() {
        assert!(!read(&Fixed(Err(Error::ProbeFailed))));
    }
}
