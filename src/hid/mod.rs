//! HID media keys and their consumer-control encoding.

pub mod consumer;

pub use consumer::{ConsumerReport, ConsumerUsage, CONSUMER_REPORT_DESCRIPTOR};

/// Media key commands the remote can send to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MediaKey {
    PlayPause,
    Next,
    Previous,
}
