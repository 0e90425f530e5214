//! Consumer Control HID support - media keys.
//!
//! Consumer Control is a separate HID usage page (0x0C). The remote only
//! uses its transport controls, sent as a 2-byte input report: one report
//! with the usage code on key-down, one all-zero report on key-up.

use super::MediaKey;

/// Consumer control report size (2 bytes for usage ID).
pub const CONSUMER_REPORT_SIZE: usize = 2;

/// Report ID assigned to the consumer control collection.
pub const CONSUMER_REPORT_ID: u8 = 1;

/// Consumer control usage codes (Usage Page 0x0C) used by the remote.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum ConsumerUsage {
    /// No action (key-up).
    None = 0x0000,
    /// Play/Pause toggle.
    PlayPause = 0x00CD,
    /// Next track.
    NextTrack = 0x00B5,
    /// Previous track.
    PrevTrack = 0x00B6,
}

impl From<MediaKey> for ConsumerUsage {
    fn from(key: MediaKey) -> Self {
        match key {
            MediaKey::PlayPause => ConsumerUsage::PlayPause,
            MediaKey::Next => ConsumerUsage::NextTrack,
            MediaKey::Previous => ConsumerUsage::PrevTrack,
        }
    }
}

/// Consumer Control HID report.
///
/// Simple 2-byte report containing a single usage code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConsumerReport {
    /// Active consumer control usage (little-endian u16 on the wire).
    pub usage: u16,
}

impl ConsumerReport {
    /// Key-up report (no usage active).
    pub const fn release() -> Self {
        Self { usage: 0 }
    }

    /// Key-down report for a single usage.
    pub const fn new(usage: ConsumerUsage) -> Self {
        Self {
            usage: usage as u16,
        }
    }

    /// Key-down report for a media key.
    pub fn press(key: MediaKey) -> Self {
        Self::new(ConsumerUsage::from(key))
    }

    /// Wire bytes of the report.
    pub fn to_bytes(&self) -> [u8; CONSUMER_REPORT_SIZE] {
        self.usage.to_le_bytes()
    }
}

/// HID Report Map for the BLE HID service.
///
/// A single consumer control collection with one 16-bit usage.
pub const CONSUMER_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x0C, // Usage Page (Consumer)
    0x09, 0x01, // Usage (Consumer Control)
    0xA1, 0x01, // Collection (Application)
    0x85, CONSUMER_REPORT_ID, //   Report ID
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x03, //   Logical Maximum (1023)
    0x19, 0x00, //   Usage Minimum (0)
    0x2A, 0xFF, 0x03, //   Usage Maximum (1023)
    0x75, 0x10, //   Report Size (16)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x00, //   Input (Data, Array, Absolute)
    0xC0, // End Collection
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_keys_map_to_transport_usages() {
        assert_eq!(ConsumerReport::press(MediaKey::PlayPause).usage, 0x00CD);
        assert_eq!(ConsumerReport::press(MediaKey::Next).usage, 0x00B5);
        assert_eq!(ConsumerReport::press(MediaKey::Previous).usage, 0x00B6);
    }

    #[test]
    fn release_report_is_zero() {
        let report = ConsumerReport::release();
        assert_eq!(report.to_bytes(), [0x00, 0x00]);
        assert_eq!(report, ConsumerReport::new(ConsumerUsage::None));
    }

    #[test]
    fn press_bytes_are_little_endian() {
        assert_eq!(ConsumerReport::press(MediaKey::PlayPause).to_bytes(), [0xCD, 0x00]);
        assert_eq!(ConsumerReport::press(MediaKey::Previous).to_bytes(), [0xB6, 0x00]);
    }

    #[test]
    fn descriptor_declares_report_id_and_closes_collection() {
        let id_pos = CONSUMER_REPORT_DESCRIPTOR
            .windows(2)
            .position(|w| w == [0x85, CONSUMER_REPORT_ID]);
        assert!(id_pos.is_some());
        assert_eq!(CONSUMER_REPORT_DESCRIPTOR.last(), Some(&0xC0));
    }
}
