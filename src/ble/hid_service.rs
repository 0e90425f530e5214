//! HID-over-GATT service (peripheral side) carrying consumer-control reports.
//!
//! Characteristics registered under the HID Service (0x1812):
//! 1. Protocol Mode (0x2A4E) - report protocol only.
//! 2. HID Report (0x2A4D) - the 2-byte consumer input report, with a
//!    Report Reference descriptor (0x2908) mapping it to report ID 1.
//! 3. Report Map (0x2A4B) - the consumer control descriptor.
//! 4. HID Information (0x2A4A).
//! 5. HID Control Point (0x2A4C) - suspend / exit suspend from the host.

use core::sync::atomic::{AtomicBool, Ordering};

use defmt::{debug, info};
use media_remote::hid::consumer::{CONSUMER_REPORT_ID, CONSUMER_REPORT_SIZE};
use media_remote::hid::{ConsumerReport, CONSUMER_REPORT_DESCRIPTOR};
use nrf_softdevice::ble::gatt_server::builder::ServiceBuilder;
use nrf_softdevice::ble::gatt_server::characteristic::{Attribute, Metadata, Properties};
use nrf_softdevice::ble::gatt_server::{self, CharacteristicHandles, RegisterError, WriteOp};
use nrf_softdevice::ble::{Connection, SecurityMode, Uuid};
use nrf_softdevice::Softdevice;

const HID_SERVICE: Uuid = Uuid::new_16(0x1812);
const HID_INFORMATION: Uuid = Uuid::new_16(0x2a4a);
const REPORT_MAP: Uuid = Uuid::new_16(0x2a4b);
const HID_CONTROL_POINT: Uuid = Uuid::new_16(0x2a4c);
const HID_REPORT: Uuid = Uuid::new_16(0x2a4d);
const PROTOCOL_MODE: Uuid = Uuid::new_16(0x2a4e);
const REPORT_REFERENCE: Uuid = Uuid::new_16(0x2908);

/// Report Reference type for an input report.
const REPORT_TYPE_INPUT: u8 = 1;

/// Protocol Mode value for report protocol.
const PROTOCOL_MODE_REPORT: u8 = 1;

/// bcdHID 1.11, country code 0, flags: normally connectable.
const HID_INFO_VALUE: [u8; 4] = [0x11, 0x01, 0x00, 0x02];

/// Host subscribed to input-report notifications on the current link.
static NOTIFICATIONS_ENABLED: AtomicBool = AtomicBool::new(false);

/// Handles of the registered HID service.
pub struct HidService {
    input_report: CharacteristicHandles,
    control_point: u16,
}

impl HidService {
    pub fn new(sd: &mut Softdevice) -> Result<Self, RegisterError> {
        let mut sb = ServiceBuilder::new(sd, HID_SERVICE)?;

        sb.add_characteristic(
            PROTOCOL_MODE,
            Attribute::new([PROTOCOL_MODE_REPORT]).security(SecurityMode::JustWorks),
            Metadata::new(Properties::new().read().write_without_response()),
        )?
        .build();

        let mut input = sb.add_characteristic(
            HID_REPORT,
            Attribute::new([0u8; CONSUMER_REPORT_SIZE]).security(SecurityMode::JustWorks),
            Metadata::new(Properties::new().read().notify()),
        )?;
        input.add_descriptor(
            REPORT_REFERENCE,
            Attribute::new([CONSUMER_REPORT_ID, REPORT_TYPE_INPUT]).security(SecurityMode::JustWorks),
        )?;
        let input_report = input.build();

        sb.add_characteristic(
            REPORT_MAP,
            Attribute::new(CONSUMER_REPORT_DESCRIPTOR).security(SecurityMode::JustWorks),
            Metadata::new(Properties::new().read()),
        )?
        .build();

        sb.add_characteristic(
            HID_INFORMATION,
            Attribute::new(HID_INFO_VALUE).security(SecurityMode::JustWorks),
            Metadata::new(Properties::new().read()),
        )?
        .build();

        let control_point = sb
            .add_characteristic(
                HID_CONTROL_POINT,
                Attribute::new([0u8]).security(SecurityMode::JustWorks),
                Metadata::new(Properties::new().write_without_response()),
            )?
            .build();

        let _service = sb.build();

        Ok(Self {
            input_report,
            control_point: control_point.value_handle,
        })
    }

    /// Send one report as an input-report notification.
    pub fn notify(
        &self,
        conn: &Connection,
        report: ConsumerReport,
    ) -> Result<(), gatt_server::NotifyValueError> {
        gatt_server::notify_value(conn, self.input_report.value_handle, &report.to_bytes())
    }

    fn on_write(&self, handle: u16, data: &[u8]) {
        if handle == self.input_report.cccd_handle {
            // CCCD bit 0 = notifications.
            let enabled = data.first().is_some_and(|v| v & 0x01 != 0);
            NOTIFICATIONS_ENABLED.store(enabled, Ordering::Release);
            info!("HID input notifications enabled={}", enabled);
        } else if handle == self.control_point {
            debug!("HID control point: {=[u8]:x}", data);
        }
    }
}

/// `true` once the host has subscribed to input reports.
pub fn notifications_enabled() -> bool {
    NOTIFICATIONS_ENABLED.load(Ordering::Acquire)
}

/// Set the subscription from outside a CCCD write: cleared when the link
/// goes away, restored from a bonded host's saved session.
pub fn set_subscribed(enabled: bool) {
    NOTIFICATIONS_ENABLED.store(enabled, Ordering::Release);
}

/// GATT server hosting the HID service.
pub struct Server {
    pub hid: HidService,
}

impl Server {
    pub fn new(sd: &mut Softdevice) -> Result<Self, RegisterError> {
        Ok(Self {
            hid: HidService::new(sd)?,
        })
    }
}

impl gatt_server::Server for Server {
    type Event = ();

    fn on_write(
        &self,
        _conn: &Connection,
        handle: u16,
        _op: WriteOp,
        _offset: usize,
        data: &[u8],
    ) -> Option<Self::Event> {
        self.hid.on_write(handle, data);
        None
    }
}
