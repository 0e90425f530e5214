//! Bluetooth Low Energy subsystem.
//!
//! This module drives the Nordic SoftDevice S140 in **Peripheral** role:
//!
//! 1. **Advertiser** - advertises the HID Service (0x1812) until a host
//!    connects, then again after every disconnect.
//! 2. **HID Service** - GATT server exposing the consumer-control report
//!    (see [`hid_service`]).
//! 3. **Link tracking** - the current [`Connection`] is kept in a static so
//!    the application's probe and HID sender can reach it synchronously.
//!
//! Pairing uses "Just Works" with bonds held in RAM only. Each bond also
//! keeps the host's CCCD state, restored when that host reconnects.

pub mod hid_service;

use core::cell::RefCell;
use core::mem;

use defmt::{debug, info, warn};
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::Timer;
use media_remote::bonds::{BondTable, SYS_ATTRS_CAPACITY};
use media_remote::config::{self, MAX_BONDED_HOSTS};
use media_remote::hid::{ConsumerReport, MediaKey};
use media_remote::{ConnectionProbe, Error, HidSender, Release};
use nrf_softdevice::ble::advertisement_builder::{
    Flag, LegacyAdvertisementBuilder, LegacyAdvertisementPayload, ServiceList, ServiceUuid16,
};
use nrf_softdevice::ble::security::{IoCapabilities, SecurityHandler};
use nrf_softdevice::ble::{
    gatt_server, peripheral, Connection, EncryptionInfo, IdentityKey, MasterId, SecurityMode,
};
use nrf_softdevice::{raw, Softdevice};
use static_cell::StaticCell;

pub use hid_service::Server;

/// The active host link, if any.
static CONNECTION: Mutex<CriticalSectionRawMutex, RefCell<Option<Connection>>> =
    Mutex::new(RefCell::new(None));

/// Raised when the application releases the Bluetooth handle.
static SHUTDOWN: Signal<CriticalSectionRawMutex, ()> = Signal::new();

static ADV_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .flags(&[Flag::GeneralDiscovery, Flag::LE_Only])
    .services_16(ServiceList::Complete, &[ServiceUuid16::HUMAN_INTERFACE_DEVICE])
    .full_name(config::BLE_DEVICE_NAME)
    .build();

static SCAN_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new().build();

fn current_connection() -> Option<Connection> {
    CONNECTION.lock(|c| c.borrow().clone())
}

fn set_connection(conn: Option<Connection>) {
    CONNECTION.lock(|c| *c.borrow_mut() = conn);
}

/// SoftDevice configuration: one peripheral link, named GAP device.
pub fn softdevice_config() -> nrf_softdevice::Config {
    nrf_softdevice::Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: 64 }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: config::BLE_DEVICE_NAME.as_ptr() as _,
            current_len: config::BLE_DEVICE_NAME.len() as u16,
            max_len: config::BLE_DEVICE_NAME.len() as u16,
            // SAFETY: all-zero is "no access" for the write permission.
            write_perm: unsafe { mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}

/// Set the GAP appearance once the SoftDevice is enabled.
pub fn set_appearance() {
    // SAFETY: plain SVC call, no pointers involved.
    let ret = unsafe { raw::sd_ble_gap_appearance_set(config::BLE_APPEARANCE) };
    if ret != raw::NRF_SUCCESS {
        warn!("Could not set GAP appearance: {}", ret);
    }
}

#[embassy_executor::task]
pub async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

struct PeerBond {
    master_id: MasterId,
    key: EncryptionInfo,
    peer_id: IdentityKey,
}

struct Bonder {
    bonds: RefCell<BondTable<PeerBond, MAX_BONDED_HOSTS>>,
}

impl Bonder {
    fn new() -> Self {
        Self {
            bonds: RefCell::new(BondTable::new()),
        }
    }
}

impl SecurityHandler for Bonder {
    fn io_capabilities(&self) -> IoCapabilities {
        IoCapabilities::None
    }

    fn can_bond(&self, _conn: &Connection) -> bool {
        true
    }

    fn on_bonded(
        &self,
        _conn: &Connection,
        master_id: MasterId,
        key: EncryptionInfo,
        peer_id: IdentityKey,
    ) {
        let mut bonds = self.bonds.borrow_mut();
        bonds.bond(
            PeerBond {
                master_id,
                key,
                peer_id,
            },
            |a, b| a.peer_id == b.peer_id,
        );
        info!("Bonded with host ({} stored)", bonds.len());
    }

    fn get_key(&self, _conn: &Connection, master_id: MasterId) -> Option<EncryptionInfo> {
        self.bonds
            .borrow()
            .find(|p| p.master_id == master_id)
            .map(|b| b.peer.key)
    }

    fn on_security_update(&self, _conn: &Connection, mode: SecurityMode) {
        info!("BLE security mode updated: {}", mode);
    }

    fn save_sys_attrs(&self, conn: &Connection) {
        let addr = conn.peer_address();
        let mut buf = [0u8; SYS_ATTRS_CAPACITY];
        let len = match gatt_server::get_sys_attrs(conn, &mut buf) {
            Ok(len) => len,
            Err(e) => {
                warn!("Could not read system attributes: {}", e);
                return;
            }
        };

        // Runs before the link teardown clears the subscription flag.
        let subscribed = hid_service::notifications_enabled();
        match self.bonds.borrow_mut().save_session(
            |p| p.peer_id.is_match(addr),
            &buf[..len],
            subscribed,
        ) {
            Ok(()) => debug!("Saved {} bytes of system attributes", len),
            Err(e) => debug!("System attributes not kept: {}", e),
        }
    }

    fn load_sys_attrs(&self, conn: &Connection) {
        let addr = conn.peer_address();
        let bonds = self.bonds.borrow();
        let bond = bonds.find(|p| p.peer_id.is_match(addr));
        let attrs = bond.and_then(|b| b.sys_attrs());

        if let Err(e) = gatt_server::set_sys_attrs(conn, attrs) {
            warn!("Could not restore system attributes: {}", e);
            hid_service::set_subscribed(false);
            return;
        }

        let subscribed = attrs.is_some() && bond.is_some_and(|b| b.subscribed());
        hid_service::set_subscribed(subscribed);
        info!("Restored host session (subscribed={})", subscribed);
    }
}

fn bonder() -> &'static Bonder {
    static BONDER: StaticCell<Bonder> = StaticCell::new();
    BONDER.init(Bonder::new())
}

/// Advertise, serve one host, repeat - until the handle is released.
#[embassy_executor::task]
pub async fn ble_task(sd: &'static Softdevice, server: &'static Server) {
    let bonder = bonder();
    let adv_config = peripheral::Config {
        interval: config::BLE_ADV_INTERVAL,
        ..Default::default()
    };

    loop {
        let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
            adv_data: &ADV_DATA,
            scan_data: &SCAN_DATA,
        };

        info!("Advertising as \"{}\"", config::BLE_DEVICE_NAME);
        let conn = match select(
            peripheral::advertise_pairable(sd, adv, &adv_config, bonder),
            SHUTDOWN.wait(),
        )
        .await
        {
            Either::First(Ok(conn)) => conn,
            Either::First(Err(e)) => {
                warn!("Advertising failed: {}", e);
                Timer::after_secs(1).await;
                continue;
            }
            Either::Second(()) => break,
        };

        info!("Host connected");
        request_conn_params(&conn);
        set_connection(Some(conn.clone()));

        let stopped = matches!(
            select(gatt_server::run(&conn, server, |_| {}), SHUTDOWN.wait()).await,
            Either::Second(())
        );

        set_connection(None);
        hid_service::set_subscribed(false);

        if stopped {
            let _ = conn.disconnect();
            break;
        }
        info!("Host disconnected");
    }

    info!("BLE stopped");
}

fn request_conn_params(conn: &Connection) {
    let params = raw::ble_gap_conn_params_t {
        min_conn_interval: config::BLE_CONN_INTERVAL_MIN,
        max_conn_interval: config::BLE_CONN_INTERVAL_MAX,
        slave_latency: config::BLE_SLAVE_LATENCY,
        conn_sup_timeout: config::BLE_SUP_TIMEOUT,
    };
    if conn.set_conn_params(params).is_err() {
        warn!("Host rejected connection parameter update");
    }
}

/// Application-side Bluetooth handle: connection probe + HID sender.
pub struct BleHid {
    server: &'static Server,
}

impl BleHid {
    pub fn new(server: &'static Server) -> Self {
        Self { server }
    }
}

impl ConnectionProbe for BleHid {
    fn is_connected(&self) -> Result<bool, Error> {
        Ok(current_connection().is_some() && hid_service::notifications_enabled())
    }
}

impl HidSender for BleHid {
    fn send_media_key(&mut self, key: MediaKey) -> Result<(), Error> {
        let conn = current_connection().ok_or(Error::NotConnected)?;
        let hid = &self.server.hid;

        hid.notify(&conn, ConsumerReport::press(key))
            .map_err(|_| Error::HidSendFailed)?;
        hid.notify(&conn, ConsumerReport::release())
            .map_err(|_| Error::HidSendFailed)
    }
}

impl Release for BleHid {
    fn release(self) -> Result<(), Error> {
        SHUTDOWN.signal(());
        Ok(())
    }
}
