//! nRF52840 board support: the hardware side of [`Platform`].
//!
//! ## Pin assignment
//!
//! | Function | Pin   |
//! |----------|-------|
//! | UP       | P0.11 |
//! | DOWN     | P0.12 |
//! | LEFT     | P0.24 |
//! | RIGHT    | P0.25 |
//! | OK       | P0.03 |
//! | BACK     | P0.04 |
//! | OLED SDA | P0.26 |
//! | OLED SCL | P0.27 |
//! | Motor    | P0.06 |

pub mod buttons;
pub mod display;
pub mod haptic;

use defmt::info;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver};
use embassy_time::{with_timeout, Duration};
use media_remote::config::EVENT_QUEUE_DEPTH;
use media_remote::{Error, EventSource, InputEvent, Platform, Release, Resource};

use crate::ble::{BleHid, Server};
use display::Screen;
use haptic::Motor;

/// Bounded input queue between the button tasks and the application.
pub static EVENTS: Channel<CriticalSectionRawMutex, InputEvent, EVENT_QUEUE_DEPTH> =
    Channel::new();

type EventReceiver = Receiver<'static, CriticalSectionRawMutex, InputEvent, EVENT_QUEUE_DEPTH>;

/// Application-side end of [`EVENTS`].
pub struct EventQueue {
    rx: EventReceiver,
}

impl EventSource for EventQueue {
    async fn next_event(&mut self, timeout_ms: u64) -> Option<InputEvent> {
        with_timeout(Duration::from_millis(timeout_ms), self.rx.receive())
            .await
            .ok()
    }
}

impl Release for EventQueue {
    fn release(self) -> Result<(), Error> {
        buttons::set_forwarding(false);
        while self.rx.try_receive().is_ok() {}
        Ok(())
    }
}

/// Each resource can be handed out once.
pub struct Board<I2C> {
    server: Option<&'static Server>,
    motor: bool,
    events: Option<EventReceiver>,
    i2c: Option<I2C>,
}

impl<I2C> Board<I2C> {
    pub fn new(server: &'static Server, i2c: I2C) -> Self {
        Self {
            server: Some(server),
            motor: true,
            events: Some(EVENTS.receiver()),
            i2c: Some(i2c),
        }
    }
}

impl<I2C> Platform for Board<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    type Bluetooth = BleHid;
    type Notification = Motor;
    type Events = EventQueue;
    type Display = Screen<I2C>;

    fn open_bluetooth(&mut self) -> Result<BleHid, Error> {
        let server = self
            .server
            .take()
            .ok_or(Error::ResourceUnavailable(Resource::Bluetooth))?;
        Ok(BleHid::new(server))
    }

    fn open_notification(&mut self) -> Result<Motor, Error> {
        if !core::mem::take(&mut self.motor) {
            return Err(Error::ResourceUnavailable(Resource::Notification));
        }
        Ok(Motor::new())
    }

    fn open_events(&mut self) -> Result<EventQueue, Error> {
        let rx = self
            .events
            .take()
            .ok_or(Error::ResourceUnavailable(Resource::EventQueue))?;
        buttons::set_forwarding(true);
        Ok(EventQueue { rx })
    }

    fn open_display(&mut self) -> Result<Screen<I2C>, Error> {
        let i2c = self
            .i2c
            .take()
            .ok_or(Error::ResourceUnavailable(Resource::Display))?;
        Screen::init(i2c)
    }
}

/// Enter System OFF. Only a reset brings the board back.
pub fn power_off() -> ! {
    info!("Powering off");
    // SAFETY: SVC call; does not return on success.
    unsafe {
        nrf_softdevice::raw::sd_power_system_off();
    }
    loop {
        cortex_m::asm::wfe();
    }
}
