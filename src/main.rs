//! media-remote firmware - nRF52840 Bluetooth media remote.
//!
//! Advertises as a BLE HID consumer-control device and turns button presses
//! into Play/Pause, Next and Previous media keys. All decisions are made by
//! [`media_remote::AppController`]; this binary wires it to the board.
//!
//! ## Task layout
//!
//! ```text
//! softdevice_task ── SoftDevice event pump
//! ble_task        ── advertise / serve one host / repeat
//! button_task x6  ── debounce + PressTracker ──▶ EVENTS
//! motor_task      ── vibration pulses
//! main            ── AppController::run()
//! ```

#![no_std]
#![no_main]

mod ble;
mod board;

use defmt::{error, info, unwrap};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_nrf::gpio::Pin;
use embassy_nrf::interrupt::{self, InterruptExt, Priority};
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_time::Timer;
use media_remote::{AppController, InputKey};
use nrf_softdevice::Softdevice;
use panic_probe as _;
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    SPIM0_SPIS0_TWIM0_TWIS0_SPI0_TWI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

static SERVER: StaticCell<ble::Server> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("media-remote starting");

    // The SoftDevice owns priorities 0, 1 and 4.
    let mut config = embassy_nrf::config::Config::default();
    config.gpiote_interrupt_priority = Priority::P2;
    config.time_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(config);
    interrupt::SPIM0_SPIS0_TWIM0_TWIS0_SPI0_TWI0.set_priority(Priority::P3);

    let sd = Softdevice::enable(&ble::softdevice_config());
    let server = SERVER.init(unwrap!(ble::Server::new(sd)));
    ble::set_appearance();
    unwrap!(spawner.spawn(ble::softdevice_task(sd)));
    unwrap!(spawner.spawn(ble::ble_task(sd, server)));

    let buttons = [
        (p.P0_11.degrade(), InputKey::Up),
        (p.P0_12.degrade(), InputKey::Down),
        (p.P0_24.degrade(), InputKey::Left),
        (p.P0_25.degrade(), InputKey::Right),
        (p.P0_03.degrade(), InputKey::Ok),
        (p.P0_04.degrade(), InputKey::Back),
    ];
    for (pin, key) in buttons {
        unwrap!(spawner.spawn(board::buttons::button_task(
            pin,
            key,
            board::EVENTS.sender()
        )));
    }
    unwrap!(spawner.spawn(board::haptic::motor_task(p.P0_06.degrade())));

    let mut twim_config = twim::Config::default();
    twim_config.frequency = twim::Frequency::K400;
    let i2c = Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim_config);

    let mut app = AppController::new(board::Board::new(server, i2c));
    match app.run().await {
        Ok(()) => info!("media-remote exited"),
        Err(e) => error!("media-remote failed to start: {}", e),
    }
    drop(app);

    // Let the BLE and motor tasks observe their release.
    Timer::after_millis(50).await;
    board::power_off()
}
