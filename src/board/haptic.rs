//! Vibration motor driven from a dedicated task.

use defmt::{info, Format};
use embassy_nrf::gpio::{AnyPin, Level, Output, OutputDrive};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};
use media_remote::config::HAPTIC_PULSE_MS;
use media_remote::{Error, Haptics, Release};

#[derive(Clone, Copy, PartialEq, Eq, Format)]
enum MotorCommand {
    Pulse,
    Off,
}

static MOTOR: Signal<CriticalSectionRawMutex, MotorCommand> = Signal::new();

#[embassy_executor::task]
pub async fn motor_task(pin: AnyPin) {
    let mut motor = Output::new(pin, Level::Low, OutputDrive::Standard);

    loop {
        match MOTOR.wait().await {
            MotorCommand::Pulse => {
                motor.set_high();
                Timer::after(Duration::from_millis(HAPTIC_PULSE_MS)).await;
                motor.set_low();
            }
            MotorCommand::Off => {
                motor.set_low();
                info!("Motor released");
                return;
            }
        }
    }
}

/// Application-side notification handle.
pub struct Motor {
    _private: (),
}

impl Motor {
    pub(crate) fn new() -> Self {
        Self { _private: () }
    }
}

impl Haptics for Motor {
    fn short_pulse(&mut self) -> Result<(), Error> {
        MOTOR.signal(MotorCommand::Pulse);
        Ok(())
    }
}

impl Release for Motor {
    fn release(self) -> Result<(), Error> {
        MOTOR.signal(MotorCommand::Off);
        Ok(())
    }
}
