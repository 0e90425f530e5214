//! GPIO button input with async debouncing and hold tracking.
//!
//! Six physical buttons (active-low with internal pull-up): UP, DOWN, LEFT,
//! RIGHT, OK and BACK. Each button runs its own task that waits for the pin
//! level to change, debounces it, and feeds the sampled level to a
//! [`PressTracker`] which classifies the press into Short / Long / Repeat /
//! Release events for the queue.

use core::sync::atomic::{AtomicBool, Ordering};

use defmt::{debug, warn};
use embassy_futures::select::{select, Either};
use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Sender;
use embassy_time::{Duration, Instant, Timer};
use media_remote::config::{BUTTON_DEBOUNCE_MS, EVENT_QUEUE_DEPTH};
use media_remote::{InputEvent, InputKey, PressTracker};

pub type EventSender = Sender<'static, CriticalSectionRawMutex, InputEvent, EVENT_QUEUE_DEPTH>;

/// Buttons only forward events while the application holds the queue.
static FORWARDING: AtomicBool = AtomicBool::new(false);

pub fn set_forwarding(enabled: bool) {
    FORWARDING.store(enabled, Ordering::Release);
}

fn now_ms() -> u64 {
    Instant::now().as_millis()
}

/// Non-blocking push; a full queue drops the newest event.
fn forward(tx: &EventSender, event: InputEvent) {
    if !FORWARDING.load(Ordering::Acquire) {
        return;
    }
    debug!("Input: {}", event);
    if tx.try_send(event).is_err() {
        warn!("Input queue full, dropping {}", event);
    }
}

/// Pin level after the debounce window; `true` means pressed.
async fn sample(btn: &Input<'static>) -> bool {
    Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;
    btn.is_low()
}

#[embassy_executor::task(pool_size = 6)]
pub async fn button_task(pin: AnyPin, key: InputKey, tx: EventSender) -> ! {
    let mut btn = Input::new(pin, Pull::Up);
    let mut tracker = PressTracker::new(key);

    loop {
        // Level-triggered: returns at once if the button is already down.
        btn.wait_for_low().await;
        let pressed = sample(&btn).await;
        tracker.update(pressed, now_ms(), |e| forward(&tx, e));

        while let Some(deadline) = tracker.deadline() {
            match select(btn.wait_for_high(), Timer::at(Instant::from_millis(deadline))).await {
                Either::First(()) => {
                    let pressed = sample(&btn).await;
                    tracker.update(pressed, now_ms(), |e| forward(&tx, e));
                }
                Either::Second(()) => {
                    if let Some(event) = tracker.poll(now_ms()) {
                        forward(&tx, event);
                    }
                }
            }
        }
    }
}
