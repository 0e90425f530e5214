//! End-to-end scenarios for the media remote running against an in-memory
//! platform.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use embassy_futures::block_on;
use media_remote::config::EVENT_QUEUE_DEPTH;
use media_remote::{
    dispatch, render, Action, AppController, AppState, ConnectionProbe, Display, Error,
    EventSource, FrameDescription, Haptics, HidSender, InputEvent, InputKey, InputKind,
    Lifecycle, MediaKey, Platform, PressTracker, Release, Resource,
};

#[derive(Default)]
struct Host {
    connected: bool,
    queue: VecDeque<InputEvent>,
    sent: Vec<MediaKey>,
    pulses: usize,
    frames: Vec<FrameDescription>,
    opened: Vec<Resource>,
    released: Vec<Resource>,
}

/// One double plays every role; `role` is set on the handles it opens.
#[derive(Clone, Default)]
struct Device(Rc<RefCell<Host>>, Option<Resource>);

impl Device {
    fn connected(connected: bool) -> Self {
        let device = Self::default();
        device.0.borrow_mut().connected = connected;
        device
    }

    fn open(&self, role: Resource) -> Result<Device, Error> {
        self.0.borrow_mut().opened.push(role);
        Ok(Device(self.0.clone(), Some(role)))
    }

    fn press(&self, key: InputKey) {
        self.0.borrow_mut().queue.push_back(InputEvent::short(key));
    }

    /// Producer side of a bounded queue: a full queue drops the newest event.
    fn try_send(&self, event: InputEvent) -> bool {
        let mut host = self.0.borrow_mut();
        if host.queue.len() >= EVENT_QUEUE_DEPTH {
            return false;
        }
        host.queue.push_back(event);
        true
    }

    fn host(&self) -> std::cell::Ref<'_, Host> {
        self.0.borrow()
    }
}

impl Platform for Device {
    type Bluetooth = Device;
    type Notification = Device;
    type Events = Device;
    type Display = Device;

    fn open_bluetooth(&mut self) -> Result<Device, Error> {
        self.open(Resource::Bluetooth)
    }

    fn open_notification(&mut self) -> Result<Device, Error> {
        self.open(Resource::Notification)
    }

    fn open_events(&mut self) -> Result<Device, Error> {
        self.open(Resource::EventQueue)
    }

    fn open_display(&mut self) -> Result<Device, Error> {
        self.open(Resource::Display)
    }
}

impl ConnectionProbe for Device {
    fn is_connected(&self) -> Result<bool, Error> {
        Ok(self.0.borrow().connected)
    }
}

impl HidSender for Device {
    fn send_media_key(&mut self, key: MediaKey) -> Result<(), Error> {
        self.0.borrow_mut().sent.push(key);
        Ok(())
    }
}

impl Haptics for Device {
    fn short_pulse(&mut self) -> Result<(), Error> {
        self.0.borrow_mut().pulses += 1;
        Ok(())
    }
}

impl EventSource for Device {
    async fn next_event(&mut self, _timeout_ms: u64) -> Option<InputEvent> {
        self.0.borrow_mut().queue.pop_front()
    }
}

impl Display for Device {
    fn present(&mut self, frame: &FrameDescription) -> Result<(), Error> {
        self.0.borrow_mut().frames.push(*frame);
        Ok(())
    }
}

impl Release for Device {
    fn release(self) -> Result<(), Error> {
        let role = self.1.expect("only opened handles are released");
        self.0.borrow_mut().released.push(role);
        Ok(())
    }
}

fn running(device: &Device) -> AppController<Device> {
    let mut ctl = AppController::new(device.clone());
    ctl.start().expect("start");
    assert_eq!(ctl.lifecycle(), Lifecycle::Running);
    ctl
}

#[test]
fn scenario_a_connected_play_pause() {
    let device = Device::connected(true);
    let mut ctl = running(&device);
    let frames_before = device.host().frames.len();

    assert_eq!(
        dispatch::handle(InputEvent::short(InputKey::Ok), ctl.state()),
        Action::SendMediaKey(MediaKey::PlayPause)
    );

    device.press(InputKey::Ok);
    block_on(ctl.step());

    let host = device.host();
    assert_eq!(host.sent, vec![MediaKey::PlayPause]);
    assert_eq!(host.pulses, 1);
    assert_eq!(host.frames.len(), frames_before + 1);
}

#[test]
fn scenario_b_disconnected_next_is_ignored() {
    let device = Device::connected(false);
    let mut ctl = running(&device);

    assert_eq!(
        dispatch::handle(InputEvent::short(InputKey::Right), ctl.state()),
        Action::None
    );

    device.press(InputKey::Right);
    block_on(ctl.step());

    let host = device.host();
    assert!(host.sent.is_empty());
    assert_eq!(host.pulses, 0);
}

#[test]
fn scenario_c_exit_stops_and_releases_everything() {
    let device = Device::connected(true);
    device.press(InputKey::Back);
    let mut ctl = AppController::new(device.clone());

    assert_eq!(block_on(ctl.run()), Ok(()));

    assert_eq!(ctl.lifecycle(), Lifecycle::Stopped);
    assert!(!ctl.state().running);
    let host = device.host();
    assert_eq!(
        host.released,
        vec![
            Resource::Display,
            Resource::EventQueue,
            Resource::Notification,
            Resource::Bluetooth,
        ]
    );
}

#[test]
fn scenario_d_toggle_vibration_back_on_pulses_once() {
    let device = Device::connected(true);
    let mut ctl = running(&device);

    // First press turns the default-on vibration off, silently.
    device.press(InputKey::Up);
    block_on(ctl.step());
    assert!(!ctl.state().vibration_enabled);
    assert_eq!(device.host().pulses, 0);

    device.press(InputKey::Up);
    block_on(ctl.step());
    assert!(ctl.state().vibration_enabled);
    assert_eq!(device.host().pulses, 1);
}

#[test]
fn connection_drop_and_return_redraws_twice() {
    let device = Device::connected(true);
    let mut ctl = running(&device);
    let initial = device.host().frames.len();

    for connected in [true, true, false, false, false, true, true] {
        device.0.borrow_mut().connected = connected;
        block_on(ctl.step());
    }

    let host = device.host();
    let statuses: Vec<&str> = host.frames[initial..].iter().map(|f| f.status).collect();
    assert_eq!(
        statuses,
        vec![render::STATUS_DISCONNECTED, render::STATUS_CONNECTED]
    );
}

#[test]
fn draw_callback_matches_presented_frame() {
    let device = Device::connected(false);
    let ctl = running(&device);
    assert_eq!(device.host().frames.last(), Some(&ctl.render()));
    assert_eq!(ctl.render(), render::render(&AppState::new(false)));
}

#[test]
fn tracked_button_press_drives_the_controller() {
    let device = Device::connected(true);
    let mut ctl = running(&device);

    // A quick tap on OK followed by a long hold on BACK.
    let mut ok = PressTracker::new(InputKey::Ok);
    ok.press(0);
    ok.release(80, |e| device.0.borrow_mut().queue.push_back(e));

    let mut back = PressTracker::new(InputKey::Back);
    back.press(200);
    while let Some(e) = back.poll(2_000) {
        device.0.borrow_mut().queue.push_back(e);
    }
    back.release(2_010, |e| device.0.borrow_mut().queue.push_back(e));

    let queued: Vec<InputKind> = device.host().queue.iter().map(|e| e.kind).collect();
    assert_eq!(queued[..2], [InputKind::Short, InputKind::Release]);
    assert_eq!(queued[2], InputKind::Long);
    assert_eq!(queued.last(), Some(&InputKind::Release));

    while !device.host().queue.is_empty() {
        assert_eq!(block_on(ctl.step()), Lifecycle::Running);
    }

    // Holding BACK never exits; only the OK tap produced output.
    assert_eq!(device.host().sent, vec![MediaKey::PlayPause]);
}

#[test]
fn burst_beyond_queue_depth_drops_newest_and_stays_consistent() {
    let device = Device::connected(true);
    let mut ctl = running(&device);

    // A burst of UP taps lands before the controller gets to run.
    let accepted = (0..EVENT_QUEUE_DEPTH + 3)
        .filter(|_| device.try_send(InputEvent::short(InputKey::Up)))
        .count();
    assert_eq!(accepted, EVENT_QUEUE_DEPTH);
    assert!(!device.try_send(InputEvent::short(InputKey::Ok)));

    while !device.host().queue.is_empty() {
        assert_eq!(block_on(ctl.step()), Lifecycle::Running);
    }

    // An even number of toggles survived: back to the default, and every
    // second toggle (off -> on) pulsed.
    assert!(ctl.state().vibration_enabled);
    assert!(ctl.state().connected);
    assert!(device.host().sent.is_empty());
    assert_eq!(device.host().pulses, EVENT_QUEUE_DEPTH / 2);
    assert_eq!(
        device.host().frames.last(),
        Some(&render::render(&AppState::new(true)))
    );

    // The dropped OK tap never reached the host; a fresh one does.
    device.press(InputKey::Ok);
    block_on(ctl.step());
    assert_eq!(device.host().sent, vec![MediaKey::PlayPause]);
}
