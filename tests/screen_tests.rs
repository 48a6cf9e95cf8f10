// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the camera screen
//!
//! These drive [`CameraScreen`] the way the application does, with fake
//! camera, torch and display implementations.

use rotissomat::Config;
use rotissomat::backends::camera::{
    AuthorizationStatus, BackendResult, CameraBackend, CameraDevice, CameraFacing, CameraFrame,
    DeviceInput, SetupAction, StillImage,
};
use rotissomat::backlight::{FixedBrightness, ScreenBrightness};
use rotissomat::errors::{CameraError, CaptureError, HardwareError};
use rotissomat::flash::{Torch, TorchMode};
use rotissomat::screen::{
    CameraScreen, FlashAction, FlashState, GhostAction, GhostState, Hardware, LabelColor,
    MaskGeometry, format_elapsed,
};
use std::sync::{Arc, Mutex};
use std::time::Instant;

struct StaticBackend;

impl CameraBackend for StaticBackend {
    fn is_available(&self) -> bool {
        true
    }

    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        Vec::new()
    }

    fn open_input(&self, device: &CameraDevice) -> BackendResult<DeviceInput> {
        Ok(DeviceInput {
            device: device.clone(),
            source: format!("target-object={} ", device.path),
        })
    }

    fn start(&self, _input: &DeviceInput) -> BackendResult<()> {
        Ok(())
    }
}

#[derive(Default)]
struct Recorded {
    torch_on: bool,
    torch_calls: Vec<&'static str>,
    brightness: Vec<f32>,
}

struct RecordingTorch(Arc<Mutex<Recorded>>);

impl Torch for RecordingTorch {
    fn has_torch(&self) -> bool {
        true
    }

    fn lock_for_configuration(&mut self) -> Result<(), HardwareError> {
        self.0.lock().unwrap().torch_calls.push("lock");
        Ok(())
    }

    fn unlock_for_configuration(&mut self) {
        self.0.lock().unwrap().torch_calls.push("unlock");
    }

    fn torch_mode(&self) -> TorchMode {
        if self.0.lock().unwrap().torch_on {
            TorchMode::On
        } else {
            TorchMode::Off
        }
    }

    fn set_torch_on(&mut self, level: f32) -> Result<(), HardwareError> {
        assert_eq!(level, 1.0);
        let mut recorded = self.0.lock().unwrap();
        recorded.torch_on = true;
        recorded.torch_calls.push("on");
        Ok(())
    }

    fn set_torch_off(&mut self) -> Result<(), HardwareError> {
        let mut recorded = self.0.lock().unwrap();
        recorded.torch_on = false;
        recorded.torch_calls.push("off");
        Ok(())
    }
}

struct RecordingDisplay {
    inner: FixedBrightness,
    recorded: Arc<Mutex<Recorded>>,
}

impl ScreenBrightness for RecordingDisplay {
    fn brightness(&self) -> Result<f32, HardwareError> {
        self.inner.brightness()
    }

    fn set_brightness(&mut self, level: f32) -> Result<(), HardwareError> {
        self.recorded.lock().unwrap().brightness.push(level);
        self.inner.set_brightness(level)
    }
}

/// Torch that cannot be locked, as when another process holds it
struct BusyTorch;

impl Torch for BusyTorch {
    fn has_torch(&self) -> bool {
        true
    }

    fn lock_for_configuration(&mut self) -> Result<(), HardwareError> {
        Err(HardwareError::LockFailed("busy".to_string()))
    }

    fn unlock_for_configuration(&mut self) {}

    fn torch_mode(&self) -> TorchMode {
        TorchMode::Off
    }

    fn set_torch_on(&mut self, _level: f32) -> Result<(), HardwareError> {
        panic!("configured without the lock");
    }

    fn set_torch_off(&mut self) -> Result<(), HardwareError> {
        panic!("configured without the lock");
    }
}

fn camera(name: &str, facing: Option<CameraFacing>) -> CameraDevice {
    CameraDevice {
        name: name.to_string(),
        path: format!("pipewire-serial-{name}"),
        metadata_path: None,
        facing,
    }
}

fn phone_cameras() -> Vec<CameraDevice> {
    vec![
        camera("imx258", Some(CameraFacing::Back)),
        camera("ov8858", Some(CameraFacing::Front)),
    ]
}

fn new_screen() -> (CameraScreen, Arc<Mutex<Recorded>>) {
    let recorded = Arc::new(Mutex::new(Recorded::default()));
    let hardware = Hardware::new(
        Box::new(RecordingTorch(Arc::clone(&recorded))),
        Box::new(RecordingDisplay {
            inner: FixedBrightness::new(0.4),
            recorded: Arc::clone(&recorded),
        }),
    );
    let mut screen = CameraScreen::new(&Config::default(), hardware);
    screen.authorization_changed(AuthorizationStatus::Authorized);
    (screen, recorded)
}

fn frame() -> Arc<CameraFrame> {
    Arc::new(CameraFrame {
        width: 2,
        height: 1,
        data: Arc::from(vec![0u8; 8]),
        captured_at: Instant::now(),
    })
}

fn still() -> StillImage {
    StillImage {
        width: 2,
        height: 2,
        rgba: vec![128; 16],
    }
}

#[test]
fn test_label_format_for_positive_counts() {
    for n in 1..=7300u64 {
        let expected = format!("{:02}:{:02}", (n % 3600) / 60, (n % 3600) % 60);
        assert_eq!(format_elapsed(n), expected);
    }
    assert_eq!(format_elapsed(125), "02:05");
    assert_eq!(format_elapsed(3661), "01:01");
}

#[test]
fn test_first_hold_timer_stops_after_one_tick() {
    let (mut screen, _) = new_screen();

    let press = screen.hold_pressed().unwrap();
    let timer = screen.hold_recognized(press).expect("hold should begin");
    assert!(!screen.recording_tick(timer), "no further ticks are scheduled");
    assert_eq!(screen.timer().label(), "00:01");
    assert!(!screen.timer().is_running());

    // A late tick of the same timer changes nothing
    assert!(!screen.recording_tick(timer));
    assert_eq!(screen.timer().elapsed(), 1);
}

#[test]
fn test_later_holds_count_every_second() {
    let (mut screen, _) = new_screen();

    let press = screen.hold_pressed().unwrap();
    let timer = screen.hold_recognized(press).unwrap();
    screen.recording_tick(timer);
    screen.hold_released();

    let press = screen.hold_pressed().unwrap();
    let timer = screen.hold_recognized(press).unwrap();
    for _ in 0..124 {
        assert!(screen.recording_tick(timer));
    }
    assert_eq!(screen.timer().label(), "02:05");

    screen.hold_released();
    assert!(!screen.recording_tick(timer));
    assert_eq!(screen.timer().elapsed(), 125);
}

#[test]
fn test_hold_colors_alternate() {
    let (mut screen, _) = new_screen();

    for _ in 0..3 {
        let press = screen.hold_pressed().unwrap();
        screen.hold_recognized(press);
        assert_eq!(screen.timer().color(), LabelColor::Alert);
        screen.hold_released();
        assert_eq!(screen.timer().color(), LabelColor::Normal);
    }
}

#[test]
fn test_short_press_does_not_start_the_timer() {
    let (mut screen, _) = new_screen();

    let press = screen.hold_pressed().unwrap();
    screen.hold_released();
    assert!(screen.hold_recognized(press).is_none());
    assert_eq!(screen.timer().color(), LabelColor::Normal);
    assert_eq!(screen.timer().label(), "00:00");
}

#[test]
fn test_second_finger_does_not_keep_the_timer_running() {
    let (mut screen, _) = new_screen();

    // Use up the first-tick invalidation so the next hold keeps ticking
    let press = screen.hold_pressed().unwrap();
    let timer = screen.hold_recognized(press).unwrap();
    screen.recording_tick(timer);
    screen.hold_released();

    let press = screen.hold_pressed().unwrap();
    let timer = screen.hold_recognized(press).unwrap();
    assert!(screen.recording_tick(timer));

    assert!(screen.hold_pressed().is_none());
    screen.hold_released();

    assert_eq!(screen.timer().color(), LabelColor::Normal);
    assert!(!screen.timer().is_running());
    assert!(!screen.recording_tick(timer));
}

#[test]
fn test_ghost_double_toggle_clears_overlay() {
    // Without a session
    let (mut screen, _) = new_screen();
    screen.toggle_ghost();
    screen.toggle_ghost();
    assert_eq!(screen.ghost().state(), GhostState::Inactive);
    assert_eq!(screen.ghost().opacity(), 0.0);
    assert!(screen.ghost().image().is_none());

    // With a successful capture in between
    let (mut screen, _) = new_screen();
    let token = screen.rebuild_session(&StaticBackend, &phone_cameras()).unwrap();
    screen.session_started(token);
    let GhostAction::CaptureRequested { request, .. } = screen.toggle_ghost() else {
        panic!("expected a capture request");
    };
    assert!(screen.ghost_captured(token, request, Ok(still())));
    assert_eq!(screen.ghost().opacity(), 0.6);
    assert_eq!(screen.toggle_ghost(), GhostAction::Cleared);
    assert_eq!(screen.ghost().opacity(), 0.0);
    assert!(screen.ghost().image().is_none());

    // With a capture that lands after the ghost was turned off
    let (mut screen, _) = new_screen();
    let token = screen.rebuild_session(&StaticBackend, &phone_cameras()).unwrap();
    screen.session_started(token);
    let GhostAction::CaptureRequested { request, .. } = screen.toggle_ghost() else {
        panic!("expected a capture request");
    };
    screen.toggle_ghost();
    assert!(!screen.ghost_captured(token, request, Ok(still())));
    assert_eq!(screen.ghost().opacity(), 0.0);
    assert!(screen.ghost().image().is_none());
}

#[test]
fn test_ghost_capture_failure_is_dropped() {
    let (mut screen, _) = new_screen();
    let token = screen.rebuild_session(&StaticBackend, &phone_cameras()).unwrap();
    screen.session_started(token);
    let GhostAction::CaptureRequested { request, .. } = screen.toggle_ghost() else {
        panic!("expected a capture request");
    };

    assert!(!screen.ghost_captured(token, request, Err(CaptureError::NoVideoConnection)));
    assert_eq!(screen.ghost().state(), GhostState::Active);
    assert!(screen.ghost().image().is_none());
}

#[test]
fn test_facing_toggle_always_yields_a_device() {
    let layouts = [
        phone_cameras(),
        vec![camera("imx258", Some(CameraFacing::Back))],
        vec![camera("usb", None)],
        vec![camera("ov8858", Some(CameraFacing::Front))],
    ];

    for cameras in layouts {
        let (mut screen, _) = new_screen();
        for _ in 0..4 {
            screen.toggle_facing();
            screen
                .rebuild_session(&StaticBackend, &cameras)
                .expect("a camera exists");
            assert!(screen.current_device().is_some());
        }
    }
}

#[test]
fn test_facing_selects_matching_camera() {
    let (mut screen, _) = new_screen();
    screen.rebuild_session(&StaticBackend, &phone_cameras()).unwrap();
    assert_eq!(screen.current_device().unwrap().name, "imx258");

    screen.toggle_facing();
    screen.rebuild_session(&StaticBackend, &phone_cameras()).unwrap();
    assert_eq!(screen.facing(), CameraFacing::Front);
    assert_eq!(screen.current_device().unwrap().name, "ov8858");
}

#[test]
fn test_flash_mechanism_follows_facing_at_toggle_time() {
    let (mut screen, recorded) = new_screen();

    // Back: torch on
    assert_eq!(screen.toggle_flash(), FlashAction::ToggleTorch);
    assert_eq!(screen.flash(), FlashState::On);

    // Switching cameras keeps the flash on
    screen.toggle_facing();
    assert_eq!(screen.flash(), FlashState::On);

    // Front: the "off" toggle restores the screen, the torch stays lit
    assert_eq!(screen.toggle_flash(), FlashAction::RestoreScreen);
    assert_eq!(screen.flash(), FlashState::Off);
    assert_eq!(screen.overlay_alpha(), 0.0);

    let recorded = recorded.lock().unwrap();
    assert_eq!(recorded.torch_calls, ["lock", "on", "unlock"]);
    assert!(recorded.torch_on);
    assert_eq!(recorded.brightness, [0.4]);
}

#[test]
fn test_front_flash_saves_and_restores_brightness() {
    let (mut screen, recorded) = new_screen();
    screen.toggle_facing();

    assert_eq!(screen.toggle_flash(), FlashAction::FillScreen);
    assert_eq!(screen.overlay_alpha(), 1.0);
    assert_eq!(screen.toggle_flash(), FlashAction::RestoreScreen);
    assert_eq!(screen.overlay_alpha(), 0.0);

    assert_eq!(recorded.lock().unwrap().brightness, [1.0, 0.4]);
}

#[test]
fn test_torch_lock_failure_is_ignored() {
    let hardware = Hardware::new(Box::new(BusyTorch), Box::new(FixedBrightness::default()));
    let mut screen = CameraScreen::new(&Config::default(), hardware);

    assert_eq!(screen.toggle_flash(), FlashAction::ToggleTorch);
    assert_eq!(screen.flash(), FlashState::On);
}

#[test]
fn test_stale_session_results_are_ignored() {
    let (mut screen, _) = new_screen();
    let cameras = phone_cameras();

    let old = screen.rebuild_session(&StaticBackend, &cameras).unwrap();
    screen.session_started(old);
    let GhostAction::CaptureRequested { request, .. } = screen.toggle_ghost() else {
        panic!("expected a capture request");
    };

    screen.toggle_facing();
    let new = screen.rebuild_session(&StaticBackend, &cameras).unwrap();

    assert!(!screen.session_started(old));
    assert!(!screen.frame_received(old, frame()));
    assert!(!screen.session_failed(old));
    assert!(!screen.ghost_captured(old, request, Ok(still())));
    assert!(screen.ghost().image().is_none());

    assert!(screen.transition_visible());
    assert!(screen.session_started(new));
    assert!(screen.frame_received(new, frame()));
    assert!(!screen.transition_visible());
}

#[test]
fn test_denied_run_never_builds_a_session() {
    let hardware = Hardware::new(Box::new(BusyTorch), Box::new(FixedBrightness::default()));
    let mut screen = CameraScreen::new(&Config::default(), hardware);

    assert!(matches!(
        screen.authorization_changed(AuthorizationStatus::Denied),
        SetupAction::Blocked(CameraError::AccessDenied)
    ));
    for _ in 0..2 {
        screen.toggle_facing();
        assert_eq!(
            screen.rebuild_session(&StaticBackend, &phone_cameras()),
            Err(CameraError::AccessDenied)
        );
        assert!(screen.session().is_none());
        assert!(!screen.transition_visible());
    }
    assert!(matches!(screen.toggle_ghost(), GhostAction::NoConnection));
}

#[test]
fn test_mask_geometry() {
    let mask = MaskGeometry::for_bounds(0.0, 0.0, 1080.0, 1920.0, Config::default().mask_radius_ratio());
    assert_eq!((mask.center_x, mask.center_y), (540.0, 960.0));
    assert!((mask.radius - 486.0).abs() < 0.01);
}
