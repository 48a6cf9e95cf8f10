// SPDX-License-Identifier: GPL-3.0-only

//! The camera screen state
//!
//! [`CameraScreen`] owns everything the single screen needs: the capture
//! session, the toggles (ghost, flash, facing), the hold gesture and its
//! recording timer, and the hardware used for the flash. It has no GUI
//! dependencies; the application feeds it messages and renders from its
//! accessors.

pub mod animation;
pub mod flash_mode;
pub mod gesture;
pub mod ghost;
pub mod overlay;
pub mod timer;

pub use animation::{Animations, Control, PressStage};
pub use flash_mode::{FlashAction, FlashState, flash_transition};
pub use gesture::{HoldGesture, HoldRecognizer, PressId, Release};
pub use ghost::{CaptureRequest, GhostOverlay, GhostState};
pub use overlay::MaskGeometry;
pub use timer::{LabelColor, RecordingState, RecordingTimer, TickOutcome, TimerId, format_elapsed};

use crate::backends::camera::session;
use crate::backends::camera::{
    AuthorizationStatus, CameraBackend, CameraDevice, CameraFacing, CameraFrame, CaptureSession,
    SessionToken, SetupAction, StillImage, StillImageOutput,
};
use crate::backlight::{self, ScreenBrightness};
use crate::config::Config;
use crate::constants::hardware;
use crate::errors::{CameraError, CaptureError};
use crate::flash::{self, SysfsTorch, Torch};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Flash hardware: the torch for the back camera, the display for the front
pub struct Hardware {
    pub torch: Box<dyn Torch>,
    pub display: Box<dyn ScreenBrightness>,
}

impl Hardware {
    pub fn new(torch: Box<dyn Torch>, display: Box<dyn ScreenBrightness>) -> Self {
        Self { torch, display }
    }

    /// Discover the system torch and backlight
    pub fn detect() -> Self {
        Self::new(
            Box::new(SysfsTorch::discover()),
            backlight::detect_display(),
        )
    }
}

impl std::fmt::Debug for Hardware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hardware")
            .field("has_torch", &self.torch.has_torch())
            .finish_non_exhaustive()
    }
}

/// Outcome of a ghost toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GhostAction {
    /// Ghost turned off, overlay cleared
    Cleared,
    /// Ghost turned on; capture a still for this request
    CaptureRequested {
        token: SessionToken,
        request: CaptureRequest,
        output: StillImageOutput,
    },
    /// Ghost turned on, but there is no running session to capture from
    NoConnection,
}

#[derive(Debug)]
pub struct CameraScreen {
    facing: CameraFacing,
    ghost: GhostOverlay,
    flash: FlashState,
    hold: HoldRecognizer,
    timer: RecordingTimer,
    /// Alpha of the mask's surround (0 normally, 1 while the front flash is on)
    overlay_alpha: f32,
    saved_brightness: f32,
    authorization: Option<AuthorizationStatus>,
    session: Option<CaptureSession>,
    /// Newest complete frame of the current session, the source of ghost stills
    latest_frame: Option<Arc<CameraFrame>>,
    last_token: SessionToken,
    still_output: StillImageOutput,
    transition: bool,
    animations: Animations,
    hardware: Hardware,
    ghost_opacity: f32,
    torch_level: f32,
    mask_radius_ratio: f32,
    hold_delay_ms: u64,
}

impl CameraScreen {
    pub fn new(config: &Config, hardware: Hardware) -> Self {
        let saved_brightness = hardware
            .display
            .brightness()
            .unwrap_or(hardware::FULL_SCREEN_BRIGHTNESS);

        Self {
            facing: config.last_facing,
            ghost: GhostOverlay::default(),
            flash: FlashState::Off,
            hold: HoldRecognizer::default(),
            timer: RecordingTimer::new(),
            overlay_alpha: 0.0,
            saved_brightness,
            authorization: None,
            session: None,
            latest_frame: None,
            last_token: SessionToken::default(),
            still_output: StillImageOutput::default(),
            transition: false,
            animations: Animations::default(),
            hardware,
            ghost_opacity: config.ghost_opacity(),
            torch_level: config.torch_level(),
            mask_radius_ratio: config.mask_radius_ratio(),
            hold_delay_ms: config.hold_delay_ms,
        }
    }

    /// Pick up changed settings. The facing is only read at startup.
    pub fn apply_settings(&mut self, config: &Config) {
        self.ghost_opacity = config.ghost_opacity();
        self.torch_level = config.torch_level();
        self.mask_radius_ratio = config.mask_radius_ratio();
        self.hold_delay_ms = config.hold_delay_ms;
    }

    // Authorization

    /// Record the authorization status and decide how setup continues.
    ///
    /// A blocked status tears down any session, leaving the preview blank.
    pub fn authorization_changed(&mut self, status: AuthorizationStatus) -> SetupAction {
        self.authorization = Some(status);
        let action = status.setup_action();
        if let SetupAction::Blocked(ref error) = action {
            warn!(%status, %error, "Camera unavailable, preview stays blank");
            self.teardown();
        }
        action
    }

    pub fn authorization(&self) -> Option<AuthorizationStatus> {
        self.authorization
    }

    fn is_authorized(&self) -> bool {
        self.authorization == Some(AuthorizationStatus::Authorized)
    }

    fn teardown(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.stop();
        }
        self.latest_frame = None;
        self.transition = false;
    }

    // Session

    /// Tear down the current session and build one for the current facing.
    ///
    /// The new token is issued even when the build fails, so results still in
    /// flight for the old session are dropped either way. Frames of the old
    /// session are discarded so they cannot become ghost stills of the new one.
    pub fn rebuild_session(
        &mut self,
        backend: &dyn CameraBackend,
        devices: &[CameraDevice],
    ) -> Result<SessionToken, CameraError> {
        let token = self.last_token.next();
        self.last_token = token;
        self.latest_frame = None;

        if !self.is_authorized() {
            self.teardown();
            return Err(CameraError::AccessDenied);
        }

        match session::rebuild_session(self.session.take(), backend, devices, self.facing, token) {
            Ok(session) => {
                self.session = Some(session);
                Ok(token)
            }
            Err(e) => {
                self.transition = false;
                Err(e)
            }
        }
    }

    pub fn is_current(&self, token: SessionToken) -> bool {
        self.session.as_ref().is_some_and(|s| s.token() == token)
    }

    /// The backend finished starting the session identified by `token`
    pub fn session_started(&mut self, token: SessionToken) -> bool {
        match self.session.as_mut() {
            Some(session) if session.token() == token => {
                let started = session.mark_running();
                if started {
                    info!(%token, "Capture session running");
                }
                started
            }
            _ => {
                debug!(%token, "Ignoring start of a superseded session");
                false
            }
        }
    }

    /// The session identified by `token` could not start or lost its preview
    pub fn session_failed(&mut self, token: SessionToken) -> bool {
        if !self.is_current(token) {
            debug!(%token, "Ignoring failure of a superseded session");
            return false;
        }
        self.teardown();
        true
    }

    /// A preview frame arrived. Returns false for frames of an old session.
    pub fn frame_received(&mut self, token: SessionToken, frame: Arc<CameraFrame>) -> bool {
        let live = self
            .session
            .as_ref()
            .is_some_and(|s| s.token() == token && s.is_running());
        if live {
            self.transition = false;
            self.latest_frame = Some(frame);
        }
        live
    }

    pub fn latest_frame(&self) -> Option<&Arc<CameraFrame>> {
        self.latest_frame.as_ref()
    }

    /// Flip the facing and show the transition overlay until the new session delivers
    pub fn toggle_facing(&mut self) -> CameraFacing {
        self.facing = self.facing.toggled();
        self.transition = true;
        info!(facing = %self.facing, flash = ?self.flash, "Camera facing switched");
        self.facing
    }

    // Hold gesture and recording timer

    /// Returns the press to recognize after the hold delay, or None while a hold is active
    pub fn hold_pressed(&mut self) -> Option<PressId> {
        self.hold.press()
    }

    /// The hold delay for `id` elapsed. Returns the timer to tick if recording began.
    pub fn hold_recognized(&mut self, id: PressId) -> Option<TimerId> {
        if !self.hold.recognize(id) {
            return None;
        }
        let timer = self.timer.start();
        debug!(elapsed = self.timer.elapsed(), "Recording timer started");
        Some(timer)
    }

    pub fn hold_released(&mut self) {
        if self.hold.release() == Release::Ended {
            self.timer.stop();
            debug!(elapsed = self.timer.elapsed(), "Recording timer stopped");
        }
    }

    /// Deliver a tick. Returns true when another tick should be scheduled.
    pub fn recording_tick(&mut self, id: TimerId) -> bool {
        match self.timer.tick(id) {
            TickOutcome::Reschedule => true,
            TickOutcome::Invalidated => {
                debug!(label = self.timer.label(), "Recording timer invalidated on first tick");
                false
            }
            TickOutcome::Ignored => false,
        }
    }

    // Control animations

    /// Start the press animation of `control`; false while it is still animating
    pub fn press_control(&mut self, control: Control) -> bool {
        self.animations.begin(control)
    }

    /// Scale-up of `control` finished; true when its action should run
    pub fn control_peaked(&mut self, control: Control) -> bool {
        self.animations.peak(control)
    }

    pub fn control_finished(&mut self, control: Control) {
        self.animations.finish(control);
    }

    // Ghost

    /// Still output settings used for ghost captures
    pub fn configure_still_output(&mut self) {
        self.still_output.configure_for_ghost();
    }

    pub fn toggle_ghost(&mut self) -> GhostAction {
        self.configure_still_output();

        if self.ghost.is_active() {
            self.ghost.deactivate();
            debug!("Ghost overlay cleared");
            return GhostAction::Cleared;
        }

        let request = self.ghost.activate();
        let output = self.still_output;
        let Some(session) = self.session.as_mut() else {
            warn!("No capture session, ghost still not captured");
            self.ghost.abandon(request);
            return GhostAction::NoConnection;
        };

        if session.can_add_output(&output) {
            session.add_output(output);
        }

        if !session.has_video_connection() {
            warn!(token = %session.token(), "No video connection, ghost still not captured");
            self.ghost.abandon(request);
            return GhostAction::NoConnection;
        }

        GhostAction::CaptureRequested {
            token: session.token(),
            request,
            output: session.still_output().copied().unwrap_or(output),
        }
    }

    /// A still capture finished. Returns true when it is now shown.
    pub fn ghost_captured(
        &mut self,
        token: SessionToken,
        request: CaptureRequest,
        result: Result<StillImage, CaptureError>,
    ) -> bool {
        if !self.is_current(token) {
            debug!(%token, "Dropping still from a superseded session");
            self.ghost.abandon(request);
            return false;
        }

        match result {
            Ok(image) => {
                let (width, height) = (image.width, image.height);
                let shown = self.ghost.show(request, image, self.ghost_opacity);
                if shown {
                    debug!(width, height, "Ghost still shown");
                } else {
                    debug!("Dropping still, ghost was turned off");
                }
                shown
            }
            Err(e) => {
                warn!(error = %e, "Ghost still capture failed");
                self.ghost.abandon(request);
                false
            }
        }
    }

    // Flash

    /// Toggle the flash with the mechanism selected by the current facing
    pub fn toggle_flash(&mut self) -> FlashAction {
        let (next, action) = flash_transition(self.flash, self.facing);

        match action {
            FlashAction::FillScreen => {
                self.overlay_alpha = 1.0;
                match self.hardware.display.brightness() {
                    Ok(level) => self.saved_brightness = level,
                    Err(e) => warn!(error = %e, "Failed to read screen brightness"),
                }
                if let Err(e) = self
                    .hardware
                    .display
                    .set_brightness(hardware::FULL_SCREEN_BRIGHTNESS)
                {
                    warn!(error = %e, "Failed to raise screen brightness");
                }
            }
            FlashAction::RestoreScreen => {
                self.overlay_alpha = 0.0;
                if let Err(e) = self.hardware.display.set_brightness(self.saved_brightness) {
                    warn!(error = %e, "Failed to restore screen brightness");
                }
            }
            FlashAction::ToggleTorch => {
                flash::toggle_torch(self.hardware.torch.as_mut(), self.torch_level);
            }
        }

        info!(from = ?self.flash, to = ?next, ?action, facing = %self.facing, "Flash toggled");
        self.flash = next;
        action
    }

    // View accessors

    pub fn facing(&self) -> CameraFacing {
        self.facing
    }

    pub fn flash(&self) -> FlashState {
        self.flash
    }

    pub fn ghost(&self) -> &GhostOverlay {
        &self.ghost
    }

    pub fn timer(&self) -> &RecordingTimer {
        &self.timer
    }

    pub fn hold(&self) -> HoldGesture {
        self.hold.gesture()
    }

    pub fn overlay_alpha(&self) -> f32 {
        self.overlay_alpha
    }

    pub fn transition_visible(&self) -> bool {
        self.transition
    }

    pub fn session(&self) -> Option<&CaptureSession> {
        self.session.as_ref()
    }

    pub fn current_device(&self) -> Option<&CameraDevice> {
        self.session.as_ref().and_then(CaptureSession::device)
    }

    pub fn scale(&self, control: Control) -> f32 {
        self.animations.scale(control)
    }

    pub fn mask_radius_ratio(&self) -> f32 {
        self.mask_radius_ratio
    }

    pub fn hold_delay_ms(&self) -> u64 {
        self.hold_delay_ms
    }

    pub fn has_torch(&self) -> bool {
        self.hardware.torch.has_torch()
    }

    /// Mechanism the next flash toggle would use
    pub fn flash_mechanism(&self) -> FlashAction {
        flash_transition(self.flash, self.facing).1
    }

    /// Icon of the mode button: the camera it switches to
    pub fn mode_icon_name(&self) -> &'static str {
        match self.facing {
            CameraFacing::Back => "selfie",
            CameraFacing::Front => "rear",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::{BackendResult, DeviceInput};
    use crate::backlight::FixedBrightness;
    use crate::errors::HardwareError;
    use crate::flash::TorchMode;
    use std::sync::{Arc, Mutex};
    use std::time::Instant;

    #[derive(Default)]
    struct TorchLog {
        on: bool,
        calls: Vec<&'static str>,
    }

    struct FakeTorch(Arc<Mutex<TorchLog>>);

    impl Torch for FakeTorch {
        fn has_torch(&self) -> bool {
            true
        }
        fn lock_for_configuration(&mut self) -> Result<(), HardwareError> {
            self.0.lock().unwrap().calls.push("lock");
            Ok(())
        }
        fn unlock_for_configuration(&mut self) {
            self.0.lock().unwrap().calls.push("unlock");
        }
        fn torch_mode(&self) -> TorchMode {
            if self.0.lock().unwrap().on { TorchMode::On } else { TorchMode::Off }
        }
        fn set_torch_on(&mut self, _level: f32) -> Result<(), HardwareError> {
            let mut log = self.0.lock().unwrap();
            log.on = true;
            log.calls.push("on");
            Ok(())
        }
        fn set_torch_off(&mut self) -> Result<(), HardwareError> {
            let mut log = self.0.lock().unwrap();
            log.on = false;
            log.calls.push("off");
            Ok(())
        }
    }

    struct FakeBackend;

    impl CameraBackend for FakeBackend {
        fn is_available(&self) -> bool {
            true
        }
        fn enumerate_cameras(&self) -> Vec<CameraDevice> {
            Vec::new()
        }
        fn open_input(&self, device: &CameraDevice) -> BackendResult<DeviceInput> {
            Ok(DeviceInput {
                device: device.clone(),
                source: String::new(),
            })
        }
        fn start(&self, _input: &DeviceInput) -> BackendResult<()> {
            Ok(())
        }
    }

    fn devices() -> Vec<CameraDevice> {
        [("rear", CameraFacing::Back), ("selfie", CameraFacing::Front)]
            .into_iter()
            .map(|(name, facing)| CameraDevice {
                name: name.to_string(),
                path: name.to_string(),
                metadata_path: None,
                facing: Some(facing),
            })
            .collect()
    }

    fn unauthorized_screen() -> (CameraScreen, Arc<Mutex<TorchLog>>) {
        let log = Arc::new(Mutex::new(TorchLog::default()));
        let hardware = Hardware::new(
            Box::new(FakeTorch(log.clone())),
            Box::new(FixedBrightness::new(0.3)),
        );
        (CameraScreen::new(&Config::default(), hardware), log)
    }

    fn screen() -> (CameraScreen, Arc<Mutex<TorchLog>>) {
        let (mut screen, log) = unauthorized_screen();
        screen.authorization_changed(AuthorizationStatus::Authorized);
        (screen, log)
    }

    fn frame() -> Arc<CameraFrame> {
        Arc::new(CameraFrame {
            width: 1,
            height: 1,
            data: Arc::from(vec![255u8; 4]),
            captured_at: Instant::now(),
        })
    }

    fn still() -> StillImage {
        StillImage {
            width: 2,
            height: 1,
            rgba: vec![0; 8],
        }
    }

    #[test]
    fn front_flash_fills_and_restores_the_screen() {
        let (mut screen, log) = screen();
        screen.toggle_facing();

        assert_eq!(screen.toggle_flash(), FlashAction::FillScreen);
        assert_eq!(screen.overlay_alpha(), 1.0);
        assert_eq!(screen.hardware.display.brightness().unwrap(), 1.0);

        assert_eq!(screen.toggle_flash(), FlashAction::RestoreScreen);
        assert_eq!(screen.overlay_alpha(), 0.0);
        assert_eq!(screen.hardware.display.brightness().unwrap(), 0.3);
        assert!(log.lock().unwrap().calls.is_empty());
    }

    #[test]
    fn back_flash_locks_around_torch_changes() {
        let (mut screen, log) = screen();
        screen.toggle_flash();
        screen.toggle_flash();
        assert_eq!(
            log.lock().unwrap().calls,
            ["lock", "on", "unlock", "lock", "off", "unlock"]
        );
        assert_eq!(screen.flash(), FlashState::Off);
    }

    #[test]
    fn rebuild_issues_a_new_token() {
        let (mut screen, _) = screen();
        let first = screen.rebuild_session(&FakeBackend, &devices()).unwrap();
        assert!(screen.session_started(first));
        assert_eq!(screen.current_device().unwrap().name, "rear");

        screen.toggle_facing();
        assert!(screen.transition_visible());
        let second = screen.rebuild_session(&FakeBackend, &devices()).unwrap();
        assert_ne!(first, second);
        assert_eq!(screen.current_device().unwrap().name, "selfie");

        assert!(!screen.session_started(first));
        assert!(!screen.frame_received(first, frame()));
        assert!(screen.session_started(second));
        assert!(screen.frame_received(second, frame()));
        assert!(!screen.transition_visible());
    }

    #[test]
    fn failed_rebuild_clears_the_transition() {
        let (mut screen, _) = screen();
        screen.toggle_facing();
        assert_eq!(
            screen.rebuild_session(&FakeBackend, &[]),
            Err(CameraError::NoCameraFound)
        );
        assert!(!screen.transition_visible());
        assert!(screen.session().is_none());
    }

    #[test]
    fn ghost_needs_a_running_session() {
        let (mut screen, _) = screen();
        assert_eq!(screen.toggle_ghost(), GhostAction::NoConnection);
        assert_eq!(screen.ghost().state(), GhostState::Active);
        assert_eq!(screen.toggle_ghost(), GhostAction::Cleared);

        let token = screen.rebuild_session(&FakeBackend, &devices()).unwrap();
        screen.session_started(token);
        let GhostAction::CaptureRequested { token: capture_token, request, output } =
            screen.toggle_ghost()
        else {
            panic!("expected a capture request");
        };
        assert_eq!(capture_token, token);
        assert!(!output.high_resolution);
        assert!(screen.session().unwrap().still_output().is_some());

        assert!(screen.ghost_captured(token, request, Ok(still())));
        assert_eq!(screen.ghost().opacity(), 0.6);
    }

    #[test]
    fn still_from_an_old_session_is_dropped() {
        let (mut screen, _) = screen();
        let token = screen.rebuild_session(&FakeBackend, &devices()).unwrap();
        screen.session_started(token);
        let GhostAction::CaptureRequested { request, .. } = screen.toggle_ghost() else {
            panic!("expected a capture request");
        };

        screen.toggle_facing();
        screen.rebuild_session(&FakeBackend, &devices()).unwrap();
        assert!(!screen.ghost_captured(token, request, Ok(still())));
        assert!(screen.ghost().image().is_none());
    }

    #[test]
    fn hold_drives_the_timer() {
        let (mut screen, _) = screen();
        let press = screen.hold_pressed().unwrap();
        let timer = screen.hold_recognized(press).unwrap();
        assert_eq!(screen.timer().color(), LabelColor::Alert);
        assert!(!screen.recording_tick(timer));
        assert_eq!(screen.timer().label(), "00:01");

        screen.hold_released();
        assert_eq!(screen.timer().color(), LabelColor::Normal);

        let press = screen.hold_pressed().unwrap();
        screen.hold_released();
        assert!(screen.hold_recognized(press).is_none());
    }

    #[test]
    fn mode_icon_names_the_other_camera() {
        let (mut screen, _) = screen();
        assert_eq!(screen.mode_icon_name(), "selfie");
        screen.toggle_facing();
        assert_eq!(screen.mode_icon_name(), "rear");
    }

    #[test]
    fn denied_access_never_builds_a_session() {
        for status in [AuthorizationStatus::Denied, AuthorizationStatus::Restricted] {
            let (mut screen, _) = unauthorized_screen();
            assert_eq!(
                screen.authorization_changed(status),
                SetupAction::Blocked(CameraError::AccessDenied)
            );
            assert_eq!(
                screen.rebuild_session(&FakeBackend, &devices()),
                Err(CameraError::AccessDenied)
            );
            assert!(screen.session().is_none());
            assert!(screen.current_device().is_none());
        }
    }

    #[test]
    fn access_request_then_grant_sets_up() {
        let (mut screen, _) = unauthorized_screen();
        assert_eq!(
            screen.authorization_changed(AuthorizationStatus::NotDetermined),
            SetupAction::RequestAccess
        );
        assert_eq!(
            screen.rebuild_session(&FakeBackend, &devices()),
            Err(CameraError::AccessDenied)
        );

        let granted = AuthorizationStatus::from_access_response(true);
        assert_eq!(screen.authorization_changed(granted), SetupAction::Enumerate);
        assert!(screen.rebuild_session(&FakeBackend, &devices()).is_ok());
        assert_eq!(screen.authorization(), Some(AuthorizationStatus::Authorized));
    }

    #[test]
    fn revoked_access_tears_down_the_session() {
        let (mut screen, _) = screen();
        let token = screen.rebuild_session(&FakeBackend, &devices()).unwrap();
        screen.session_started(token);
        assert!(screen.frame_received(token, frame()));

        screen.authorization_changed(AuthorizationStatus::Denied);
        assert!(screen.session().is_none());
        assert!(screen.latest_frame().is_none());
        assert!(!screen.frame_received(token, frame()));
    }

    #[test]
    fn rebuild_discards_frames_of_the_old_session() {
        let (mut screen, _) = screen();
        let token = screen.rebuild_session(&FakeBackend, &devices()).unwrap();
        screen.session_started(token);
        assert!(screen.frame_received(token, frame()));
        assert!(screen.latest_frame().is_some());

        screen.toggle_facing();
        let next = screen.rebuild_session(&FakeBackend, &devices()).unwrap();
        assert!(screen.latest_frame().is_none());

        screen.session_started(next);
        assert!(!screen.frame_received(token, frame()));
        assert!(screen.latest_frame().is_none());
    }
}
