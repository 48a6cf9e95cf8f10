// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The main `update()` function acts as a dispatcher; the handlers live in the
//! `handlers` submodules, grouped by functional domain.
//!
//! # Handler Modules
//!
//! - `handlers::ui`: context pages and configuration
//! - `handlers::camera`: authorization, enumeration, session lifecycle, frames, facing
//! - `handlers::capture`: hold timer, ghost stills, flash, press animations

use crate::app::state::{AppModel, Message};
use cosmic::Task;

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            // ===== UI Navigation =====
            Message::LaunchUrl(url) => self.handle_launch_url(url),
            Message::ToggleContextPage(page) => self.handle_toggle_context_page(page),
            Message::UpdateConfig(config) => self.handle_update_config(config),

            // ===== Camera Setup =====
            Message::AuthorizationChecked(status) => self.handle_authorization_checked(status),
            Message::AccessRequested(granted) => self.handle_access_requested(granted),
            Message::CamerasEnumerated(cameras) => self.handle_cameras_enumerated(cameras),
            Message::SessionStarted(token) => self.handle_session_started(token),
            Message::SessionFailed(token, error) => self.handle_session_failed(token, error),
            Message::CameraFrame(token, frame) => self.handle_camera_frame(token, frame),
            Message::PreviewFailed(token, error) => self.handle_preview_failed(token, error),

            // ===== Gestures =====
            Message::HoldPressed => self.handle_hold_pressed(),
            Message::HoldRecognized(id) => self.handle_hold_recognized(id),
            Message::HoldReleased => self.handle_hold_released(),
            Message::RecordingTick(id) => self.handle_recording_tick(id),

            // ===== Controls =====
            Message::GhostPressed => self.handle_control_pressed(crate::screen::Control::Ghost),
            Message::FlashPressed => self.handle_control_pressed(crate::screen::Control::Flash),
            Message::ModePressed => self.handle_control_pressed(crate::screen::Control::Mode),
            Message::PressPeak(control) => self.handle_press_peak(control),
            Message::PressFinished(control) => self.handle_press_finished(control),
            Message::StillCaptured {
                token,
                request,
                result,
            } => self.handle_still_captured(token, request, result),
        }
    }
}
