// SPDX-License-Identifier: GPL-3.0-only

//! Camera setup handlers
//!
//! Authorization, device enumeration, session lifecycle, preview frames and
//! the front/back switch. Every session result carries the token of the
//! session it was started for; results for any other token are dropped.

use crate::app::state::{AppModel, Message};
use crate::backends::camera::{
    AuthorizationStatus, CameraDevice, CameraFrame, SessionToken, SetupAction, authorization,
};
use crate::errors::CameraError;
use cosmic::Task;
use cosmic::cosmic_config::CosmicConfigEntry;
use cosmic::widget::image::Handle;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

impl AppModel {
    // =========================================================================
    // Authorization
    // =========================================================================

    pub(crate) fn handle_authorization_checked(
        &mut self,
        status: AuthorizationStatus,
    ) -> Task<cosmic::Action<Message>> {
        info!(%status, "Camera authorization checked");

        match self.screen.authorization_changed(status) {
            SetupAction::Enumerate => self.enumerate_cameras_task(),
            SetupAction::RequestAccess => Task::perform(
                authorization::request_access(),
                |granted| cosmic::Action::App(Message::AccessRequested(granted)),
            ),
            SetupAction::Blocked(_) => {
                self.preview = None;
                Task::none()
            }
        }
    }

    pub(crate) fn handle_access_requested(&mut self, granted: bool) -> Task<cosmic::Action<Message>> {
        self.handle_authorization_checked(AuthorizationStatus::from_access_response(granted))
    }

    // =========================================================================
    // Enumeration and session setup
    // =========================================================================

    fn enumerate_cameras_task(&self) -> Task<cosmic::Action<Message>> {
        let backend = Arc::clone(&self.backend);
        Task::perform(
            async move {
                tokio::task::spawn_blocking(move || backend.enumerate_cameras())
                    .await
                    .unwrap_or_else(|e| {
                        error!(error = %e, "Camera enumeration task failed");
                        Vec::new()
                    })
            },
            |cameras| cosmic::Action::App(Message::CamerasEnumerated(cameras)),
        )
    }

    pub(crate) fn handle_cameras_enumerated(
        &mut self,
        cameras: Vec<CameraDevice>,
    ) -> Task<cosmic::Action<Message>> {
        info!(count = cameras.len(), "Cameras enumerated");
        self.available_cameras = cameras;
        self.setup_session()
    }

    /// Replace the capture session for the current facing and start it
    pub(crate) fn setup_session(&mut self) -> Task<cosmic::Action<Message>> {
        let token = match self
            .screen
            .rebuild_session(self.backend.as_ref(), &self.available_cameras)
        {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Capture session setup aborted");
                self.preview = None;
                return Task::none();
            }
        };

        let Some(input) = self
            .screen
            .session()
            .and_then(|session| session.input())
            .cloned()
        else {
            return Task::none();
        };

        let backend = Arc::clone(&self.backend);
        Task::perform(
            async move {
                match tokio::task::spawn_blocking(move || backend.start(&input)).await {
                    Ok(result) => result.map_err(|e| CameraError::StartFailed(e.to_string())),
                    Err(e) => Err(CameraError::StartFailed(e.to_string())),
                }
            },
            move |result| {
                cosmic::Action::App(match result {
                    Ok(()) => Message::SessionStarted(token),
                    Err(error) => Message::SessionFailed(token, error),
                })
            },
        )
    }

    pub(crate) fn handle_session_started(
        &mut self,
        token: SessionToken,
    ) -> Task<cosmic::Action<Message>> {
        // The preview subscription keys on the running session's token
        if !self.screen.session_started(token) {
            debug!(%token, "Stale session start ignored");
        }
        Task::none()
    }

    pub(crate) fn handle_session_failed(
        &mut self,
        token: SessionToken,
        error: CameraError,
    ) -> Task<cosmic::Action<Message>> {
        if self.screen.session_failed(token) {
            warn!(%token, %error, "Capture session failed to start");
            self.preview = None;
        }
        Task::none()
    }

    // =========================================================================
    // Preview frames
    // =========================================================================

    pub(crate) fn handle_camera_frame(
        &mut self,
        token: SessionToken,
        frame: Arc<CameraFrame>,
    ) -> Task<cosmic::Action<Message>> {
        if !frame.is_complete() {
            debug!(width = frame.width, height = frame.height, "Incomplete frame skipped");
            return Task::none();
        }

        let preview = Handle::from_rgba(frame.width, frame.height, frame.data.to_vec());
        if self.screen.frame_received(token, frame) {
            self.preview = Some(preview);
        }
        Task::none()
    }

    pub(crate) fn handle_preview_failed(
        &mut self,
        token: SessionToken,
        error: String,
    ) -> Task<cosmic::Action<Message>> {
        if self.screen.session_failed(token) {
            warn!(%token, error = %error, "Preview pipeline stopped");
            self.preview = None;
        }
        Task::none()
    }

    // =========================================================================
    // Front/back switch
    // =========================================================================

    /// Flip the facing, remember it and rebuild the session
    pub(crate) fn switch_facing(&mut self) -> Task<cosmic::Action<Message>> {
        let facing = self.screen.toggle_facing();

        self.config.last_facing = facing;
        if let Some(handler) = self.config_handler.as_ref()
            && let Err(err) = self.config.write_entry(handler)
        {
            error!(?err, "Failed to save camera facing");
        }

        self.setup_session()
    }
}
