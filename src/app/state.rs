// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use crate::backends::camera::{
    AuthorizationStatus, CameraBackend, CameraDevice, CameraFrame, SessionToken, StillImage,
};
use crate::config::Config;
use crate::errors::{CameraError, CaptureError};
use crate::screen::{CameraScreen, CaptureRequest, Control, PressId, TimerId};
use cosmic::cosmic_config;
use cosmic::widget::about::About;
use cosmic::widget::image::Handle;
use std::sync::Arc;

/// The application model stores app-specific state used to describe its interface and
/// drive its logic.
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    pub core: cosmic::Core,
    /// Display a context drawer with the designated page if defined.
    pub context_page: ContextPage,
    /// The about page for this app.
    pub about: About,
    /// Configuration data that persists between application runs.
    pub config: Config,
    /// Configuration handler for saving settings
    pub config_handler: Option<cosmic_config::Config>,
    /// Session, toggles, gesture and timer state of the camera screen
    pub screen: CameraScreen,
    /// Camera backend used for enumeration and device inputs
    pub backend: Arc<dyn CameraBackend>,
    /// Cameras found by the last enumeration
    pub available_cameras: Vec<CameraDevice>,
    /// Preview image built from the latest frame
    pub preview: Option<Handle>,
    /// Ghost still image
    pub ghost_image: Option<Handle>,
}

/// The context page to display in the context drawer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ContextPage {
    #[default]
    About,
    Info,
}

/// Messages emitted by the application and its widgets.
///
/// Messages are organized into logical groups:
/// - **UI Navigation**: context pages and configuration
/// - **Camera Setup**: authorization, enumeration, session lifecycle, frames
/// - **Gestures**: the hold gesture and its recording timer
/// - **Controls**: ghost, flash and mode buttons with their press animations
#[derive(Debug, Clone)]
pub enum Message {
    // ===== UI Navigation =====
    /// Open external URL (repository, etc.)
    LaunchUrl(String),
    /// Toggle context drawer page (About, Info)
    ToggleContextPage(ContextPage),
    /// Configuration changed on disk
    UpdateConfig(Config),

    // ===== Camera Setup =====
    /// Authorization status queried on startup
    AuthorizationChecked(AuthorizationStatus),
    /// The user answered the access request
    AccessRequested(bool),
    /// Device enumeration finished
    CamerasEnumerated(Vec<CameraDevice>),
    /// The backend started the session
    SessionStarted(SessionToken),
    /// The backend could not start the session
    SessionFailed(SessionToken, CameraError),
    /// New preview frame from the session's pipeline
    CameraFrame(SessionToken, Arc<CameraFrame>),
    /// The preview pipeline failed or ended
    PreviewFailed(SessionToken, String),

    // ===== Gestures =====
    /// Pointer pressed on the preview
    HoldPressed,
    /// The hold delay of a press elapsed
    HoldRecognized(PressId),
    /// Pointer released or left the preview
    HoldReleased,
    /// Recording timer tick
    RecordingTick(TimerId),

    // ===== Controls =====
    GhostPressed,
    FlashPressed,
    ModePressed,
    /// Scale-up stage of a press animation finished
    PressPeak(Control),
    /// Scale-down stage of a press animation finished
    PressFinished(Control),
    /// A ghost still capture finished
    StillCaptured {
        token: SessionToken,
        request: CaptureRequest,
        result: Result<StillImage, CaptureError>,
    },
}
