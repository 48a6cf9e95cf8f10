// SPDX-License-Identifier: GPL-3.0-only

//! Capture session
//!
//! A [`CaptureSession`] describes one live camera pipeline: a single device
//! input, an optional still image output and a run state. Sessions are never
//! retargeted. Switching cameras drops the old session and builds a new one
//! with the next [`SessionToken`], so anything that outlives a session can be
//! recognised by its stale token.

use super::CameraBackend;
use super::types::{CameraDevice, CameraFacing};
use crate::constants::capture;
use crate::errors::CameraError;
use tracing::{debug, info, warn};

/// Generation counter identifying one capture session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SessionToken(u64);

impl SessionToken {
    pub fn next(self) -> Self {
        SessionToken(self.0.wrapping_add(1))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A device ready to be attached to a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInput {
    pub device: CameraDevice,
    /// `pipewiresrc` properties selecting the device (may be empty for the default node)
    pub source: String,
}

/// Still image codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StillCodec {
    #[default]
    Jpeg,
}

/// Still image output settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StillImageOutput {
    pub codec: StillCodec,
    /// When false, stills are scaled down to preview size
    pub high_resolution: bool,
    pub quality: u8,
}

impl Default for StillImageOutput {
    fn default() -> Self {
        Self {
            codec: StillCodec::Jpeg,
            high_resolution: false,
            quality: capture::JPEG_QUALITY,
        }
    }
}

impl StillImageOutput {
    /// Settings used for ghost stills: JPEG at preview resolution
    pub fn configure_for_ghost(&mut self) {
        self.codec = StillCodec::Jpeg;
        self.high_resolution = false;
    }
}

/// Run state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Built, waiting for the async start to finish
    Configured,
    /// Streaming preview frames
    Running,
    /// Torn down
    Stopped,
}

/// One live camera pipeline
#[derive(Debug, Clone)]
pub struct CaptureSession {
    token: SessionToken,
    input: Option<DeviceInput>,
    still_output: Option<StillImageOutput>,
    state: SessionState,
}

impl CaptureSession {
    pub fn new(token: SessionToken) -> Self {
        Self {
            token,
            input: None,
            still_output: None,
            state: SessionState::Configured,
        }
    }

    pub fn token(&self) -> SessionToken {
        self.token
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    /// A session takes exactly one input, before it starts
    pub fn can_add_input(&self, _input: &DeviceInput) -> bool {
        self.input.is_none() && self.state == SessionState::Configured
    }

    pub fn add_input(&mut self, input: DeviceInput) -> Result<(), CameraError> {
        if !self.can_add_input(&input) {
            return Err(CameraError::InputRejected(input.device.name));
        }
        self.input = Some(input);
        Ok(())
    }

    pub fn input(&self) -> Option<&DeviceInput> {
        self.input.as_ref()
    }

    pub fn device(&self) -> Option<&CameraDevice> {
        self.input.as_ref().map(|input| &input.device)
    }

    pub fn can_add_output(&self, _output: &StillImageOutput) -> bool {
        self.still_output.is_none() && self.state != SessionState::Stopped
    }

    pub fn add_output(&mut self, output: StillImageOutput) {
        if self.can_add_output(&output) {
            self.still_output = Some(output);
        }
    }

    pub fn still_output(&self) -> Option<&StillImageOutput> {
        self.still_output.as_ref()
    }

    /// Video connection for still capture: a running session with an input
    pub fn has_video_connection(&self) -> bool {
        self.is_running() && self.input.is_some()
    }

    /// Mark the session as streaming. Only a configured session with an input can start.
    pub fn mark_running(&mut self) -> bool {
        if self.state == SessionState::Configured && self.input.is_some() {
            self.state = SessionState::Running;
            true
        } else {
            false
        }
    }

    pub fn stop(&mut self) {
        self.state = SessionState::Stopped;
    }
}

/// Last device positioned at the front, if any
pub fn find_front_camera(devices: &[CameraDevice]) -> Option<&CameraDevice> {
    let mut result = None;
    for device in devices {
        if device.is_facing(CameraFacing::Front) {
            result = Some(device);
        }
    }
    result
}

/// First back-facing device, else the first device
pub fn default_camera(devices: &[CameraDevice]) -> Option<&CameraDevice> {
    devices
        .iter()
        .find(|device| device.is_facing(CameraFacing::Back))
        .or_else(|| devices.first())
}

/// Pick the device for `facing`.
///
/// A missing front camera falls back to the default device so a non-empty
/// device list always yields a device.
pub fn select_device(devices: &[CameraDevice], facing: CameraFacing) -> Option<&CameraDevice> {
    match facing {
        CameraFacing::Back => default_camera(devices),
        CameraFacing::Front => find_front_camera(devices).or_else(|| {
            warn!("No front camera found, using default camera");
            default_camera(devices)
        }),
    }
}

/// Build a fresh session for `facing`.
///
/// The input is constructed first and only added once that succeeded.
pub fn build_session(
    backend: &dyn CameraBackend,
    devices: &[CameraDevice],
    facing: CameraFacing,
    token: SessionToken,
) -> Result<CaptureSession, CameraError> {
    let device = select_device(devices, facing).ok_or(CameraError::NoCameraFound)?;
    debug!(name = %device.name, path = %device.path, %facing, "Selected camera");

    let input = backend.open_input(device).map_err(|e| {
        warn!(name = %device.name, error = %e, "Failed to construct device input");
        CameraError::from(e)
    })?;

    let mut session = CaptureSession::new(token);
    if session.can_add_input(&input) {
        session.add_input(input)?;
    }

    info!(%token, name = %device.name, %facing, "Capture session built");
    Ok(session)
}

/// Tear down `previous` and build its replacement.
pub fn rebuild_session(
    previous: Option<CaptureSession>,
    backend: &dyn CameraBackend,
    devices: &[CameraDevice],
    facing: CameraFacing,
    token: SessionToken,
) -> Result<CaptureSession, CameraError> {
    if let Some(mut old) = previous {
        old.stop();
        info!(token = %old.token(), "Capture session torn down");
    }

    build_session(backend, devices, facing, token)
}
