// SPDX-License-Identifier: MPL-2.0

//! Error types for the camera screen
//!
//! Nothing here is ever shown to the user. Failures are logged at the point
//! they are handled and the screen carries on without retrying.

use crate::backends::camera::types::BackendError;
use std::fmt;

/// Errors while selecting a camera and building a capture session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// No camera devices found
    NoCameraFound,
    /// Camera access was denied or is restricted
    AccessDenied,
    /// The device input could not be constructed
    InputFailed(String),
    /// The session refused the input
    InputRejected(String),
    /// The backend failed to start streaming
    StartFailed(String),
}

/// Still image capture errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// No running session or no frame has arrived yet
    NoVideoConnection,
    /// JPEG encoding failed
    EncodingFailed(String),
    /// JPEG decoding failed
    DecodingFailed(String),
}

/// Torch LED and display backlight errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HardwareError {
    /// The device has no torch
    NoTorch,
    /// The torch could not be locked for configuration
    LockFailed(String),
    /// A sysfs read or write failed
    Io(String),
    /// The operation is not available on this system
    Unsupported(String),
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::NoCameraFound => write!(f, "No camera devices found"),
            CameraError::AccessDenied => write!(f, "Camera access denied"),
            CameraError::InputFailed(msg) => write!(f, "Failed to open device input: {}", msg),
            CameraError::InputRejected(msg) => write!(f, "Session rejected input: {}", msg),
            CameraError::StartFailed(msg) => write!(f, "Failed to start session: {}", msg),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::NoVideoConnection => write!(f, "No video connection"),
            CaptureError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
            CaptureError::DecodingFailed(msg) => write!(f, "Decoding failed: {}", msg),
        }
    }
}

impl fmt::Display for HardwareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HardwareError::NoTorch => write!(f, "Device has no torch"),
            HardwareError::LockFailed(msg) => write!(f, "Failed to lock torch: {}", msg),
            HardwareError::Io(msg) => write!(f, "I/O error: {}", msg),
            HardwareError::Unsupported(msg) => write!(f, "Unsupported: {}", msg),
        }
    }
}

impl std::error::Error for CameraError {}
impl std::error::Error for CaptureError {}
impl std::error::Error for HardwareError {}

impl From<BackendError> for CameraError {
    fn from(err: BackendError) -> Self {
        CameraError::InputFailed(err.to_string())
    }
}

impl From<std::io::Error> for HardwareError {
    fn from(err: std::io::Error) -> Self {
        HardwareError::Io(err.to_string())
    }
}
