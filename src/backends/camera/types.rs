// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for camera backends

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Which way the active camera points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CameraFacing {
    /// World-facing camera, the platform default
    #[default]
    Back,
    /// User-facing (selfie) camera
    Front,
}

impl CameraFacing {
    /// The opposite facing
    pub fn toggled(self) -> Self {
        match self {
            CameraFacing::Back => CameraFacing::Front,
            CameraFacing::Front => CameraFacing::Back,
        }
    }

    /// Parse a libcamera `api.libcamera.location` value.
    ///
    /// External (USB) cameras have no facing.
    pub fn from_location(location: &str) -> Option<Self> {
        match location.trim() {
            "front" => Some(CameraFacing::Front),
            "back" => Some(CameraFacing::Back),
            _ => None,
        }
    }
}

impl std::fmt::Display for CameraFacing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraFacing::Back => write!(f, "back"),
            CameraFacing::Front => write!(f, "front"),
        }
    }
}

/// Represents a camera device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    pub name: String,
    pub path: String,                  // Capture target (pipewire serial or node ID)
    pub metadata_path: Option<String>, // PipeWire node ID, printed by `list`
    pub facing: Option<CameraFacing>,  // None for external cameras
}

impl CameraDevice {
    pub fn is_facing(&self, facing: CameraFacing) -> bool {
        self.facing == Some(facing)
    }
}

/// A single RGBA preview frame
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA rows (`width * 4` bytes each)
    pub data: Arc<[u8]>,
    /// When the frame left the pipeline
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Whether the buffer holds exactly `width * height` RGBA pixels
    pub fn is_complete(&self) -> bool {
        self.data.len() == self.width as usize * self.height as usize * 4
    }
}

/// Frame sender type for preview streams
pub type FrameSender = cosmic::iced::futures::channel::mpsc::Sender<CameraFrame>;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for backend operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Backend is not available on this system
    NotAvailable(String),
    /// Failed to initialize backend
    InitializationFailed(String),
    /// Camera device not found
    DeviceNotFound(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NotAvailable(msg) => write!(f, "Backend not available: {}", msg),
            BackendError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            BackendError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}
