// SPDX-License-Identifier: MPL-2.0

//! Camera backend abstraction
//!
//! ```text
//! ┌─────────────────────┐
//! │    CameraScreen     │  ← picks a device by facing, owns the session
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │  CameraBackend Trait│  ← enumeration, device inputs
//! └──────────┬──────────┘
//!            │
//!            ▼
//!       ┌────────┐
//!       │PipeWire│  ← concrete implementation, preview pipeline
//!       └────────┘
//! ```

pub mod authorization;
pub mod pipewire;
pub mod session;
pub mod still;
pub mod types;

pub use authorization::{AuthorizationStatus, SetupAction};
pub use session::{CaptureSession, DeviceInput, SessionToken, StillImageOutput};
pub use still::StillImage;
pub use types::*;

use std::sync::Arc;

/// Camera backend trait
///
/// The screen only needs three things from a backend:
/// - the list of devices with their facing
/// - a device input for a chosen device
/// - a readiness check before the preview pipeline is attached
pub trait CameraBackend: Send + Sync {
    /// Check if this backend can be used on the current system
    fn is_available(&self) -> bool;

    /// Enumerate available cameras on this backend
    fn enumerate_cameras(&self) -> Vec<CameraDevice>;

    /// Construct an input for `device`
    ///
    /// # Returns
    /// * `Ok(DeviceInput)` - the device can be attached to a session
    /// * `Err(BackendError)` - the device is gone or unusable
    fn open_input(&self, device: &CameraDevice) -> BackendResult<DeviceInput>;

    /// Prepare the backend to stream from `input`
    ///
    /// Called off the UI thread once a session holding `input` has been built.
    fn start(&self, input: &DeviceInput) -> BackendResult<()>;
}

/// Get the camera backend for this system
pub fn get_backend() -> Arc<dyn CameraBackend> {
    Arc::new(pipewire::PipeWireBackend::new())
}
