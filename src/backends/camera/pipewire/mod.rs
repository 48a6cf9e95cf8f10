// SPDX-License-Identifier: MPL-2.0

//! PipeWire camera backend
//!
//! Cameras are enumerated through PipeWire and streamed with GStreamer's
//! `pipewiresrc`. PipeWire handles device access and format negotiation.

mod enumeration;
mod pipeline;

pub use enumeration::{enumerate_pipewire_cameras, is_pipewire_available};
pub use pipeline::{PipeWirePipeline, pipeline_description, source_properties};

use super::CameraBackend;
use super::session::DeviceInput;
use super::types::*;
use tracing::{debug, info, warn};

/// PipeWire backend implementation
#[derive(Debug, Default)]
pub struct PipeWireBackend;

impl PipeWireBackend {
    pub fn new() -> Self {
        Self
    }
}

impl CameraBackend for PipeWireBackend {
    fn is_available(&self) -> bool {
        is_pipewire_available()
    }

    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        info!("Using PipeWire backend for camera enumeration");

        match enumerate_pipewire_cameras() {
            Some(cameras) => {
                info!(count = cameras.len(), "PipeWire cameras enumerated");
                cameras
            }
            None => {
                warn!("PipeWire enumeration failed");
                Vec::new()
            }
        }
    }

    fn open_input(&self, device: &CameraDevice) -> BackendResult<DeviceInput> {
        if !self.is_available() {
            return Err(BackendError::NotAvailable(
                "GStreamer pipewiresrc element missing".to_string(),
            ));
        }

        let source = source_properties(&device.path);
        debug!(name = %device.name, source = %source, "Device input constructed");

        Ok(DeviceInput {
            device: device.clone(),
            source,
        })
    }

    fn start(&self, input: &DeviceInput) -> BackendResult<()> {
        // The default node (empty path) is resolved by PipeWire itself
        if input.device.path.is_empty() {
            return Ok(());
        }

        let still_present = self
            .enumerate_cameras()
            .iter()
            .any(|camera| camera.path == input.device.path);

        if still_present {
            Ok(())
        } else {
            Err(BackendError::DeviceNotFound(input.device.path.clone()))
        }
    }
}
