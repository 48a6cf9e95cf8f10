// SPDX-License-Identifier: MPL-2.0

//! PipeWire GStreamer pipeline for the live preview

use super::super::session::DeviceInput;
use super::super::types::*;
use crate::constants::{pipeline, timing};
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Live preview pipeline: `pipewiresrc ! videoconvert ! RGBA appsink`
///
/// Frames are pushed into the [`FrameSender`] from GStreamer's streaming
/// thread. Dropping the pipeline releases the camera.
pub struct PipeWirePipeline {
    pipeline: gstreamer::Pipeline,
    appsink: AppSink,
}

impl PipeWirePipeline {
    /// Create and start a preview pipeline for `input`
    pub fn new(input: &DeviceInput, frame_sender: FrameSender) -> BackendResult<Self> {
        info!(device = %input.device.name, source = %input.source, "Creating PipeWire pipeline");

        gstreamer::init().map_err(|e| BackendError::InitializationFailed(e.to_string()))?;

        let description = pipeline_description(&input.source);
        debug!(pipeline = %description, "Launching pipeline");

        let pipeline = gstreamer::parse::launch(&description)
            .map_err(|e| BackendError::InitializationFailed(e.to_string()))?
            .dynamic_cast::<gstreamer::Pipeline>()
            .map_err(|_| BackendError::InitializationFailed("Not a pipeline".to_string()))?;

        let appsink = pipeline
            .by_name("sink")
            .ok_or_else(|| BackendError::InitializationFailed("Failed to get appsink".to_string()))?
            .dynamic_cast::<AppSink>()
            .map_err(|_| {
                BackendError::InitializationFailed("Failed to cast appsink".to_string())
            })?;

        appsink.set_property("emit-signals", true);
        appsink.set_property("sync", false);
        appsink.set_property("max-buffers", pipeline::MAX_BUFFERS);
        appsink.set_property("drop", true);
        appsink.set_property("enable-last-sample", false);

        let frame_counter = Arc::new(AtomicU64::new(0));
        appsink.set_callbacks(
            gstreamer_app::AppSinkCallbacks::builder()
                .new_sample(move |appsink| {
                    let frame_num = frame_counter.fetch_add(1, Ordering::Relaxed);
                    let sample = appsink
                        .pull_sample()
                        .map_err(|_| gstreamer::FlowError::Eos)?;

                    let frame = match frame_from_sample(&sample) {
                        Some(frame) => frame,
                        None => {
                            if frame_num % timing::FRAME_LOG_INTERVAL == 0 {
                                warn!(frame = frame_num, "Skipping unreadable sample");
                            }
                            return Ok(gstreamer::FlowSuccess::Ok);
                        }
                    };

                    let mut sender = frame_sender.clone();
                    if let Err(e) = sender.try_send(frame) {
                        if e.is_disconnected() {
                            return Err(gstreamer::FlowError::Flushing);
                        }
                        if frame_num % timing::FRAME_LOG_INTERVAL == 0 {
                            debug!(frame = frame_num, "Frame dropped (channel full)");
                        }
                    }

                    Ok(gstreamer::FlowSuccess::Ok)
                })
                .build(),
        );

        pipeline.set_state(gstreamer::State::Playing).map_err(|e| {
            BackendError::InitializationFailed(format!("Failed to start pipeline: {}", e))
        })?;

        let (result, state, pending) = pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::START_TIMEOUT_SECS,
        ));
        debug!(result = ?result, state = ?state, pending = ?pending, "Pipeline state");
        if let Some(message) = first_bus_error(&pipeline) {
            error!(error = %message, "Pipeline reported an error while starting");
            let _ = pipeline.set_state(gstreamer::State::Null);
            return Err(BackendError::InitializationFailed(message));
        }
        if state != gstreamer::State::Playing {
            warn!(state = ?state, "Pipeline is not in PLAYING state yet");
        }

        info!("PipeWire preview started");
        Ok(Self { pipeline, appsink })
    }
}

impl Drop for PipeWirePipeline {
    fn drop(&mut self) {
        self.appsink
            .set_callbacks(gstreamer_app::AppSinkCallbacks::builder().build());
        let _ = self.pipeline.set_state(gstreamer::State::Null);
        let (result, state, _) = self.pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::STOP_TIMEOUT_SECS,
        ));
        debug!(result = ?result, state = ?state, "PipeWire pipeline stopped");
    }
}

/// GStreamer launch description for `source` properties
pub fn pipeline_description(source: &str) -> String {
    format!(
        "pipewiresrc {}do-timestamp=true ! videoconvert ! video/x-raw,format={} ! appsink name=sink",
        source,
        pipeline::OUTPUT_FORMAT
    )
}

/// `pipewiresrc` properties for a device path
pub fn source_properties(device_path: &str) -> String {
    if device_path.is_empty() {
        String::new()
    } else if let Some(serial) = device_path.strip_prefix("pipewire-serial-") {
        format!("target-object={} ", serial)
    } else if let Some(node_id) = device_path.strip_prefix("pipewire-") {
        format!("target-object={} ", node_id)
    } else if device_path.starts_with("/dev/video") {
        format!("path=v4l2:{} ", device_path)
    } else {
        format!("path={} ", device_path)
    }
}

/// Copy a sample into a tightly packed RGBA frame
fn frame_from_sample(sample: &gstreamer::Sample) -> Option<CameraFrame> {
    let buffer = sample.buffer()?;
    if buffer.flags().contains(gstreamer::BufferFlags::CORRUPTED) {
        return None;
    }
    let info = VideoInfo::from_caps(sample.caps()?).ok()?;
    let map = buffer.map_readable().ok()?;

    let width = info.width();
    let height = info.height();
    let stride = usize::try_from(*info.stride().first()?).ok()?;
    let row_bytes = width as usize * 4;
    let plane = map.as_slice();

    let data: Arc<[u8]> = if stride == row_bytes {
        Arc::from(plane.get(..row_bytes * height as usize)?)
    } else {
        let mut packed = Vec::with_capacity(row_bytes * height as usize);
        for row in 0..height as usize {
            let start = row * stride;
            packed.extend_from_slice(plane.get(start..start + row_bytes)?);
        }
        Arc::from(packed)
    };

    Some(CameraFrame {
        width,
        height,
        data,
        captured_at: Instant::now(),
    })
}

fn first_bus_error(pipeline: &gstreamer::Pipeline) -> Option<String> {
    let bus = pipeline.bus()?;
    while let Some(message) = bus.pop() {
        if let gstreamer::MessageView::Error(err) = message.view() {
            return Some(err.error().to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_properties_by_path_kind() {
        assert_eq!(source_properties(""), "");
        assert_eq!(source_properties("pipewire-serial-2146"), "target-object=2146 ");
        assert_eq!(source_properties("pipewire-62"), "target-object=62 ");
        assert_eq!(source_properties("/dev/video0"), "path=v4l2:/dev/video0 ");
    }

    #[test]
    fn description_ends_in_rgba_appsink() {
        let description = pipeline_description("target-object=7 ");
        assert!(description.starts_with("pipewiresrc target-object=7 do-timestamp=true"));
        assert!(description.ends_with("video/x-raw,format=RGBA ! appsink name=sink"));
    }
}
