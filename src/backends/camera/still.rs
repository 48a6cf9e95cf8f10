// SPDX-License-Identifier: GPL-3.0-only

//! Still image output
//!
//! Stills are taken from the most recent preview frame: the frame is JPEG
//! encoded with the output's settings, then decoded back into RGBA for
//! display. Nothing is written to disk.

use super::session::StillImageOutput;
use super::types::CameraFrame;
use crate::constants::capture;
use crate::errors::CaptureError;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::sync::Arc;
use tracing::debug;

/// A decoded still ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StillImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Capture a still from `frame` asynchronously.
///
/// `None` means the session has not delivered a frame yet, which is treated
/// as a missing video connection.
pub async fn capture_still_image(
    frame: Option<Arc<CameraFrame>>,
    output: StillImageOutput,
) -> Result<StillImage, CaptureError> {
    let frame = frame.ok_or(CaptureError::NoVideoConnection)?;

    tokio::task::spawn_blocking(move || {
        let jpeg = encode_jpeg(&frame, &output)?;
        debug!(
            width = frame.width,
            height = frame.height,
            bytes = jpeg.len(),
            "Still image encoded"
        );
        decode_jpeg(&jpeg)
    })
    .await
    .map_err(|e| CaptureError::EncodingFailed(e.to_string()))?
}

/// Encode an RGBA frame as JPEG
pub fn encode_jpeg(frame: &CameraFrame, output: &StillImageOutput) -> Result<Vec<u8>, CaptureError> {
    if !frame.is_complete() {
        return Err(CaptureError::EncodingFailed(format!(
            "frame buffer holds {} bytes, expected {}x{} RGBA",
            frame.data.len(),
            frame.width,
            frame.height
        )));
    }

    let image = RgbaImage::from_raw(frame.width, frame.height, frame.data.to_vec())
        .ok_or_else(|| CaptureError::EncodingFailed("invalid frame dimensions".to_string()))?;
    let image = if output.high_resolution {
        image
    } else {
        scale_to_preview(image)
    };

    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgba8(image).to_rgb8();

    let mut jpeg = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut jpeg, output.quality);
    rgb.write_with_encoder(encoder)
        .map_err(|e| CaptureError::EncodingFailed(e.to_string()))?;

    Ok(jpeg)
}

/// Decode JPEG data into RGBA
pub fn decode_jpeg(bytes: &[u8]) -> Result<StillImage, CaptureError> {
    let image = image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)
        .map_err(|e| CaptureError::DecodingFailed(e.to_string()))?
        .to_rgba8();

    let (width, height) = image.dimensions();
    Ok(StillImage {
        width,
        height,
        rgba: image.into_raw(),
    })
}

fn scale_to_preview(image: RgbaImage) -> RgbaImage {
    let (width, height) = image.dimensions();
    let longest = width.max(height);
    if longest <= capture::PREVIEW_STILL_MAX_EDGE {
        return image;
    }

    let scale = capture::PREVIEW_STILL_MAX_EDGE as f32 / longest as f32;
    let new_width = ((width as f32 * scale).round() as u32).max(1);
    let new_height = ((height as f32 * scale).round() as u32).max(1);
    image::imageops::resize(&image, new_width, new_height, FilterType::Triangle)
}
