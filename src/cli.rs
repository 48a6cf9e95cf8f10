// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands

use rotissomat::backends::camera::get_backend;
use rotissomat::backends::camera::session::{default_camera, find_front_camera};

/// List all available cameras
pub fn list_cameras() -> Result<(), Box<dyn std::error::Error>> {
    gstreamer::init()?;

    let backend = get_backend();
    if !backend.is_available() {
        return Err("GStreamer pipewiresrc element is not available".into());
    }

    let cameras = backend.enumerate_cameras();
    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    let front = find_front_camera(&cameras).map(|camera| camera.path.as_str());
    let back = default_camera(&cameras).map(|camera| camera.path.as_str());

    println!("Available cameras:");
    println!();
    for (index, camera) in cameras.iter().enumerate() {
        let facing = camera
            .facing
            .map(|facing| facing.to_string())
            .unwrap_or_else(|| "external".to_string());

        let mut roles = Vec::new();
        if Some(camera.path.as_str()) == back {
            roles.push("default");
        }
        if Some(camera.path.as_str()) == front {
            roles.push("selfie");
        }

        println!("  [{}] {} ({})", index, camera.name, facing);
        println!("      path: {}", camera.path);
        if let Some(node) = &camera.metadata_path {
            println!("      node: {}", node);
        }
        if !roles.is_empty() {
            println!("      used as: {}", roles.join(", "));
        }
    }

    Ok(())
}
