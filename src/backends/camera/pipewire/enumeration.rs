// SPDX-License-Identifier: GPL-3.0-only

//! PipeWire camera enumeration
//!
//! Cameras are discovered by parsing `pw-cli ls Node`. The facing of each
//! camera comes from libcamera's `api.libcamera.location` property, which
//! only `pw-cli info <id>` reports.

use super::super::types::{CameraDevice, CameraFacing};
use tracing::{debug, info, warn};

/// Video source node as listed by `pw-cli ls Node`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct NodeEntry {
    id: String,
    serial: Option<String>,
    description: Option<String>,
    nick: Option<String>,
    is_video_source: bool,
}

impl NodeEntry {
    fn into_device(self, facing: Option<CameraFacing>) -> Option<CameraDevice> {
        if !self.is_video_source {
            return None;
        }
        let name = self.description.or(self.nick)?;

        // object.serial is what target-object expects; the node ID still works on older PipeWire
        let path = match self.serial {
            Some(serial) => format!("pipewire-serial-{}", serial),
            None => format!("pipewire-{}", self.id),
        };

        Some(CameraDevice {
            name,
            path,
            metadata_path: Some(self.id),
            facing,
        })
    }
}

/// Enumerate cameras using PipeWire
pub fn enumerate_pipewire_cameras() -> Option<Vec<CameraDevice>> {
    debug!("Attempting to enumerate cameras via PipeWire");

    if !is_pipewire_available() {
        warn!("pipewiresrc not available");
        return None;
    }

    if let Some(cameras) = try_enumerate_with_pw_cli() {
        return Some(cameras);
    }

    // Let PipeWire pick its default camera
    info!("Using PipeWire auto-selection (default camera)");
    Some(vec![CameraDevice {
        name: "Default Camera (PipeWire)".to_string(),
        path: String::new(),
        metadata_path: None,
        facing: None,
    }])
}

/// Check whether GStreamer has the `pipewiresrc` element
pub fn is_pipewire_available() -> bool {
    if gstreamer::init().is_err() {
        return false;
    }

    gstreamer::ElementFactory::make("pipewiresrc")
        .build()
        .is_ok()
}

fn try_enumerate_with_pw_cli() -> Option<Vec<CameraDevice>> {
    let output = std::process::Command::new("pw-cli")
        .args(["ls", "Node"])
        .output()
        .ok()?;

    if !output.status.success() {
        debug!("pw-cli command failed");
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let cameras: Vec<CameraDevice> = parse_node_list(&stdout)
        .into_iter()
        .filter_map(|node| {
            let facing = query_node_facing(&node.id);
            node.into_device(facing)
        })
        .inspect(|camera| {
            debug!(name = %camera.name, path = %camera.path, facing = ?camera.facing, "Found video camera");
        })
        .collect();

    if cameras.is_empty() {
        debug!("No cameras found via pw-cli");
        None
    } else {
        info!(count = cameras.len(), "Enumerated cameras via pw-cli");
        Some(cameras)
    }
}

/// Split `pw-cli ls Node` output into video source nodes
fn parse_node_list(stdout: &str) -> Vec<NodeEntry> {
    let mut nodes = Vec::new();
    let mut current: Option<NodeEntry> = None;

    for line in stdout.lines() {
        let trimmed = line.trim();

        // "id 76, type PipeWire:Interface:Node/3"
        if trimmed.starts_with("id ") && trimmed.contains("type PipeWire:Interface:Node") {
            if let Some(node) = current.take().filter(|node| node.is_video_source) {
                nodes.push(node);
            }
            if let Some(id) = trimmed
                .strip_prefix("id ")
                .and_then(|rest| rest.split(',').next())
            {
                current = Some(NodeEntry {
                    id: id.trim().to_string(),
                    ..Default::default()
                });
            }
            continue;
        }

        let Some(node) = current.as_mut() else {
            continue;
        };

        if trimmed.contains("media.class") && trimmed.contains("\"Video/Source\"") {
            node.is_video_source = true;
        } else if trimmed.contains("object.serial") {
            node.serial = extract_quoted_value(trimmed);
        } else if trimmed.contains("node.description") {
            node.description = extract_quoted_value(trimmed);
        } else if trimmed.contains("node.nick") {
            node.nick = extract_quoted_value(trimmed);
        }
    }

    if let Some(node) = current.filter(|node| node.is_video_source) {
        nodes.push(node);
    }

    nodes
}

/// Extract quoted value from a property line (e.g., 'property = "value"' -> "value")
fn extract_quoted_value(line: &str) -> Option<String> {
    let start = line.find('"')?;
    let end = line[start + 1..].find('"')?;
    Some(line[start + 1..start + 1 + end].to_string())
}

fn query_node_facing(node_id: &str) -> Option<CameraFacing> {
    let output = match std::process::Command::new("pw-cli")
        .args(["info", node_id])
        .output()
    {
        Ok(output) if output.status.success() => output,
        _ => {
            debug!(node_id, "Failed to query node info for location");
            return None;
        }
    };

    parse_location(&String::from_utf8_lossy(&output.stdout))
}

/// Find `api.libcamera.location` in `pw-cli info` output
fn parse_location(stdout: &str) -> Option<CameraFacing> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| line.contains("api.libcamera.location"))
        .and_then(extract_quoted_value)
        .and_then(|location| CameraFacing::from_location(&location))
}
