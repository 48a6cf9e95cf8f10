// SPDX-License-Identifier: GPL-3.0-only

//! Display brightness via the sysfs backlight class
//!
//! Brightness is read from `/sys/class/backlight/<name>/brightness`. Writes go
//! to the same file when it is writable, otherwise through logind's
//! `Session.SetBrightness` on the system bus, which works for unprivileged
//! users on an active seat. The bus calls run on a worker thread that keeps
//! one logind proxy, so the UI thread never waits on D-Bus.

use crate::constants::hardware;
use crate::errors::HardwareError;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use tracing::{debug, info, warn};

/// The display the app can brighten. Levels are fractions in 0.0 - 1.0.
pub trait ScreenBrightness: Send {
    fn brightness(&self) -> Result<f32, HardwareError>;

    fn set_brightness(&mut self, level: f32) -> Result<(), HardwareError>;
}

/// A backlight device discovered via sysfs
#[derive(Debug)]
pub struct Backlight {
    path: PathBuf,
    name: String,
    max_brightness: u32,
    logind: Option<LogindWriter>,
}

impl Backlight {
    /// First usable device in the backlight class directory
    pub fn discover() -> Option<Self> {
        Self::discover_in(Path::new(hardware::BACKLIGHT_DIR))
    }

    pub fn discover_in(dir: &Path) -> Option<Self> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(path = %dir.display(), error = %e, "No backlight class directory");
                return None;
            }
        };

        let mut names: Vec<String> = entries
            .flatten()
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .collect();
        names.sort();

        names.into_iter().find_map(|name| {
            let path = dir.join(&name);
            let max_brightness = read_u32(&path.join("max_brightness")).ok()?;
            if max_brightness == 0 {
                return None;
            }
            info!(name = %name, max_brightness, "Discovered backlight");
            Some(Self {
                path,
                name,
                max_brightness,
                logind: None,
            })
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn to_raw(&self, level: f32) -> u32 {
        (level.clamp(0.0, 1.0) * self.max_brightness as f32).round() as u32
    }

    /// Queue `raw` for logind; the worker is started on first use
    fn set_via_logind(&mut self, raw: u32) -> Result<(), HardwareError> {
        if self.logind.is_none() {
            self.logind = Some(LogindWriter::spawn(self.name.clone())?);
        }
        match self.logind.as_ref() {
            Some(writer) => writer.send(raw),
            None => Err(HardwareError::Unsupported("logind writer".to_string())),
        }
    }
}

/// Worker thread applying backlight levels through logind
#[derive(Debug)]
struct LogindWriter {
    levels: Sender<u32>,
}

impl LogindWriter {
    fn spawn(name: String) -> Result<Self, HardwareError> {
        let (levels, requests) = mpsc::channel();
        thread::Builder::new()
            .name("backlight-logind".to_string())
            .spawn(move || logind_worker(&name, requests))
            .map_err(|e| HardwareError::Unsupported(format!("logind worker: {}", e)))?;
        Ok(Self { levels })
    }

    fn send(&self, raw: u32) -> Result<(), HardwareError> {
        self.levels
            .send(raw)
            .map_err(|_| HardwareError::Unsupported("logind worker stopped".to_string()))
    }
}

fn logind_session() -> Result<zbus::blocking::Proxy<'static>, HardwareError> {
    let connection = zbus::blocking::Connection::system()
        .map_err(|e| HardwareError::Unsupported(format!("system bus: {}", e)))?;
    zbus::blocking::Proxy::new(
        &connection,
        "org.freedesktop.login1",
        "/org/freedesktop/login1/session/auto",
        "org.freedesktop.login1.Session",
    )
    .map_err(|e| HardwareError::Unsupported(format!("logind proxy: {}", e)))
}

fn logind_worker(name: &str, requests: Receiver<u32>) {
    let mut session = None;

    while let Ok(raw) = requests.recv() {
        // Only the newest queued level matters
        let raw = requests.try_iter().last().unwrap_or(raw);

        if session.is_none() {
            match logind_session() {
                Ok(proxy) => session = Some(proxy),
                Err(e) => {
                    warn!(name, error = %e, "Cannot reach logind, brightness unchanged");
                    continue;
                }
            }
        }
        let Some(proxy) = session.as_ref() else {
            continue;
        };

        match proxy.call::<_, _, ()>("SetBrightness", &("backlight", name, raw)) {
            Ok(()) => debug!(name, raw, "Backlight set through logind"),
            Err(e) => {
                warn!(name, raw, error = %e, "logind SetBrightness failed");
                // Reconnect on the next request
                session = None;
            }
        }
    }

    debug!(name, "Backlight worker stopped");
}

impl ScreenBrightness for Backlight {
    fn brightness(&self) -> Result<f32, HardwareError> {
        let raw = read_u32(&self.path.join("brightness"))?;
        Ok(raw as f32 / self.max_brightness as f32)
    }

    fn set_brightness(&mut self, level: f32) -> Result<(), HardwareError> {
        let raw = self.to_raw(level);
        match std::fs::write(self.path.join("brightness"), raw.to_string()) {
            Ok(()) => {
                debug!(name = %self.name, raw, "Backlight written");
                Ok(())
            }
            Err(e) => {
                debug!(name = %self.name, error = %e, "Direct backlight write failed, asking logind");
                self.set_via_logind(raw)
            }
        }
    }
}

/// In-memory brightness for displays without a controllable backlight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedBrightness {
    level: f32,
}

impl FixedBrightness {
    pub fn new(level: f32) -> Self {
        Self {
            level: level.clamp(0.0, 1.0),
        }
    }
}

impl Default for FixedBrightness {
    fn default() -> Self {
        Self::new(hardware::FULL_SCREEN_BRIGHTNESS)
    }
}

impl ScreenBrightness for FixedBrightness {
    fn brightness(&self) -> Result<f32, HardwareError> {
        Ok(self.level)
    }

    fn set_brightness(&mut self, level: f32) -> Result<(), HardwareError> {
        self.level = level.clamp(0.0, 1.0);
        Ok(())
    }
}

/// The system display, or a fixed stand-in when there is no backlight
pub fn detect_display() -> Box<dyn ScreenBrightness> {
    match Backlight::discover() {
        Some(backlight) => Box::new(backlight),
        None => {
            warn!("No backlight device, screen brightness changes are not applied");
            Box::new(FixedBrightness::default())
        }
    }
}

fn read_u32(path: &Path) -> Result<u32, HardwareError> {
    let raw = std::fs::read_to_string(path)?;
    raw.trim()
        .parse()
        .map_err(|_| HardwareError::Io(format!("{}: invalid value {:?}", path.display(), raw.trim())))
}
