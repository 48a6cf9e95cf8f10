// SPDX-License-Identifier: GPL-3.0-only

//! Torch LED control via Linux sysfs
//!
//! Discovers LEDs exposed at `/sys/class/leds/*:flash` or `*:torch` and
//! drives them through the `brightness` file, which is group-writable by
//! `feedbackd` on phones. Configuration is bracketed by an exclusive
//! `flock` so two processes never fight over the LED.

use crate::constants::hardware;
use crate::errors::HardwareError;
use std::fs::File;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Torch state as reported by the hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TorchMode {
    Off,
    On,
}

/// A torch that has to be locked before it is configured
pub trait Torch: Send {
    fn has_torch(&self) -> bool;

    fn lock_for_configuration(&mut self) -> Result<(), HardwareError>;

    fn unlock_for_configuration(&mut self);

    fn torch_mode(&self) -> TorchMode;

    /// Turn the torch on at `level` (0.0 - 1.0). Requires the lock.
    fn set_torch_on(&mut self, level: f32) -> Result<(), HardwareError>;

    /// Turn the torch off. Requires the lock.
    fn set_torch_off(&mut self) -> Result<(), HardwareError>;
}

/// Flip the torch: lock, switch on if off (or off if on), unlock.
///
/// A device without a torch is left alone. Lock and configuration failures
/// are logged and otherwise ignored.
pub fn toggle_torch(torch: &mut dyn Torch, level: f32) {
    if !torch.has_torch() {
        debug!("No torch on this device");
        return;
    }

    if let Err(e) = torch.lock_for_configuration() {
        warn!(error = %e, "Failed to lock torch for configuration");
        return;
    }

    let result = match torch.torch_mode() {
        TorchMode::On => torch.set_torch_off(),
        TorchMode::Off => torch.set_torch_on(level),
    };
    if let Err(e) = result {
        warn!(error = %e, "Failed to configure torch");
    }

    torch.unlock_for_configuration();
}

/// A torch LED device discovered via sysfs
#[derive(Debug, Clone)]
pub struct FlashDevice {
    /// Sysfs path, e.g. `/sys/class/leds/white:flash`
    path: PathBuf,
    /// Maximum brightness value (from `max_brightness` file)
    max_brightness: u32,
    /// Directory basename
    name: String,
}

impl FlashDevice {
    /// Scan `leds_dir` for writable `*:flash` and `*:torch` entries
    pub fn discover(leds_dir: &Path) -> Vec<FlashDevice> {
        let Ok(entries) = std::fs::read_dir(leds_dir) else {
            warn!(path = %leds_dir.display(), "Cannot read LED class directory, torch discovery skipped");
            return Vec::new();
        };

        let mut devices: Vec<FlashDevice> = entries
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?.to_string();
                if !(name.ends_with(":flash") || name.ends_with(":torch")) {
                    return None;
                }
                Self::probe(entry.path(), name)
            })
            .collect();

        // Deterministic ordering (white before yellow)
        devices.sort_by(|a, b| a.name.cmp(&b.name));
        devices
    }

    fn probe(path: PathBuf, name: String) -> Option<FlashDevice> {
        let max_path = path.join("max_brightness");
        let max_brightness = match std::fs::read_to_string(&max_path) {
            Ok(s) => match s.trim().parse::<u32>() {
                Ok(v) if v > 0 => v,
                _ => {
                    warn!(path = %max_path.display(), "Invalid max_brightness value");
                    return None;
                }
            },
            Err(e) => {
                warn!(path = %max_path.display(), error = %e, "Cannot read max_brightness");
                return None;
            }
        };

        let brightness_path = path.join("brightness");
        if let Err(e) = std::fs::OpenOptions::new().write(true).open(&brightness_path) {
            warn!(
                path = %brightness_path.display(),
                error = %e,
                "Cannot write brightness - user may need to be in 'feedbackd' group"
            );
            return None;
        }

        info!(name = %name, max_brightness, "Discovered torch LED");
        Some(FlashDevice {
            path,
            max_brightness,
            name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn brightness_path(&self) -> PathBuf {
        self.path.join("brightness")
    }

    pub fn brightness(&self) -> Result<u32, HardwareError> {
        let raw = std::fs::read_to_string(self.brightness_path())?;
        raw.trim()
            .parse()
            .map_err(|_| HardwareError::Io(format!("invalid brightness value {:?}", raw.trim())))
    }

    /// Set raw brightness value (0 = off, max_brightness = full)
    pub fn set_brightness(&self, value: u32) -> Result<(), HardwareError> {
        let clamped = value.min(self.max_brightness);
        std::fs::write(self.brightness_path(), clamped.to_string())?;
        Ok(())
    }

    /// Turn on at a fraction of max brightness (0.0 = off, 1.0 = full)
    pub fn torch(&self, intensity: f32) -> Result<(), HardwareError> {
        let clamped = intensity.clamp(0.0, 1.0);
        let value = (clamped * self.max_brightness as f32).round() as u32;
        // Any non-zero level must actually light the LED
        self.set_brightness(value.max(u32::from(clamped > 0.0)))
    }
}

/// Torch backed by sysfs LED class devices
pub struct SysfsTorch {
    devices: Vec<FlashDevice>,
    lock: Option<File>,
}

impl SysfsTorch {
    pub fn discover() -> Self {
        Self::with_devices(FlashDevice::discover(Path::new(hardware::LEDS_DIR)))
    }

    pub fn with_devices(devices: Vec<FlashDevice>) -> Self {
        Self {
            devices,
            lock: None,
        }
    }

    fn require_lock(&self) -> Result<(), HardwareError> {
        if self.lock.is_some() {
            Ok(())
        } else {
            Err(HardwareError::LockFailed("torch is not locked".to_string()))
        }
    }

    fn for_each(&self, op: impl Fn(&FlashDevice) -> Result<(), HardwareError>) -> Result<(), HardwareError> {
        let mut first_error = None;
        for device in &self.devices {
            if let Err(e) = op(device) {
                warn!(device = %device.name, error = %e, "Torch LED write failed");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl Torch for SysfsTorch {
    fn has_torch(&self) -> bool {
        !self.devices.is_empty()
    }

    fn lock_for_configuration(&mut self) -> Result<(), HardwareError> {
        if self.lock.is_some() {
            return Ok(());
        }
        let device = self.devices.first().ok_or(HardwareError::NoTorch)?;
        let file = File::open(device.brightness_path())?;

        // SAFETY: the descriptor belongs to `file`, which outlives the call
        let result = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
        if result != 0 {
            return Err(HardwareError::LockFailed(
                std::io::Error::last_os_error().to_string(),
            ));
        }

        self.lock = Some(file);
        Ok(())
    }

    fn unlock_for_configuration(&mut self) {
        if let Some(file) = self.lock.take() {
            // SAFETY: as above; closing the file would also release the lock
            unsafe {
                libc::flock(file.as_raw_fd(), libc::LOCK_UN);
            }
        }
    }

    fn torch_mode(&self) -> TorchMode {
        let lit = self
            .devices
            .iter()
            .any(|device| device.brightness().is_ok_and(|value| value > 0));
        if lit { TorchMode::On } else { TorchMode::Off }
    }

    fn set_torch_on(&mut self, level: f32) -> Result<(), HardwareError> {
        self.require_lock()?;
        self.for_each(|device| device.torch(level))
    }

    fn set_torch_off(&mut self) -> Result<(), HardwareError> {
        self.require_lock()?;
        self.for_each(|device| device.set_brightness(0))
    }
}
