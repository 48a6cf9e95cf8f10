// SPDX-License-Identifier: GPL-3.0-only

use crate::backends::camera::types::CameraFacing;
use crate::constants::{hardware, timing, ui};
use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use cosmic::{Theme, theme};
use serde::{Deserialize, Serialize};

/// Application theme preference
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum AppTheme {
    /// Follow system theme (dark or light based on system setting)
    #[default]
    System,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

impl AppTheme {
    /// Get the COSMIC theme for this app theme preference
    pub fn theme(&self) -> Theme {
        match self {
            Self::Dark => {
                let mut theme = theme::system_dark();
                theme.theme_type.prefer_dark(Some(true));
                theme
            }
            Self::Light => {
                let mut theme = theme::system_light();
                theme.theme_type.prefer_dark(Some(false));
                theme
            }
            Self::System => theme::system_preference(),
        }
    }
}

#[derive(Debug, Clone, CosmicConfigEntry, Eq, PartialEq, Serialize, Deserialize)]
#[version = 1]
pub struct Config {
    /// Application theme preference (System, Dark, Light)
    pub app_theme: AppTheme,
    /// Camera facing used at startup, updated on every switch
    pub last_facing: CameraFacing,
    /// Ghost still opacity in percent
    pub ghost_opacity_percent: u8,
    /// Mask hole radius in percent of the preview width
    pub mask_radius_percent: u8,
    /// Torch level in percent of the LED maximum
    pub torch_level_percent: u8,
    /// Press duration before a hold starts the timer
    pub hold_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_theme: AppTheme::default(),
            last_facing: CameraFacing::default(),
            ghost_opacity_percent: percent(ui::GHOST_OPACITY),
            mask_radius_percent: percent(ui::MASK_RADIUS_RATIO),
            torch_level_percent: percent(hardware::FULL_TORCH_LEVEL),
            hold_delay_ms: timing::HOLD_DELAY_MS,
        }
    }
}

impl Config {
    pub fn ghost_opacity(&self) -> f32 {
        fraction(self.ghost_opacity_percent)
    }

    pub fn mask_radius_ratio(&self) -> f32 {
        fraction(self.mask_radius_percent)
    }

    pub fn torch_level(&self) -> f32 {
        fraction(self.torch_level_percent)
    }
}

fn percent(fraction: f32) -> u8 {
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u8
}

fn fraction(percent: u8) -> f32 {
    f32::from(percent.min(100)) / 100.0
}
