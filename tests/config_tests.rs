// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use rotissomat::Config;
use rotissomat::backends::camera::CameraFacing;
use rotissomat::config::AppTheme;

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.app_theme, AppTheme::System);
    assert_eq!(
        config.last_facing,
        CameraFacing::Back,
        "The back camera is the default device"
    );
    assert_eq!(config.hold_delay_ms, 500);
}

#[test]
fn test_config_fractions() {
    let config = Config::default();

    assert_eq!(config.ghost_opacity_percent, 60);
    assert_eq!(config.mask_radius_percent, 45);
    assert_eq!(config.torch_level_percent, 100);
    assert!((config.ghost_opacity() - 0.6).abs() < f32::EPSILON);
    assert!((config.mask_radius_ratio() - 0.45).abs() < f32::EPSILON);
    assert!((config.torch_level() - 1.0).abs() < f32::EPSILON);
}

#[test]
fn test_config_percentages_are_capped() {
    let config = Config {
        ghost_opacity_percent: 250,
        ..Config::default()
    };
    assert_eq!(config.ghost_opacity(), 1.0);
}
