// SPDX-License-Identifier: GPL-3.0-only

//! Rotissomat - a ring-light camera for the COSMIC desktop
//!
//! A single screen that previews a camera through a circular mask, lights the
//! subject either with the screen itself (front camera) or with the torch LED
//! (back camera), overlays a translucent "ghost" still for lining up repeat
//! shots, and times press-and-hold takes.
//!
//! # Architecture
//!
//! - [`screen`]: GUI-independent screen controller and its state machines
//! - [`app`]: libcosmic application (messages, handlers, view)
//! - [`backends`]: camera backend abstraction, PipeWire implementation, capture session
//! - [`flash`] / [`backlight`]: torch LED and display brightness hardware
//! - [`config`]: user configuration handling

pub mod app;
pub mod backends;
pub mod backlight;
pub mod config;
pub mod constants;
pub mod errors;
pub mod flash;
pub mod i18n;
pub mod screen;

// Re-export commonly used types
pub use app::{AppModel, Message};
pub use config::Config;
pub use screen::CameraScreen;
