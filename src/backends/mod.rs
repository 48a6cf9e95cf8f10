// SPDX-License-Identifier: MPL-2.0

//! Backend abstraction layer for camera capture
//!
//! The backend layer hides how cameras are found, authorized and streamed.
//! PipeWire (through GStreamer's `pipewiresrc`) is the only implementation;
//! camera access inside a sandbox goes through the XDG camera portal.
//!
//! # Modules
//!
//! - [`camera`]: camera backend, authorization, capture session and still output

pub mod camera;
