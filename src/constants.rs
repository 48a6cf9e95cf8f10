// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// UI layout and styling constants
pub mod ui {
    /// Mask hole radius as a fraction of the preview width
    pub const MASK_RADIUS_RATIO: f32 = 0.45;

    /// Opacity of the ghost still drawn over the live preview
    pub const GHOST_OPACITY: f32 = 0.6;

    /// Icon scale at the peak of a press animation
    pub const PRESS_SCALE: f32 = 1.3;

    /// Control button icon size at rest
    pub const CONTROL_ICON_SIZE: u16 = 40;

    /// Spacing between the three control buttons
    pub const CONTROL_SPACING: u16 = 48;

    /// Corner radius of the timer label backing
    pub const TIMER_LABEL_RADIUS: f32 = 10.0;

    /// Timer label text size
    pub const TIMER_LABEL_TEXT_SIZE: u16 = 22;

    /// Alpha of the dark backing behind the timer label
    pub const TIMER_BACKING_ALPHA: f32 = 0.35;

    /// Alpha of the frosted overlay shown while switching cameras
    pub const TRANSITION_OVERLAY_ALPHA: f32 = 0.75;

    /// Timer label color while idle (RGB)
    pub const LABEL_NORMAL_RGB: [f32; 3] = [1.0, 1.0, 1.0];

    /// Timer label color while recording (RGB)
    pub const LABEL_ALERT_RGB: [f32; 3] = [1.0, 0.0, 0.0];

    /// Label shown before the first tick
    pub const TIMER_INITIAL_LABEL: &str = "00:00";
}

/// Gesture, animation and timer durations
pub mod timing {
    /// Minimum press duration before a hold is recognized
    pub const HOLD_DELAY_MS: u64 = 500;

    /// Recording timer interval
    pub const RECORDING_TICK_MS: u64 = 1000;

    /// Ghost and flash press animation: scale up
    pub const PRESS_UP_MS: u64 = 100;

    /// Ghost and flash press animation: scale back down
    pub const PRESS_DOWN_MS: u64 = 200;

    /// Camera switch press animation: scale up
    pub const MODE_UP_MS: u64 = 200;

    /// Camera switch press animation: scale back down
    pub const MODE_DOWN_MS: u64 = 300;

    /// Log frame statistics every N frames
    pub const FRAME_LOG_INTERVAL: u64 = 30;

    /// Frame poll timeout in the preview subscription (~60fps)
    pub const FRAME_POLL_MS: u64 = 16;

    /// Timeout for pipeline start (seconds)
    pub const START_TIMEOUT_SECS: u64 = 5;

    /// Timeout for pipeline stop (seconds)
    pub const STOP_TIMEOUT_SECS: u64 = 2;
}

/// Preview pipeline constants
pub mod pipeline {
    /// Maximum buffers queued in the appsink
    pub const MAX_BUFFERS: u32 = 2;

    /// Pixel format delivered to the preview
    pub const OUTPUT_FORMAT: &str = "RGBA";

    /// Frames buffered between GStreamer and the subscription
    pub const FRAME_CHANNEL_CAPACITY: usize = 4;

    /// Messages buffered between the subscription and the app
    pub const MESSAGE_CHANNEL_CAPACITY: usize = 8;
}

/// Still capture constants
pub mod capture {
    /// JPEG quality for ghost stills
    pub const JPEG_QUALITY: u8 = 90;

    /// Longest edge of a still when high-resolution capture is disabled
    pub const PREVIEW_STILL_MAX_EDGE: u32 = 1280;
}

/// Hardware paths
pub mod hardware {
    /// LED class devices (torch)
    pub const LEDS_DIR: &str = "/sys/class/leds";

    /// Backlight class devices (display brightness)
    pub const BACKLIGHT_DIR: &str = "/sys/class/backlight";

    /// Torch level used when the flash is turned on
    pub const FULL_TORCH_LEVEL: f32 = 1.0;

    /// Display level used to light the subject with the screen
    pub const FULL_SCREEN_BRIGHTNESS: f32 = 1.0;
}
