// SPDX-License-Identifier: GPL-3.0-only

//! Recording timer
//!
//! Counts whole seconds while a hold gesture is active. The counter survives
//! across holds; only the repeating timer handle is created and invalidated.

use crate::constants::ui;

/// Handle of one repeating timer. Ticks carrying an old id are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingState {
    #[default]
    Idle,
    Recording,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelColor {
    #[default]
    Normal,
    Alert,
}

impl LabelColor {
    pub fn rgb(self) -> [f32; 3] {
        match self {
            LabelColor::Normal => ui::LABEL_NORMAL_RGB,
            LabelColor::Alert => ui::LABEL_ALERT_RGB,
        }
    }
}

/// What the caller should do after delivering a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Stale or invalidated timer, nothing changed
    Ignored,
    /// Label updated, schedule the next tick
    Reschedule,
    /// Label updated, but the timer invalidated itself
    Invalidated,
}

#[derive(Debug, Clone)]
pub struct RecordingTimer {
    elapsed: u64,
    label: String,
    color: LabelColor,
    state: RecordingState,
    active: Option<TimerId>,
    next_id: u64,
}

impl Default for RecordingTimer {
    fn default() -> Self {
        Self {
            elapsed: 0,
            label: ui::TIMER_INITIAL_LABEL.to_string(),
            color: LabelColor::Normal,
            state: RecordingState::Idle,
            active: None,
            next_id: 0,
        }
    }
}

impl RecordingTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter recording: alert colour and a fresh repeating timer
    pub fn start(&mut self) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.active = Some(id);
        self.state = RecordingState::Recording;
        self.color = LabelColor::Alert;
        id
    }

    /// Leave recording: normal colour, timer invalidated, count kept
    pub fn stop(&mut self) {
        self.active = None;
        self.state = RecordingState::Idle;
        self.color = LabelColor::Normal;
    }

    pub fn tick(&mut self, id: TimerId) -> TickOutcome {
        if self.active != Some(id) {
            return TickOutcome::Ignored;
        }

        // A timer started at zero stops itself on its first tick; the
        // count and label still advance
        let outcome = if self.elapsed == 0 {
            self.active = None;
            TickOutcome::Invalidated
        } else {
            TickOutcome::Reschedule
        };

        self.elapsed += 1;
        self.label = format_elapsed(self.elapsed);
        outcome
    }

    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn color(&self) -> LabelColor {
        self.color
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }
}

/// Zero-padded `MM:SS`, wrapping every hour
pub fn format_elapsed(seconds: u64) -> String {
    let within_hour = seconds % 3600;
    format!("{:02}:{:02}", within_hour / 60, within_hour % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_elapsed(0), "00:00");
        assert_eq!(format_elapsed(59), "00:59");
        assert_eq!(format_elapsed(125), "02:05");
        assert_eq!(format_elapsed(3599), "59:59");
        assert_eq!(format_elapsed(3600), "00:00");
        assert_eq!(format_elapsed(3661), "01:01");
    }

    #[test]
    fn first_tick_from_zero_invalidates() {
        let mut timer = RecordingTimer::new();
        let id = timer.start();

        assert_eq!(timer.tick(id), TickOutcome::Invalidated);
        assert_eq!(timer.label(), "00:01");
        assert!(!timer.is_running());
        assert_eq!(timer.tick(id), TickOutcome::Ignored);
        assert_eq!(timer.elapsed(), 1);
        // Still recording until the gesture ends
        assert_eq!(timer.color(), LabelColor::Alert);
    }

    #[test]
    fn later_holds_keep_counting() {
        let mut timer = RecordingTimer::new();
        let first = timer.start();
        timer.tick(first);
        timer.stop();

        let second = timer.start();
        assert_eq!(timer.tick(first), TickOutcome::Ignored);
        assert_eq!(timer.tick(second), TickOutcome::Reschedule);
        assert_eq!(timer.tick(second), TickOutcome::Reschedule);
        assert_eq!(timer.label(), "00:03");
    }

    #[test]
    fn stop_restores_color_without_reset() {
        let mut timer = RecordingTimer::new();
        let id = timer.start();
        assert_eq!(timer.state(), RecordingState::Recording);
        assert_eq!(timer.color().rgb(), [1.0, 0.0, 0.0]);
        timer.tick(id);

        timer.stop();
        assert_eq!(timer.state(), RecordingState::Idle);
        assert_eq!(timer.color(), LabelColor::Normal);
        assert_eq!(timer.elapsed(), 1);
        assert_eq!(timer.label(), "00:01");
    }
}
