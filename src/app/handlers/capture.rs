// SPDX-License-Identifier: GPL-3.0-only

//! Capture handlers
//!
//! The hold gesture with its recording timer, the ghost still, the flash and
//! the press animations of the three control buttons.

use crate::app::state::{AppModel, Message};
use crate::backends::camera::{SessionToken, StillImage, still};
use crate::constants::timing;
use crate::errors::CaptureError;
use crate::screen::{CaptureRequest, Control, GhostAction, PressId, TimerId};
use cosmic::Task;
use cosmic::widget::image::Handle;
use tracing::debug;

impl AppModel {
    /// Create a delayed task that sends a message after the specified milliseconds
    pub(crate) fn delay_task(millis: u64, message: Message) -> Task<cosmic::Action<Message>> {
        Task::perform(
            async move {
                tokio::time::sleep(tokio::time::Duration::from_millis(millis)).await;
                message
            },
            cosmic::Action::App,
        )
    }

    // =========================================================================
    // Hold gesture and recording timer
    // =========================================================================

    pub(crate) fn handle_hold_pressed(&mut self) -> Task<cosmic::Action<Message>> {
        match self.screen.hold_pressed() {
            Some(press) => Self::delay_task(self.screen.hold_delay_ms(), Message::HoldRecognized(press)),
            None => Task::none(),
        }
    }

    pub(crate) fn handle_hold_recognized(&mut self, press: PressId) -> Task<cosmic::Action<Message>> {
        match self.screen.hold_recognized(press) {
            Some(timer) => Self::delay_task(timing::RECORDING_TICK_MS, Message::RecordingTick(timer)),
            None => Task::none(),
        }
    }

    pub(crate) fn handle_hold_released(&mut self) -> Task<cosmic::Action<Message>> {
        self.screen.hold_released();
        Task::none()
    }

    pub(crate) fn handle_recording_tick(&mut self, timer: TimerId) -> Task<cosmic::Action<Message>> {
        if self.screen.recording_tick(timer) {
            Self::delay_task(timing::RECORDING_TICK_MS, Message::RecordingTick(timer))
        } else {
            Task::none()
        }
    }

    // =========================================================================
    // Control buttons
    // =========================================================================

    pub(crate) fn handle_control_pressed(&mut self, control: Control) -> Task<cosmic::Action<Message>> {
        if !self.screen.press_control(control) {
            debug!(?control, "Press ignored while animating");
            return Task::none();
        }
        Self::delay_task(control.up_millis(), Message::PressPeak(control))
    }

    /// Scale-up finished: run the control's action and scale back down
    pub(crate) fn handle_press_peak(&mut self, control: Control) -> Task<cosmic::Action<Message>> {
        if !self.screen.control_peaked(control) {
            return Task::none();
        }

        let action = match control {
            Control::Ghost => self.toggle_ghost(),
            Control::Flash => {
                self.screen.toggle_flash();
                Task::none()
            }
            Control::Mode => self.switch_facing(),
        };

        Task::batch([
            action,
            Self::delay_task(control.down_millis(), Message::PressFinished(control)),
        ])
    }

    pub(crate) fn handle_press_finished(&mut self, control: Control) -> Task<cosmic::Action<Message>> {
        self.screen.control_finished(control);
        Task::none()
    }

    // =========================================================================
    // Ghost still
    // =========================================================================

    fn toggle_ghost(&mut self) -> Task<cosmic::Action<Message>> {
        match self.screen.toggle_ghost() {
            GhostAction::Cleared => {
                self.ghost_image = None;
                Task::none()
            }
            GhostAction::NoConnection => Task::none(),
            GhostAction::CaptureRequested {
                token,
                request,
                output,
            } => {
                let frame = self.screen.latest_frame().cloned();
                Task::perform(still::capture_still_image(frame, output), move |result| {
                    cosmic::Action::App(Message::StillCaptured {
                        token,
                        request,
                        result,
                    })
                })
            }
        }
    }

    pub(crate) fn handle_still_captured(
        &mut self,
        token: SessionToken,
        request: CaptureRequest,
        result: Result<StillImage, CaptureError>,
    ) -> Task<cosmic::Action<Message>> {
        if self.screen.ghost_captured(token, request, result) {
            self.ghost_image = self
                .screen
                .ghost()
                .image()
                .map(|image| Handle::from_rgba(image.width, image.height, image.rgba.clone()));
        }
        Task::none()
    }
}
