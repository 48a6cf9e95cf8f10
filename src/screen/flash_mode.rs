// SPDX-License-Identifier: GPL-3.0-only

//! Flash state and its facing-dependent transition table

use crate::backends::camera::CameraFacing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlashState {
    #[default]
    Off,
    On,
}

impl FlashState {
    pub fn toggled(self) -> Self {
        match self {
            FlashState::Off => FlashState::On,
            FlashState::On => FlashState::Off,
        }
    }

    pub fn icon_name(self) -> &'static str {
        match self {
            FlashState::On => "flash-on",
            FlashState::Off => "flash-off",
        }
    }
}

/// Side effect paired with a flash toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashAction {
    /// Opaque white overlay, remember brightness, then maximum brightness
    FillScreen,
    /// Clear the overlay and restore the remembered brightness
    RestoreScreen,
    /// Flip the physical torch
    ToggleTorch,
}

/// Next flash state and the mechanism to use, chosen by the facing at toggle time.
///
/// The state is shared between mechanisms, so a flash turned on with one
/// facing is turned off with whatever mechanism the current facing selects.
pub fn flash_transition(state: FlashState, facing: CameraFacing) -> (FlashState, FlashAction) {
    let action = match (facing, state) {
        (CameraFacing::Front, FlashState::Off) => FlashAction::FillScreen,
        (CameraFacing::Front, FlashState::On) => FlashAction::RestoreScreen,
        (CameraFacing::Back, _) => FlashAction::ToggleTorch,
    };
    (state.toggled(), action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table() {
        assert_eq!(
            flash_transition(FlashState::Off, CameraFacing::Front),
            (FlashState::On, FlashAction::FillScreen)
        );
        assert_eq!(
            flash_transition(FlashState::On, CameraFacing::Front),
            (FlashState::Off, FlashAction::RestoreScreen)
        );
        assert_eq!(
            flash_transition(FlashState::Off, CameraFacing::Back),
            (FlashState::On, FlashAction::ToggleTorch)
        );
        assert_eq!(
            flash_transition(FlashState::On, CameraFacing::Back),
            (FlashState::Off, FlashAction::ToggleTorch)
        );
    }

    #[test]
    fn icons() {
        assert_eq!(FlashState::On.icon_name(), "flash-on");
        assert_eq!(FlashState::Off.icon_name(), "flash-off");
    }
}
