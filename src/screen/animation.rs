// SPDX-License-Identifier: GPL-3.0-only

//! Two-stage press animation of the control buttons
//!
//! Each press scales the icon up, then back down. The control's action is
//! applied when the scale-up stage completes.

use crate::constants::{timing, ui};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Ghost,
    Flash,
    Mode,
}

impl Control {
    /// Scale-up duration in milliseconds
    pub fn up_millis(self) -> u64 {
        match self {
            Control::Ghost | Control::Flash => timing::PRESS_UP_MS,
            Control::Mode => timing::MODE_UP_MS,
        }
    }

    /// Scale-down duration in milliseconds
    pub fn down_millis(self) -> u64 {
        match self {
            Control::Ghost | Control::Flash => timing::PRESS_DOWN_MS,
            Control::Mode => timing::MODE_DOWN_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PressStage {
    #[default]
    Rest,
    ScalingUp,
    ScalingDown,
}

#[derive(Debug, Clone, Default)]
pub struct Animations {
    ghost: PressStage,
    flash: PressStage,
    mode: PressStage,
}

impl Animations {
    fn stage_mut(&mut self, control: Control) -> &mut PressStage {
        match control {
            Control::Ghost => &mut self.ghost,
            Control::Flash => &mut self.flash,
            Control::Mode => &mut self.mode,
        }
    }

    pub fn stage(&self, control: Control) -> PressStage {
        match control {
            Control::Ghost => self.ghost,
            Control::Flash => self.flash,
            Control::Mode => self.mode,
        }
    }

    /// Start the scale-up stage. Presses during a running animation are ignored.
    pub fn begin(&mut self, control: Control) -> bool {
        let stage = self.stage_mut(control);
        if *stage != PressStage::Rest {
            return false;
        }
        *stage = PressStage::ScalingUp;
        true
    }

    /// Scale-up finished; returns true when the press action should run now
    pub fn peak(&mut self, control: Control) -> bool {
        let stage = self.stage_mut(control);
        if *stage != PressStage::ScalingUp {
            return false;
        }
        *stage = PressStage::ScalingDown;
        true
    }

    pub fn finish(&mut self, control: Control) {
        *self.stage_mut(control) = PressStage::Rest;
    }

    /// Icon scale factor
    pub fn scale(&self, control: Control) -> f32 {
        match self.stage(control) {
            PressStage::ScalingUp => ui::PRESS_SCALE,
            PressStage::Rest | PressStage::ScalingDown => 1.0,
        }
    }
}
