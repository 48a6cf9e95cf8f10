// SPDX-License-Identifier: GPL-3.0-only

//! Ghost overlay: a still from the live preview shown translucently on top of it

use crate::backends::camera::StillImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GhostState {
    #[default]
    Inactive,
    Active,
}

impl GhostState {
    /// Icon of the ghost button, which shows the action it will perform
    pub fn icon_name(self) -> &'static str {
        match self {
            GhostState::Inactive => "ghost-on",
            GhostState::Active => "ghost-off",
        }
    }
}

/// Identifies one still capture request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaptureRequest(u64);

#[derive(Debug, Clone, Default)]
pub struct GhostOverlay {
    state: GhostState,
    pending: Option<CaptureRequest>,
    requests: u64,
    image: Option<StillImage>,
    opacity: f32,
}

impl GhostOverlay {
    pub fn state(&self) -> GhostState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == GhostState::Active
    }

    /// Turn the ghost on and issue a capture request
    pub fn activate(&mut self) -> CaptureRequest {
        self.requests += 1;
        let request = CaptureRequest(self.requests);
        self.state = GhostState::Active;
        self.pending = Some(request);
        request
    }

    /// Turn the ghost off, dropping the still and any pending request
    pub fn deactivate(&mut self) {
        self.state = GhostState::Inactive;
        self.pending = None;
        self.image = None;
        self.opacity = 0.0;
    }

    /// Show a captured still. Returns false when the request is no longer wanted.
    pub fn show(&mut self, request: CaptureRequest, image: StillImage, opacity: f32) -> bool {
        if !self.is_active() || self.pending != Some(request) {
            return false;
        }
        self.pending = None;
        self.image = Some(image);
        self.opacity = opacity;
        true
    }

    /// Forget a failed request
    pub fn abandon(&mut self, request: CaptureRequest) {
        if self.pending == Some(request) {
            self.pending = None;
        }
    }

    pub fn image(&self) -> Option<&StillImage> {
        self.image.as_ref()
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still() -> StillImage {
        StillImage {
            width: 1,
            height: 1,
            rgba: vec![10, 20, 30, 255],
        }
    }

    #[test]
    fn shows_still_for_the_pending_request() {
        let mut ghost = GhostOverlay::default();
        let request = ghost.activate();
        assert_eq!(ghost.state().icon_name(), "ghost-off");
        assert!(ghost.show(request, still(), 0.6));
        assert_eq!(ghost.opacity(), 0.6);
        assert!(ghost.image().is_some());
    }

    #[test]
    fn late_still_after_deactivation_is_dropped() {
        let mut ghost = GhostOverlay::default();
        let request = ghost.activate();
        ghost.deactivate();
        assert!(!ghost.show(request, still(), 0.6));
        assert_eq!(ghost.opacity(), 0.0);
        assert!(ghost.image().is_none());
        assert_eq!(ghost.state().icon_name(), "ghost-on");
    }

    #[test]
    fn superseded_request_is_dropped() {
        let mut ghost = GhostOverlay::default();
        let first = ghost.activate();
        ghost.deactivate();
        let second = ghost.activate();
        assert!(!ghost.show(first, still(), 0.6));
        assert!(ghost.show(second, still(), 0.6));
    }
}
