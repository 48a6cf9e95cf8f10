// SPDX-License-Identifier: GPL-3.0-only

//! Press-and-hold recognizer for the preview area

/// Identifies one press so a late recognition delay can be discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PressId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoldGesture {
    #[default]
    Idle,
    /// Pressed, waiting for the minimum press duration
    Pending(PressId),
    /// Recognized and still held
    Active,
}

/// Result of releasing the press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// Released before recognition
    Cancelled,
    /// The hold gesture ended
    Ended,
    /// No press in progress
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct HoldRecognizer {
    gesture: HoldGesture,
    presses: u64,
}

impl HoldRecognizer {
    pub fn gesture(&self) -> HoldGesture {
        self.gesture
    }

    /// Start a press; the caller delivers [`recognize`](Self::recognize) after the hold delay.
    ///
    /// A further press while a hold is active (a second finger) is absorbed so
    /// the next release still ends that hold.
    pub fn press(&mut self) -> Option<PressId> {
        if self.gesture == HoldGesture::Active {
            return None;
        }
        self.presses += 1;
        let id = PressId(self.presses);
        self.gesture = HoldGesture::Pending(id);
        Some(id)
    }

    /// Returns true when `id` is still held and the gesture begins now
    pub fn recognize(&mut self, id: PressId) -> bool {
        if self.gesture == HoldGesture::Pending(id) {
            self.gesture = HoldGesture::Active;
            true
        } else {
            false
        }
    }

    pub fn release(&mut self) -> Release {
        let result = match self.gesture {
            HoldGesture::Idle => Release::Ignored,
            HoldGesture::Pending(_) => Release::Cancelled,
            HoldGesture::Active => Release::Ended,
        };
        self.gesture = HoldGesture::Idle;
        result
    }
}
