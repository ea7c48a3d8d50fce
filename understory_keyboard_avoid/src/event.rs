// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Events delivered by the host: keyboard geometry changes and editing focus changes.

use kurbo::Rect;

use crate::animation::AnimationCurve;

/// The three notifications the coordinator subscribes to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    /// The keyboard is about to change its frame (show, hide, resize).
    KeyboardWillChangeFrame,
    /// A text input became the focused responder.
    EditingBegan,
    /// The focused text input stopped editing.
    EditingEnded,
}

impl EventKind {
    /// Every kind, in subscription order.
    pub const ALL: [Self; 3] = [
        Self::KeyboardWillChangeFrame,
        Self::EditingBegan,
        Self::EditingEnded,
    ];
}

/// A validated keyboard change.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyboardChangeEvent {
    /// Frame the keyboard will occupy once the change completes, in screen space.
    pub end_frame: Rect,
    /// Duration of the keyboard's own animation in seconds; finite and non-negative.
    pub duration: f64,
    /// Easing curve of the keyboard's own animation.
    pub curve: AnimationCurve,
}

/// Raw keyboard notification payload as delivered by the platform.
///
/// Every field is optional because platforms deliver these as loosely typed
/// dictionaries; [`KeyboardPayload::to_event`] validates them.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyboardPayload {
    /// Frame at the end of the change.
    pub end_frame: Option<Rect>,
    /// Animation duration in seconds.
    pub duration: Option<f64>,
    /// Raw platform curve value.
    pub curve: Option<u32>,
}

impl KeyboardPayload {
    /// Payload with every field present.
    pub const fn new(end_frame: Rect, duration: f64, curve: u32) -> Self {
        Self {
            end_frame: Some(end_frame),
            duration: Some(duration),
            curve: Some(curve),
        }
    }

    /// Validate the payload.
    ///
    /// Returns `None` if a field is missing, the duration is negative or not finite, or
    /// the frame has non-finite coordinates.
    pub fn to_event(&self) -> Option<KeyboardChangeEvent> {
        let end_frame = self.end_frame?;
        let duration = self.duration?;
        let curve = self.curve?;
        if !end_frame.is_finite() || !duration.is_finite() || duration < 0.0 {
            return None;
        }
        Some(KeyboardChangeEvent {
            end_frame,
            duration,
            curve: AnimationCurve::from_raw(curve),
        })
    }
}

impl From<KeyboardChangeEvent> for KeyboardPayload {
    fn from(event: KeyboardChangeEvent) -> Self {
        Self::new(event.end_frame, event.duration, event.curve.raw())
    }
}

/// A notification as posted on the host's event bus.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum HostEvent<K> {
    /// Keyboard frame change with its raw payload.
    KeyboardWillChangeFrame(KeyboardPayload),
    /// Editing began; `None` when the notification's sender is not a view.
    EditingBegan(Option<K>),
    /// Editing ended. The view is implied by the coordinator's current state.
    EditingEnded,
}

impl<K> HostEvent<K> {
    /// Which subscription this event is delivered to.
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::KeyboardWillChangeFrame(_) => EventKind::KeyboardWillChangeFrame,
            Self::EditingBegan(_) => EventKind::EditingBegan,
            Self::EditingEnded => EventKind::EditingEnded,
        }
    }
}
