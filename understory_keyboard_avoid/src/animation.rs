// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animation plans handed to the host's animation engine.

use crate::constraint::ConstraintId;

/// Shortest duration, in seconds, used for a container animation.
///
/// Keyboard notifications sometimes report zero or near-zero durations; those are
/// raised to this floor so the motion stays perceptible.
pub const MIN_ANIMATION_DURATION: f64 = 0.2;

/// Raise `duration` to at least `min`.
///
/// Non-finite or negative inputs yield `min`.
pub fn floor_duration(duration: f64, min: f64) -> f64 {
    if duration.is_finite() && duration > min {
        duration
    } else {
        min
    }
}

/// Easing curve reported by the keyboard notification.
///
/// Raw values follow the platform numbering; values outside the documented range
/// (keyboards commonly report `7`) are carried through as [`AnimationCurve::Other`] so
/// the host can hand them back unchanged.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnimationCurve {
    /// Slow at both ends.
    #[default]
    EaseInOut,
    /// Slow start.
    EaseIn,
    /// Slow end.
    EaseOut,
    /// Constant speed.
    Linear,
    /// Undocumented platform curve.
    Other(u32),
}

impl AnimationCurve {
    /// Decode a raw platform curve value.
    pub const fn from_raw(raw: u32) -> Self {
        match raw {
            0 => Self::EaseInOut,
            1 => Self::EaseIn,
            2 => Self::EaseOut,
            3 => Self::Linear,
            other => Self::Other(other),
        }
    }

    /// Raw platform curve value.
    pub const fn raw(self) -> u32 {
        match self {
            Self::EaseInOut => 0,
            Self::EaseIn => 1,
            Self::EaseOut => 2,
            Self::Linear => 3,
            Self::Other(other) => other,
        }
    }
}

bitflags::bitflags! {
    /// Behavioral flags for an animation request.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct AnimationFlags: u32 {
        /// Start from the on-screen state of any in-flight animation instead of its
        /// target, so a newer request smoothly retargets the older one.
        const BEGIN_FROM_CURRENT_STATE = 0b0000_0100;
    }
}

/// Flags plus easing curve.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct AnimationOptions {
    /// Behavioral flags.
    pub flags: AnimationFlags,
    /// Easing curve.
    pub curve: AnimationCurve,
}

impl AnimationOptions {
    /// Options that retarget in-flight animations and follow `curve`.
    pub const fn retargeting(curve: AnimationCurve) -> Self {
        Self {
            flags: AnimationFlags::BEGIN_FROM_CURRENT_STATE,
            curve,
        }
    }
}

/// The property change an animation drives.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AnimationTarget<K> {
    /// Set `constraint`'s constant, then animate a layout pass of `container`.
    ConstraintConstant {
        /// View whose layout is animated.
        container: K,
        /// Constraint receiving the value.
        constraint: ConstraintId,
        /// New constant.
        constant: f64,
    },
    /// Animate the vertical origin of `view`'s frame.
    FrameOriginY {
        /// View being moved.
        view: K,
        /// New vertical origin.
        y: f64,
    },
}

/// A fire-and-forget animation request.
///
/// Requests carry no completion; hosts are free to drop them once scheduled.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AnimationRequest<K> {
    /// Duration in seconds.
    pub duration: f64,
    /// Flags and curve.
    pub options: AnimationOptions,
    /// What changes.
    pub target: AnimationTarget<K>,
}
