// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinator configuration.

use crate::animation::MIN_ANIMATION_DURATION;

/// Spacing used when none is configured.
pub const DEFAULT_SPACING: f64 = 8.0;

/// Tunables for a [`KeyboardCoordinator`](crate::coordinator::KeyboardCoordinator).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AvoidanceConfig {
    /// Gap kept between the focused view's bottom edge and the keyboard's top edge.
    pub spacing: f64,
    /// Floor applied to keyboard animation durations, in seconds.
    pub min_animation_duration: f64,
}

impl Default for AvoidanceConfig {
    fn default() -> Self {
        Self {
            spacing: DEFAULT_SPACING,
            min_animation_duration: MIN_ANIMATION_DURATION,
        }
    }
}
