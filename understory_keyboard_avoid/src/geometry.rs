// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Offset computation: how far a container must move so a view clears the keyboard.
//!
//! All rectangles are expected in the window's coordinate space, except the keyboard
//! frame, which platforms report in screen space. For a full-screen window the two
//! coincide, which is the case these helpers are written for.
//!
//! ```
//! use kurbo::Rect;
//! use understory_keyboard_avoid::geometry::compute_offset;
//!
//! let window = Rect::new(0.0, 0.0, 400.0, 800.0);
//! let field = Rect::new(20.0, 710.0, 380.0, 750.0);
//! let container = Rect::new(0.0, 0.0, 400.0, 800.0);
//! let keyboard = Rect::new(0.0, 500.0, 400.0, 800.0);
//!
//! assert_eq!(compute_offset(window, field, container, keyboard, 8.0), -258.0);
//! ```

use kurbo::Rect;

use crate::constraint::ConstraintId;

/// Distance between the bottom edge of `view_frame_in_window` and the bottom edge of
/// the window, measured relative to the container's own top edge.
///
/// Measuring from the container keeps the result stable while the container itself is
/// displaced: moving the container moves the view by the same amount, and both terms
/// cancel out.
pub fn view_clearance(
    window_bounds: Rect,
    view_frame_in_window: Rect,
    container_frame_in_window: Rect,
) -> f64 {
    container_frame_in_window.min_y() + window_bounds.height() - view_frame_in_window.max_y()
}

/// Height of the keyboard that overlaps the window from below.
///
/// A hidden keyboard reports a frame whose top edge sits at the bottom of the window,
/// giving a height of zero.
pub fn keyboard_height(window_bounds: Rect, keyboard_frame: Rect) -> f64 {
    window_bounds.height() - keyboard_frame.min_y()
}

/// Vertical offset to apply to the container so the view clears the keyboard plus
/// `spacing`.
///
/// The result is never positive: containers are only ever pushed up. When the view
/// already clears the keyboard with room to spare, the offset is exactly `0.0`.
pub fn compute_offset(
    window_bounds: Rect,
    view_frame_in_window: Rect,
    container_frame_in_window: Rect,
    keyboard_frame: Rect,
    spacing: f64,
) -> f64 {
    let clearance = view_clearance(
        window_bounds,
        view_frame_in_window,
        container_frame_in_window,
    );
    let overlap = clearance - keyboard_height(window_bounds, keyboard_frame) - spacing;
    if overlap >= 0.0 { 0.0 } else { overlap }
}

/// How an offset is applied to the container.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AdjustmentPath {
    /// Set the constant of the container's bottom-inset constraint and animate layout.
    Constraint(ConstraintId),
    /// Move the container's vertical origin directly.
    FrameOrigin,
}

/// Result of processing one keyboard change for the focused view.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LayoutAdjustment<K> {
    /// Container that receives the offset.
    pub container: K,
    /// Target offset; zero or negative.
    pub offset: f64,
    /// Whether the offset goes through a constraint or the frame origin.
    pub path: AdjustmentPath,
}
