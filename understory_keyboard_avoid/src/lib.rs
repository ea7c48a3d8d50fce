// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Keyboard Avoid: keep the focused input above the on-screen keyboard.
//!
//! ## Overview
//!
//! When a virtual keyboard slides up it covers the bottom of the window. This crate
//! computes how far the focused input's container has to move so the input stays
//! visible with a small margin, and produces an animation request that follows the
//! keyboard's own timing. It also provides the policy for a tap-to-dismiss recognizer
//! that resigns focus when the user taps outside the input.
//!
//! The crate does not talk to any window system. The host implements a handful of
//! collaborator traits ([`host`]) and forwards its notifications to a
//! [`KeyboardCoordinator`]. Reference implementations of the view tree
//! ([`arena::ViewArena`]) and of the notification bus ([`bus::NotificationBus`]) are
//! included for hosts that mirror their hierarchy into plain data, and for tests.
//!
//! ## Pieces
//!
//! - [`geometry`]: the pure offset computation. The container is only ever pushed up,
//!   and an input that already clears the keyboard produces an offset of exactly zero.
//! - [`constraint`]: picks between animating a tagged layout constraint's constant and
//!   animating the container's frame origin.
//! - [`dismiss`]: the tap recognizer policy, keyed on [`Capabilities`] tags rather than
//!   concrete view types.
//! - [`coordinator`]: the Idle/Editing state machine tying everything together.
//!
//! ## Workflow
//!
//! 1) Build a coordinator and [`start`](KeyboardCoordinator::start) it against your
//!    [`EventSource`](host::EventSource).
//! 2) Forward every delivered notification, with the subscription it was delivered
//!    under, to [`KeyboardCoordinator::deliver`].
//! 3) Route taps seen by the dismiss recognizer to [`KeyboardCoordinator::tap`], and its
//!    "should receive touch" hook to [`KeyboardCoordinator::should_receive_touch`].
//! 4) [`stop`](KeyboardCoordinator::stop) the coordinator when the screen goes away.
//!
//! ```
//! use kurbo::Rect;
//! use understory_keyboard_avoid::arena::{LocalView, ViewArena, ViewId, ViewRole};
//! use understory_keyboard_avoid::bus::NotificationBus;
//! use understory_keyboard_avoid::constraint::LayoutConstraint;
//! use understory_keyboard_avoid::host::{
//!     Animator, ConstraintStore, FocusControl, GestureSurface, ViewTree,
//! };
//! use understory_keyboard_avoid::{
//!     AnimationRequest, Capabilities, GestureId, HostEvent, KeyboardCoordinator, KeyboardPayload,
//! };
//!
//! struct App {
//!     views: ViewArena,
//! }
//!
//! impl ViewTree<ViewId> for App {
//!     fn window_of(&self, v: ViewId) -> Option<ViewId> { self.views.window_of(v) }
//!     fn window_bounds(&self, w: ViewId) -> Option<Rect> { self.views.window_bounds(w) }
//!     fn frame_in_window(&self, v: ViewId, w: ViewId) -> Option<Rect> {
//!         self.views.frame_in_window(v, w)
//!     }
//!     fn root_view_of(&self, v: ViewId) -> Option<ViewId> { self.views.root_view_of(v) }
//!     fn capabilities(&self, v: ViewId) -> Capabilities { self.views.capabilities(v) }
//! }
//! impl ConstraintStore<ViewId> for App {
//!     fn constraints(&self, v: ViewId) -> &[LayoutConstraint<ViewId>] {
//!         self.views.constraints(v)
//!     }
//! }
//! impl Animator<ViewId> for App {
//!     fn animate(&mut self, request: AnimationRequest<ViewId>) { self.views.apply(&request); }
//! }
//! impl GestureSurface<ViewId> for App {
//!     fn attach_gesture(&mut self, _: ViewId, _: GestureId) {}
//!     fn detach_gesture(&mut self, _: ViewId, _: GestureId) {}
//! }
//! impl FocusControl<ViewId> for App {
//!     fn resign_focus(&mut self, _: ViewId) -> bool { true }
//! }
//!
//! let mut views = ViewArena::new();
//! let screen = Rect::new(0.0, 0.0, 400.0, 800.0);
//! let window = views.insert(None, LocalView::new(screen).with_role(ViewRole::WINDOW));
//! let root = views.insert(
//!     Some(window),
//!     LocalView::new(screen).with_role(ViewRole::CONTROLLER_ROOT),
//! );
//! let field = views.insert(Some(root), LocalView::new(Rect::new(20.0, 710.0, 380.0, 750.0)));
//! let mut app = App { views };
//!
//! let mut bus = NotificationBus::new();
//! let mut keyboard = KeyboardCoordinator::<ViewId>::default();
//! keyboard.start(&mut bus);
//!
//! bus.post(&HostEvent::EditingBegan(Some(field)), |id, e| keyboard.deliver(id, e, &mut app));
//! let shown = KeyboardPayload::new(Rect::new(0.0, 500.0, 400.0, 800.0), 0.25, 7);
//! bus.post(&HostEvent::KeyboardWillChangeFrame(shown), |id, e| {
//!     keyboard.deliver(id, e, &mut app);
//! });
//!
//! // 50 units of clearance, a 300 unit keyboard and 8 units of spacing.
//! assert_eq!(app.views.frame(root).map(|f| f.y0), Some(-258.0));
//!
//! keyboard.stop(&mut bus, &mut app);
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`.
//! - `libm`: `no_std` builds relying on `libm` for floating-point math.
//! - `serde`: `Serialize`/`Deserialize` for [`AvoidanceConfig`] and the event payloads.
//! - `tracing`: `debug`/`trace` events under the `understory_keyboard_avoid` target.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

// `proptest` expands to `std` paths.
#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

pub mod animation;
pub mod arena;
pub mod bus;
pub mod config;
pub mod constraint;
pub mod coordinator;
pub mod dismiss;
pub mod event;
pub mod geometry;
pub mod host;

pub use animation::{AnimationCurve, AnimationOptions, AnimationRequest, AnimationTarget};
pub use config::AvoidanceConfig;
pub use constraint::{ConstraintId, ConstraintLocator, FrameOnlyLocator, IdentifierLocator};
pub use coordinator::{CoordinatorState, KeyboardCoordinator};
pub use dismiss::{Capabilities, DismissGesture, GestureId};
pub use event::{EventKind, HostEvent, KeyboardChangeEvent, KeyboardPayload};
pub use geometry::{AdjustmentPath, LayoutAdjustment, compute_offset};
