// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator traits implemented by the host platform.
//!
//! The coordinator never touches a real window system. Everything it needs (event
//! subscription, view-tree queries, constraint enumeration, animation, gesture
//! attachment and focus resignation) goes through the traits below. Views and windows
//! share one handle type `K`: a window is simply the view at the top of a hierarchy.
//!
//! [`ViewArena`](crate::arena::ViewArena) implements [`ViewTree`] and [`ConstraintStore`];
//! [`NotificationBus`](crate::bus::NotificationBus) implements [`EventSource`].

use kurbo::Rect;

use crate::animation::AnimationRequest;
use crate::constraint::LayoutConstraint;
use crate::dismiss::{Capabilities, GestureId};
use crate::event::EventKind;

/// Handle returned by [`EventSource::subscribe`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(pub u64);

/// A source of named notifications.
///
/// Deliveries are tagged with the [`SubscriptionId`] they were made for. Once a
/// subscription is dropped, nothing delivered under another id reaches its owner.
pub trait EventSource {
    /// Register interest in `kind`. Every call creates a new subscription.
    fn subscribe(&mut self, kind: EventKind) -> SubscriptionId;
    /// Drop a subscription. Unknown ids are ignored.
    fn unsubscribe(&mut self, id: SubscriptionId);
}

/// Read-only queries over the host's view hierarchy.
///
/// Every method returns `None` (or empty capabilities) for stale or unmounted handles.
pub trait ViewTree<K> {
    /// Window enclosing `view`; a window is its own window.
    fn window_of(&self, view: K) -> Option<K>;
    /// Bounds of `window` in its own coordinate space.
    fn window_bounds(&self, window: K) -> Option<Rect>;
    /// Frame of `view` converted to `window`'s coordinate space.
    fn frame_in_window(&self, view: K, window: K) -> Option<Rect>;
    /// Root view of the nearest controller enclosing `view`, possibly `view` itself.
    fn root_view_of(&self, view: K) -> Option<K>;
    /// Capability tags of `view`.
    fn capabilities(&self, view: K) -> Capabilities;
}

/// Enumeration of the constraints installed on a view.
pub trait ConstraintStore<K> {
    /// Active constraints installed on `view`.
    fn constraints(&self, view: K) -> &[LayoutConstraint<K>];
}

/// The host's animation engine.
pub trait Animator<K> {
    /// Schedule `request`. Must not block on completion.
    fn animate(&mut self, request: AnimationRequest<K>);
}

/// Surfaces that tap recognizers can be attached to.
pub trait GestureSurface<K> {
    /// Install the recognizer `gesture` on `surface`.
    fn attach_gesture(&mut self, surface: K, gesture: GestureId);
    /// Remove the recognizer `gesture` from `surface`.
    fn detach_gesture(&mut self, surface: K, gesture: GestureId);
}

/// Focus control over text inputs.
pub trait FocusControl<K> {
    /// Ask `view` to give up focus. Returns `false` if it refused or is gone.
    ///
    /// On success the host is expected to post
    /// [`HostEvent::EditingEnded`](crate::event::HostEvent::EditingEnded).
    fn resign_focus(&mut self, view: K) -> bool;
}

/// Everything the coordinator needs from the host while handling events.
pub trait Host<K>:
    ViewTree<K> + ConstraintStore<K> + Animator<K> + GestureSurface<K> + FocusControl<K>
{
}

impl<K, T> Host<K> for T where
    T: ViewTree<K> + ConstraintStore<K> + Animator<K> + GestureSurface<K> + FocusControl<K>
{
}
