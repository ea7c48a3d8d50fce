// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The keyboard coordinator: a two-state machine driven by host notifications.
//!
//! ## States
//!
//! - [`CoordinatorState::Idle`]: no focused view, dismiss gesture detached.
//! - [`CoordinatorState::Editing`]: a focused view is recorded and, if it lives in a
//!   window, the dismiss gesture is attached to that window.
//!
//! ## Transitions
//!
//! | Event                         | From          | To      | Effect                                        |
//! |-------------------------------|---------------|---------|-----------------------------------------------|
//! | editing began (`view`)        | Idle, Editing | Editing | record `view`, move gesture to its window     |
//! | keyboard will change frame    | Editing       | Editing | compute offset, request one animation         |
//! | keyboard will change frame    | Idle          | Idle    | nothing                                       |
//! | editing ended                 | Editing       | Idle    | detach gesture, forget the view               |
//! | accepted tap                  | Editing       | Editing | ask the view to resign; host posts "ended"    |
//! | [`stop`](KeyboardCoordinator::stop) | any     | Idle    | unsubscribe, detach gesture, forget the view  |
//!
//! A new "editing began" overwrites the recorded view without requiring an "editing
//! ended" first. "Editing ended" carries no view and always clears whatever is
//! recorded.
//!
//! Every failure (stale or windowless view, missing controller root, malformed
//! payload) turns the current event into a no-op. Nothing is retried or reported.

use core::fmt::Debug;

use smallvec::SmallVec;

use crate::animation::{AnimationOptions, AnimationRequest, AnimationTarget, floor_duration};
use crate::config::AvoidanceConfig;
use crate::constraint::{ConstraintLocator, IdentifierLocator};
use crate::dismiss::{DismissGesture, GestureId};
use crate::event::{EventKind, HostEvent, KeyboardChangeEvent};
use crate::geometry::{AdjustmentPath, LayoutAdjustment, compute_offset};
use crate::host::{
    Animator, ConstraintStore, EventSource, FocusControl, GestureSurface, Host, SubscriptionId,
    ViewTree,
};

/// Recognizer id used unless [`KeyboardCoordinator::with_gesture`] overrides it.
pub const DISMISS_GESTURE_ID: GestureId = GestureId(1);

/// Coarse state of a [`KeyboardCoordinator`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CoordinatorState {
    /// No focused view.
    Idle,
    /// A focused view is recorded.
    Editing,
}

/// Keeps the focused view above the keyboard and dismisses the keyboard on outside taps.
#[derive(Clone, Debug)]
pub struct KeyboardCoordinator<K, L = IdentifierLocator> {
    config: AvoidanceConfig,
    locator: L,
    focused: Option<K>,
    gesture: DismissGesture<K>,
    subscriptions: SmallVec<[SubscriptionId; 3]>,
}

impl<K> Default for KeyboardCoordinator<K, IdentifierLocator>
where
    K: Copy + PartialEq + Debug,
{
    fn default() -> Self {
        Self::new(IdentifierLocator::default())
    }
}

impl<K, L> KeyboardCoordinator<K, L>
where
    K: Copy + PartialEq + Debug,
    L: ConstraintLocator<K>,
{
    /// A coordinator with the default configuration.
    pub fn new(locator: L) -> Self {
        Self::with_config(locator, AvoidanceConfig::default())
    }

    /// A coordinator with an explicit configuration.
    pub fn with_config(locator: L, config: AvoidanceConfig) -> Self {
        Self {
            config,
            locator,
            focused: None,
            gesture: DismissGesture::new(DISMISS_GESTURE_ID),
            subscriptions: SmallVec::new(),
        }
    }

    /// Replace the dismiss recognizer (for example to change its id or exclusion set).
    ///
    /// Call before the first "editing began"; an attached recognizer is not moved.
    pub fn with_gesture(mut self, gesture: DismissGesture<K>) -> Self {
        self.gesture = gesture;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &AvoidanceConfig {
        &self.config
    }

    /// Gap kept between the focused view and the keyboard.
    pub fn spacing(&self) -> f64 {
        self.config.spacing
    }

    /// Change the spacing. Applies from the next keyboard change on.
    pub fn set_spacing(&mut self, spacing: f64) {
        self.config.spacing = spacing;
    }

    /// Constraint lookup strategy.
    pub fn locator(&self) -> &L {
        &self.locator
    }

    /// Current state.
    pub fn state(&self) -> CoordinatorState {
        if self.focused.is_some() {
            CoordinatorState::Editing
        } else {
            CoordinatorState::Idle
        }
    }

    /// The recorded focused view. It may have gone stale since it was recorded.
    pub fn focused_view(&self) -> Option<K> {
        self.focused
    }

    /// The dismiss recognizer.
    pub fn gesture(&self) -> &DismissGesture<K> {
        &self.gesture
    }

    /// Live subscription handles, in subscription order.
    pub fn subscriptions(&self) -> &[SubscriptionId] {
        &self.subscriptions
    }

    /// Subscribe to the three notifications on `source`.
    ///
    /// Not guarded: starting twice subscribes twice, and every event is then handled
    /// twice.
    pub fn start(&mut self, source: &mut (impl EventSource + ?Sized)) {
        for kind in EventKind::ALL {
            self.subscriptions.push(source.subscribe(kind));
        }
        kdebug!(subscriptions = self.subscriptions.len(), "started");
    }

    /// Drop every subscription taken by [`start`](Self::start) and return to idle.
    pub fn stop(
        &mut self,
        source: &mut (impl EventSource + ?Sized),
        surfaces: &mut (impl GestureSurface<K> + ?Sized),
    ) {
        for id in self.subscriptions.drain(..) {
            source.unsubscribe(id);
        }
        self.gesture.detach(surfaces);
        self.focused = None;
        kdebug!("stopped");
    }

    /// Handle a notification delivered under `subscription`.
    ///
    /// Deliveries made for a subscription this coordinator does not hold are dropped,
    /// so a stopped coordinator stays idle on a bus that other subscribers still use.
    pub fn deliver(
        &mut self,
        subscription: SubscriptionId,
        event: &HostEvent<K>,
        host: &mut (impl Host<K> + ?Sized),
    ) {
        if !self.subscriptions.contains(&subscription) {
            ktrace!(?subscription, "delivery for a foreign subscription ignored");
            return;
        }
        self.handle(event, host);
    }

    /// Dispatch a host notification to the matching handler.
    ///
    /// Unlike [`deliver`](Self::deliver) this does not check subscriptions.
    pub fn handle(&mut self, event: &HostEvent<K>, host: &mut (impl Host<K> + ?Sized)) {
        match event {
            HostEvent::KeyboardWillChangeFrame(payload) => match payload.to_event() {
                Some(change) => {
                    self.keyboard_frame_will_change(&change, host);
                }
                None => {
                    ktrace!(?payload, "malformed keyboard payload ignored");
                }
            },
            HostEvent::EditingBegan(Some(view)) => self.editing_began(*view, host),
            HostEvent::EditingBegan(None) => {
                ktrace!("editing began without a view; ignored");
            }
            HostEvent::EditingEnded => self.editing_ended(host),
        }
    }

    /// Record `view` as focused and move the dismiss gesture to its window.
    pub fn editing_began(
        &mut self,
        view: K,
        host: &mut (impl ViewTree<K> + GestureSurface<K> + ?Sized),
    ) {
        if self.focused.is_some_and(|previous| previous != view) {
            kdebug!(previous = ?self.focused, ?view, "focus moved without an end event");
        }
        self.focused = Some(view);
        match host.window_of(view) {
            Some(window) => {
                self.gesture.attach(host, window);
                kdebug!(?view, ?window, "editing began");
            }
            None => {
                self.gesture.detach(host);
                kdebug!(?view, "editing began outside a window; no dismiss gesture");
            }
        }
    }

    /// Forget the focused view and detach the dismiss gesture.
    pub fn editing_ended(&mut self, surfaces: &mut (impl GestureSurface<K> + ?Sized)) {
        kdebug!(view = ?self.focused, surface = ?self.gesture.attached_to(), "editing ended");
        self.gesture.detach(surfaces);
        self.focused = None;
    }

    /// Compute the container offset for `event` and request its animation.
    ///
    /// Returns the adjustment that was requested, or `None` if the event was skipped.
    pub fn keyboard_frame_will_change(
        &self,
        event: &KeyboardChangeEvent,
        host: &mut (impl ViewTree<K> + ConstraintStore<K> + Animator<K> + ?Sized),
    ) -> Option<LayoutAdjustment<K>> {
        let Some(view) = self.focused else {
            ktrace!("keyboard change ignored: no focused view");
            return None;
        };
        let Some(adjustment) = self.resolve(view, event, &*host) else {
            ktrace!(?view, "keyboard change ignored: focused view is detached");
            return None;
        };

        let target = match adjustment.path {
            AdjustmentPath::Constraint(constraint) => AnimationTarget::ConstraintConstant {
                container: adjustment.container,
                constraint,
                constant: adjustment.offset,
            },
            AdjustmentPath::FrameOrigin => AnimationTarget::FrameOriginY {
                view: adjustment.container,
                y: adjustment.offset,
            },
        };
        let request = AnimationRequest {
            duration: floor_duration(event.duration, self.config.min_animation_duration),
            options: AnimationOptions::retargeting(event.curve),
            target,
        };
        kdebug!(?view, ?request, "animating container");
        host.animate(request);
        Some(adjustment)
    }

    /// Whether the dismiss recognizer should receive a touch on `target`.
    pub fn should_receive_touch(
        &self,
        target: Option<K>,
        views: &(impl ViewTree<K> + ?Sized),
    ) -> bool {
        self.gesture
            .should_receive(target.map(|view| views.capabilities(view)))
    }

    /// Handle a tap seen by the dismiss recognizer.
    ///
    /// Returns `true` if the focused view was asked to resign and accepted.
    pub fn tap(
        &self,
        target: Option<K>,
        host: &mut (impl ViewTree<K> + FocusControl<K> + ?Sized),
    ) -> bool {
        if !self.should_receive_touch(target, &*host) {
            ktrace!(?target, "tap on excluded view ignored");
            return false;
        }
        let Some(view) = self.focused else {
            return false;
        };
        let resigned = host.resign_focus(view);
        kdebug!(?view, resigned, "tap outside input");
        resigned
    }

    fn resolve(
        &self,
        view: K,
        event: &KeyboardChangeEvent,
        host: &(impl ViewTree<K> + ConstraintStore<K> + ?Sized),
    ) -> Option<LayoutAdjustment<K>> {
        let window = host.window_of(view)?;
        let container = host.root_view_of(view)?;
        let window_bounds = host.window_bounds(window)?;
        let view_frame = host.frame_in_window(view, window)?;
        let container_frame = host.frame_in_window(container, window)?;

        let offset = compute_offset(
            window_bounds,
            view_frame,
            container_frame,
            event.end_frame,
            self.config.spacing,
        );
        let path = match self.locator.locate(container, host.constraints(container)) {
            Some(constraint) => AdjustmentPath::Constraint(constraint),
            None => AdjustmentPath::FrameOrigin,
        };
        Some(LayoutAdjustment {
            container,
            offset,
            path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    use kurbo::Rect;

    use crate::animation::{AnimationCurve, AnimationFlags};
    use crate::arena::{LocalView, ViewArena, ViewId, ViewRole};
    use crate::bus::NotificationBus;
    use crate::constraint::{
        ConstraintId, ENCAPSULATED_LAYOUT_TOP, FrameOnlyLocator, LayoutConstraint,
    };
    use crate::dismiss::Capabilities;
    use crate::event::KeyboardPayload;

    /// Arena-backed host that records every side effect and settles animations at once.
    #[derive(Default)]
    struct TestHost {
        arena: ViewArena,
        animations: Vec<AnimationRequest<ViewId>>,
        gestures: Vec<(ViewId, GestureId)>,
        resigned: Vec<ViewId>,
        refuse_resign: bool,
    }

    impl ViewTree<ViewId> for TestHost {
        fn window_of(&self, view: ViewId) -> Option<ViewId> {
            self.arena.window_of(view)
        }

        fn window_bounds(&self, window: ViewId) -> Option<Rect> {
            self.arena.window_bounds(window)
        }

        fn frame_in_window(&self, view: ViewId, window: ViewId) -> Option<Rect> {
            self.arena.frame_in_window(view, window)
        }

        fn root_view_of(&self, view: ViewId) -> Option<ViewId> {
            self.arena.root_view_of(view)
        }

        fn capabilities(&self, view: ViewId) -> Capabilities {
            self.arena.capabilities(view)
        }
    }

    impl ConstraintStore<ViewId> for TestHost {
        fn constraints(&self, view: ViewId) -> &[LayoutConstraint<ViewId>] {
            self.arena.constraints(view)
        }
    }

    impl Animator<ViewId> for TestHost {
        fn animate(&mut self, request: AnimationRequest<ViewId>) {
            self.arena.apply(&request);
            self.animations.push(request);
        }
    }

    impl GestureSurface<ViewId> for TestHost {
        fn attach_gesture(&mut self, surface: ViewId, gesture: GestureId) {
            self.gestures.push((surface, gesture));
        }

        fn detach_gesture(&mut self, surface: ViewId, gesture: GestureId) {
            self.gestures.retain(|&entry| entry != (surface, gesture));
        }
    }

    impl FocusControl<ViewId> for TestHost {
        fn resign_focus(&mut self, view: ViewId) -> bool {
            if self.refuse_resign || !self.arena.is_alive(view) {
                return false;
            }
            self.resigned.push(view);
            true
        }
    }

    /// A full-screen form: window, controller root, two fields, a button and a nav bar.
    struct Screen {
        host: TestHost,
        window: ViewId,
        root: ViewId,
        field: ViewId,
        upper_field: ViewId,
        button: ViewId,
        nav_bar: ViewId,
        content: ViewId,
    }

    impl Screen {
        fn new() -> Self {
            let mut arena = ViewArena::new();
            let full = Rect::new(0.0, 0.0, 400.0, 800.0);
            let window = arena.insert(None, LocalView::new(full).with_role(ViewRole::WINDOW));
            let root = arena.insert(
                Some(window),
                LocalView::new(full).with_role(ViewRole::CONTROLLER_ROOT),
            );
            let nav_bar = arena.insert(
                Some(root),
                LocalView::new(Rect::new(0.0, 0.0, 400.0, 44.0))
                    .with_capabilities(Capabilities::NAVIGATION_BAR),
            );
            let content =
                arena.insert(Some(root), LocalView::new(Rect::new(0.0, 44.0, 400.0, 800.0)));
            let upper_field =
                arena.insert(Some(content), LocalView::new(Rect::new(20.0, 56.0, 380.0, 96.0)));
            let field =
                arena.insert(Some(content), LocalView::new(Rect::new(20.0, 666.0, 380.0, 706.0)));
            let button = arena.insert(
                Some(content),
                LocalView::new(Rect::new(0.0, 716.0, 100.0, 756.0))
                    .with_capabilities(Capabilities::INTERACTIVE_CONTROL),
            );
            Self {
                host: TestHost {
                    arena,
                    ..TestHost::default()
                },
                window,
                root,
                field,
                upper_field,
                button,
                nav_bar,
                content,
            }
        }

        fn add_top_constraint(&mut self) -> ConstraintId {
            self.host
                .arena
                .add_constraint(
                    self.root,
                    LayoutConstraint::new(ConstraintId(0), self.root, 0.0)
                        .with_second_item(self.window)
                        .with_identifier(ENCAPSULATED_LAYOUT_TOP),
                )
                .unwrap()
        }

        fn root_y(&self) -> f64 {
            self.host.arena.frame(self.root).unwrap().y0
        }

        fn field_bottom(&self) -> f64 {
            let frame = self.host.arena.frame_in_window(self.field, self.window);
            frame.unwrap().max_y()
        }
    }

    fn keyboard(min_y: f64, duration: f64) -> KeyboardChangeEvent {
        KeyboardChangeEvent {
            end_frame: Rect::new(0.0, min_y, 400.0, min_y + 300.0),
            duration,
            curve: AnimationCurve::Other(7),
        }
    }

    fn show() -> KeyboardChangeEvent {
        keyboard(500.0, 0.25)
    }

    fn hide() -> KeyboardChangeEvent {
        keyboard(800.0, 0.25)
    }

    #[test]
    fn start_subscribes_to_all_three_and_stop_unsubscribes() {
        let mut screen = Screen::new();
        let mut bus = NotificationBus::new();
        let mut coord = KeyboardCoordinator::<ViewId>::default();
        coord.start(&mut bus);
        for kind in EventKind::ALL {
            assert_eq!(bus.subscription_count(kind), 1);
        }
        assert_eq!(coord.subscriptions().len(), 3);

        coord.stop(&mut bus, &mut screen.host);
        assert!(bus.is_empty());
        assert!(coord.subscriptions().is_empty());
    }

    #[test]
    fn double_start_double_subscribes() {
        let mut screen = Screen::new();
        let mut bus = NotificationBus::new();
        let mut coord = KeyboardCoordinator::<ViewId>::default();
        coord.start(&mut bus);
        coord.start(&mut bus);
        assert_eq!(bus.subscription_count(EventKind::KeyboardWillChangeFrame), 2);

        bus.post(&HostEvent::EditingBegan(Some(screen.field)), |id, e| {
            coord.deliver(id, e, &mut screen.host);
        });
        let payload = KeyboardPayload::from(show());
        let delivered = bus.post(&HostEvent::KeyboardWillChangeFrame(payload), |id, e| {
            coord.deliver(id, e, &mut screen.host);
        });
        assert_eq!(delivered, 2);
        assert_eq!(screen.host.animations.len(), 2);
        // The second pass sees the settled frame and asks for the same target.
        assert_eq!(screen.root_y(), -258.0);

        coord.stop(&mut bus, &mut screen.host);
        assert!(bus.is_empty());
    }

    #[test]
    fn keyboard_change_while_idle_is_noop() {
        let mut screen = Screen::new();
        let coord = KeyboardCoordinator::<ViewId>::default();
        assert_eq!(coord.state(), CoordinatorState::Idle);
        assert_eq!(coord.keyboard_frame_will_change(&show(), &mut screen.host), None);
        assert!(screen.host.animations.is_empty());
    }

    #[test]
    fn editing_began_attaches_gesture_to_window() {
        let mut screen = Screen::new();
        let mut coord = KeyboardCoordinator::<ViewId>::default();
        coord.editing_began(screen.field, &mut screen.host);
        assert_eq!(coord.state(), CoordinatorState::Editing);
        assert_eq!(coord.focused_view(), Some(screen.field));
        assert_eq!(screen.host.gestures, [(screen.window, DISMISS_GESTURE_ID)]);
        assert_eq!(coord.gesture().attached_to(), Some(screen.window));
    }

    #[test]
    fn keyboard_show_moves_frame_origin() {
        let mut screen = Screen::new();
        let mut coord = KeyboardCoordinator::<ViewId>::default();
        coord.editing_began(screen.field, &mut screen.host);

        let adjustment = coord
            .keyboard_frame_will_change(&show(), &mut screen.host)
            .unwrap();
        assert_eq!(
            adjustment,
            LayoutAdjustment {
                container: screen.root,
                offset: -258.0,
                path: AdjustmentPath::FrameOrigin,
            }
        );

        let request = screen.host.animations[0];
        assert_eq!(request.duration, 0.25);
        assert!(
            request
                .options
                .flags
                .contains(AnimationFlags::BEGIN_FROM_CURRENT_STATE)
        );
        assert_eq!(request.options.curve, AnimationCurve::Other(7));
        assert_eq!(
            request.target,
            AnimationTarget::FrameOriginY {
                view: screen.root,
                y: -258.0,
            }
        );
        assert_eq!(screen.root_y(), -258.0);
    }

    #[test]
    fn repeated_change_is_stable_and_hide_restores() {
        let mut screen = Screen::new();
        let mut coord = KeyboardCoordinator::<ViewId>::default();
        coord.editing_began(screen.field, &mut screen.host);

        coord.keyboard_frame_will_change(&show(), &mut screen.host);
        let again = coord
            .keyboard_frame_will_change(&show(), &mut screen.host)
            .unwrap();
        assert_eq!(again.offset, -258.0);

        let hidden = coord
            .keyboard_frame_will_change(&hide(), &mut screen.host)
            .unwrap();
        assert_eq!(hidden.offset, 0.0);
        assert_eq!(screen.root_y(), 0.0);
    }

    #[test]
    fn field_already_clear_does_not_move() {
        let mut screen = Screen::new();
        let mut coord = KeyboardCoordinator::<ViewId>::default();
        coord.editing_began(screen.upper_field, &mut screen.host);
        let adjustment = coord
            .keyboard_frame_will_change(&show(), &mut screen.host)
            .unwrap();
        assert_eq!(adjustment.offset, 0.0);
        assert_eq!(screen.root_y(), 0.0);
    }

    #[test]
    fn durations_are_floored() {
        let mut screen = Screen::new();
        let mut coord = KeyboardCoordinator::<ViewId>::default();
        coord.editing_began(screen.field, &mut screen.host);

        coord.keyboard_frame_will_change(&keyboard(500.0, 0.05), &mut screen.host);
        coord.keyboard_frame_will_change(&keyboard(500.0, 0.0), &mut screen.host);
        coord.keyboard_frame_will_change(&keyboard(500.0, 0.4), &mut screen.host);
        let durations: Vec<f64> = screen.host.animations.iter().map(|a| a.duration).collect();
        assert_eq!(durations, [0.2, 0.2, 0.4]);
    }

    #[test]
    fn configured_floor_is_used() {
        let mut screen = Screen::new();
        let config = AvoidanceConfig {
            min_animation_duration: 0.3,
            ..AvoidanceConfig::default()
        };
        let mut coord = KeyboardCoordinator::with_config(IdentifierLocator::default(), config);
        coord.editing_began(screen.field, &mut screen.host);
        coord.keyboard_frame_will_change(&show(), &mut screen.host);
        assert_eq!(screen.host.animations[0].duration, 0.3);
    }

    #[test]
    fn tagged_constraint_takes_the_constant_path() {
        let mut screen = Screen::new();
        let top = screen.add_top_constraint();
        let mut coord = KeyboardCoordinator::<ViewId>::default();
        coord.editing_began(screen.field, &mut screen.host);

        let adjustment = coord
            .keyboard_frame_will_change(&show(), &mut screen.host)
            .unwrap();
        assert_eq!(adjustment.path, AdjustmentPath::Constraint(top));
        assert_eq!(
            screen.host.animations[0].target,
            AnimationTarget::ConstraintConstant {
                container: screen.root,
                constraint: top,
                constant: -258.0,
            }
        );
        assert_eq!(screen.host.arena.constraint(top).unwrap().constant, -258.0);
        assert_eq!(screen.root_y(), -258.0);
        assert_eq!(screen.field_bottom(), 492.0);
    }

    #[test]
    fn frame_only_locator_ignores_constraints() {
        let mut screen = Screen::new();
        screen.add_top_constraint();
        let mut coord = KeyboardCoordinator::new(FrameOnlyLocator);
        coord.editing_began(screen.field, &mut screen.host);
        let adjustment = coord
            .keyboard_frame_will_change(&show(), &mut screen.host)
            .unwrap();
        assert_eq!(adjustment.path, AdjustmentPath::FrameOrigin);
        assert_eq!(screen.root_y(), -258.0);
    }

    #[test]
    fn spacing_applies_to_the_next_event() {
        let mut screen = Screen::new();
        let mut coord = KeyboardCoordinator::<ViewId>::default();
        assert_eq!(coord.spacing(), 8.0);
        coord.editing_began(screen.field, &mut screen.host);
        coord.set_spacing(20.0);
        let adjustment = coord
            .keyboard_frame_will_change(&show(), &mut screen.host)
            .unwrap();
        assert_eq!(adjustment.offset, -270.0);
    }

    #[test]
    fn removed_focused_view_is_skipped() {
        let mut screen = Screen::new();
        let mut coord = KeyboardCoordinator::<ViewId>::default();
        coord.editing_began(screen.field, &mut screen.host);
        screen.host.arena.remove(screen.field);

        assert_eq!(coord.keyboard_frame_will_change(&show(), &mut screen.host), None);
        assert!(screen.host.animations.is_empty());
        assert_eq!(screen.root_y(), 0.0);
    }

    #[test]
    fn view_without_controller_root_is_skipped() {
        let mut screen = Screen::new();
        let bare = screen.host.arena.insert(
            Some(screen.window),
            LocalView::new(Rect::new(0.0, 700.0, 400.0, 740.0)),
        );
        let mut coord = KeyboardCoordinator::<ViewId>::default();
        coord.editing_began(bare, &mut screen.host);
        assert_eq!(coord.keyboard_frame_will_change(&show(), &mut screen.host), None);
    }

    #[test]
    fn windowless_view_records_focus_without_gesture() {
        let mut screen = Screen::new();
        let floating = screen
            .host
            .arena
            .insert(None, LocalView::new(Rect::new(0.0, 700.0, 400.0, 740.0)));
        let mut coord = KeyboardCoordinator::<ViewId>::default();
        coord.editing_began(screen.field, &mut screen.host);
        coord.editing_began(floating, &mut screen.host);

        assert_eq!(coord.focused_view(), Some(floating));
        assert!(screen.host.gestures.is_empty());
        assert_eq!(coord.keyboard_frame_will_change(&show(), &mut screen.host), None);
    }

    #[test]
    fn malformed_payload_is_ignored() {
        let mut screen = Screen::new();
        let mut coord = KeyboardCoordinator::<ViewId>::default();
        coord.editing_began(screen.field, &mut screen.host);
        let payload = KeyboardPayload {
            duration: None,
            ..KeyboardPayload::from(show())
        };
        coord.handle(&HostEvent::KeyboardWillChangeFrame(payload), &mut screen.host);
        assert!(screen.host.animations.is_empty());
    }

    #[test]
    fn editing_began_without_view_is_ignored() {
        let mut screen = Screen::new();
        let mut coord = KeyboardCoordinator::<ViewId>::default();
        coord.editing_began(screen.field, &mut screen.host);
        coord.handle(&HostEvent::EditingBegan(None), &mut screen.host);
        assert_eq!(coord.focused_view(), Some(screen.field));
        assert_eq!(screen.host.gestures.len(), 1);
    }

    #[test]
    fn editing_ended_detaches_and_clears() {
        let mut screen = Screen::new();
        let mut coord = KeyboardCoordinator::<ViewId>::default();
        coord.editing_began(screen.field, &mut screen.host);
        coord.handle(&HostEvent::EditingEnded, &mut screen.host);

        assert_eq!(coord.state(), CoordinatorState::Idle);
        assert_eq!(coord.focused_view(), None);
        assert!(screen.host.gestures.is_empty());
        assert!(screen.host.animations.is_empty(), "ending never animates");
    }

    #[test]
    fn taps_on_controls_and_bars_are_refused() {
        let mut screen = Screen::new();
        let mut coord = KeyboardCoordinator::<ViewId>::default();
        coord.editing_began(screen.field, &mut screen.host);

        assert!(!coord.should_receive_touch(Some(screen.button), &screen.host));
        assert!(!coord.tap(Some(screen.button), &mut screen.host));
        assert!(!coord.tap(Some(screen.nav_bar), &mut screen.host));
        assert!(screen.host.resigned.is_empty());
        assert_eq!(coord.state(), CoordinatorState::Editing);
    }

    #[test]
    fn tap_on_content_ends_editing_through_the_bus() {
        let mut screen = Screen::new();
        let mut bus = NotificationBus::new();
        let mut coord = KeyboardCoordinator::<ViewId>::default();
        coord.start(&mut bus);

        bus.post(&HostEvent::EditingBegan(Some(screen.field)), |id, e| {
            coord.deliver(id, e, &mut screen.host);
        });
        assert!(coord.should_receive_touch(Some(screen.content), &screen.host));
        assert!(coord.tap(Some(screen.content), &mut screen.host));
        assert_eq!(screen.host.resigned, [screen.field]);

        // The platform answers a successful resignation with an end notification.
        bus.post(&HostEvent::EditingEnded, |id, e| coord.deliver(id, e, &mut screen.host));
        assert_eq!(coord.state(), CoordinatorState::Idle);
        assert!(screen.host.gestures.is_empty());
    }

    #[test]
    fn refused_resignation_keeps_editing() {
        let mut screen = Screen::new();
        screen.host.refuse_resign = true;
        let mut coord = KeyboardCoordinator::<ViewId>::default();
        coord.editing_began(screen.field, &mut screen.host);
        assert!(!coord.tap(None, &mut screen.host));
        assert_eq!(coord.state(), CoordinatorState::Editing);
    }

    #[test]
    fn tap_while_idle_does_nothing() {
        let mut screen = Screen::new();
        let coord = KeyboardCoordinator::<ViewId>::default();
        assert!(!coord.tap(Some(screen.content), &mut screen.host));
        assert!(screen.host.resigned.is_empty());
    }

    #[test]
    fn rapid_refocus_keeps_latest_view_and_one_gesture() {
        let mut screen = Screen::new();
        let mut coord = KeyboardCoordinator::<ViewId>::default();
        coord.editing_began(screen.upper_field, &mut screen.host);
        coord.editing_began(screen.field, &mut screen.host);

        assert_eq!(coord.focused_view(), Some(screen.field));
        assert_eq!(screen.host.gestures, [(screen.window, DISMISS_GESTURE_ID)]);

        let adjustment = coord
            .keyboard_frame_will_change(&show(), &mut screen.host)
            .unwrap();
        assert_eq!(adjustment.offset, -258.0);
    }

    #[test]
    fn rapid_refocus_across_windows_moves_the_gesture() {
        let mut screen = Screen::new();
        let other_window = screen.host.arena.insert(
            None,
            LocalView::new(Rect::new(0.0, 0.0, 400.0, 800.0)).with_role(ViewRole::WINDOW),
        );
        let other_field = screen.host.arena.insert(
            Some(other_window),
            LocalView::new(Rect::new(0.0, 0.0, 100.0, 40.0)),
        );
        let mut coord = KeyboardCoordinator::<ViewId>::default();
        coord.editing_began(screen.field, &mut screen.host);
        coord.editing_began(other_field, &mut screen.host);
        assert_eq!(screen.host.gestures, [(other_window, DISMISS_GESTURE_ID)]);
    }

    #[test]
    fn late_end_after_refocus_clears_the_newer_view() {
        // End notifications carry no view, so a late "ended" for the previous input
        // also forgets the input that took focus in between.
        let mut screen = Screen::new();
        let mut coord = KeyboardCoordinator::<ViewId>::default();
        coord.editing_began(screen.upper_field, &mut screen.host);
        coord.editing_began(screen.field, &mut screen.host);
        coord.editing_ended(&mut screen.host);

        assert_eq!(coord.state(), CoordinatorState::Idle);
        assert_eq!(coord.keyboard_frame_will_change(&show(), &mut screen.host), None);
    }

    #[test]
    fn stop_while_editing_returns_to_idle() {
        let mut screen = Screen::new();
        let mut bus = NotificationBus::new();
        let mut coord = KeyboardCoordinator::<ViewId>::default();
        coord.start(&mut bus);
        coord.editing_began(screen.field, &mut screen.host);

        coord.stop(&mut bus, &mut screen.host);
        assert_eq!(coord.state(), CoordinatorState::Idle);
        assert!(screen.host.gestures.is_empty());

        let payload = KeyboardPayload::from(show());
        let delivered = bus.post(&HostEvent::KeyboardWillChangeFrame(payload), |id, e| {
            coord.deliver(id, e, &mut screen.host);
        });
        assert_eq!(delivered, 0);
        assert!(screen.host.animations.is_empty());
    }

    #[test]
    fn stopped_coordinator_ignores_shared_bus_traffic() {
        let mut screen = Screen::new();
        let mut bus = NotificationBus::new();
        let other = bus.subscribe(EventKind::EditingBegan);
        let mut coord = KeyboardCoordinator::<ViewId>::default();
        coord.start(&mut bus);
        coord.stop(&mut bus, &mut screen.host);

        let mut delivered_to = Vec::new();
        let delivered = bus.post(&HostEvent::EditingBegan(Some(screen.field)), |id, e| {
            delivered_to.push(id);
            coord.deliver(id, e, &mut screen.host);
        });
        assert_eq!(delivered, 1);
        assert_eq!(delivered_to, [other]);
        assert_eq!(coord.state(), CoordinatorState::Idle);
        assert!(screen.host.gestures.is_empty());
    }

    #[test]
    fn running_coordinator_skips_deliveries_for_other_subscribers() {
        let mut screen = Screen::new();
        let mut bus = NotificationBus::new();
        bus.subscribe(EventKind::KeyboardWillChangeFrame);
        let mut coord = KeyboardCoordinator::<ViewId>::default();
        coord.start(&mut bus);
        coord.editing_began(screen.field, &mut screen.host);

        let payload = KeyboardPayload::from(show());
        let delivered = bus.post(&HostEvent::KeyboardWillChangeFrame(payload), |id, e| {
            coord.deliver(id, e, &mut screen.host);
        });
        assert_eq!(delivered, 2);
        assert_eq!(screen.host.animations.len(), 1);
    }

    #[test]
    fn custom_gesture_exclusions() {
        let mut screen = Screen::new();
        let toolbar = screen.host.arena.insert(
            Some(screen.content),
            LocalView::new(Rect::new(0.0, 0.0, 400.0, 44.0))
                .with_capabilities(Capabilities::TOOLBAR),
        );
        let mut coord = KeyboardCoordinator::<ViewId>::default().with_gesture(
            DismissGesture::new(GestureId(9))
                .with_excluded(Capabilities::default() | Capabilities::TOOLBAR),
        );
        coord.editing_began(screen.field, &mut screen.host);
        assert_eq!(screen.host.gestures, [(screen.window, GestureId(9))]);
        assert!(!coord.tap(Some(toolbar), &mut screen.host));
    }
}
