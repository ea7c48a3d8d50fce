// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A minimal view hierarchy with generational handles.
//!
//! [`ViewArena`] implements [`ViewTree`] and [`ConstraintStore`] for hosts that mirror
//! their platform hierarchy into plain data, and for tests. Frames are stored relative
//! to the parent view; windows are views flagged with [`ViewRole::WINDOW`], and
//! controller root views are flagged with [`ViewRole::CONTROLLER_ROOT`].
//!
//! Handles are generational: removing a view invalidates its [`ViewId`] (and those of
//! its subtree), and a reused slot never revives an old handle. This is what lets the
//! coordinator hold a non-owning reference to the focused view and validate it before
//! use.
//!
//! ```
//! use kurbo::Rect;
//! use understory_keyboard_avoid::arena::{LocalView, ViewArena, ViewRole};
//! use understory_keyboard_avoid::host::ViewTree;
//!
//! let mut arena = ViewArena::new();
//! let screen = Rect::new(0.0, 0.0, 400.0, 800.0);
//! let window = arena.insert(None, LocalView::new(screen).with_role(ViewRole::WINDOW));
//! let root = arena.insert(
//!     Some(window),
//!     LocalView::new(screen).with_role(ViewRole::CONTROLLER_ROOT),
//! );
//! let form = arena.insert(Some(root), LocalView::new(Rect::new(0.0, 600.0, 400.0, 800.0)));
//! let field = arena.insert(Some(form), LocalView::new(Rect::new(20.0, 110.0, 380.0, 150.0)));
//!
//! assert_eq!(arena.window_of(field), Some(window));
//! assert_eq!(arena.root_view_of(field), Some(root));
//! assert_eq!(arena.frame_in_window(field, window), Some(Rect::new(20.0, 710.0, 380.0, 750.0)));
//!
//! arena.remove(form);
//! assert!(!arena.is_alive(field));
//! assert_eq!(arena.window_of(field), None);
//! ```

use alloc::vec::Vec;

use kurbo::{Point, Rect};

use crate::animation::{AnimationRequest, AnimationTarget};
use crate::constraint::{ConstraintId, LayoutConstraint};
use crate::dismiss::Capabilities;
use crate::host::{ConstraintStore, ViewTree};

/// Identifier for a view in the arena (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ViewId(u32, u32);

impl ViewId {
    const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Structural role of a view.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ViewRole: u8 {
        /// Top of a hierarchy; frames of descendants are converted into its space.
        const WINDOW          = 0b0000_0001;
        /// Root view of a controller; the container that gets offset.
        const CONTROLLER_ROOT = 0b0000_0010;
    }
}

/// Per-view data supplied by the host.
#[derive(Clone, Debug)]
pub struct LocalView {
    /// Frame in the parent's coordinate space (screen space for windows).
    pub frame: Rect,
    /// Structural role.
    pub role: ViewRole,
    /// Capability tags reported to hit testing.
    pub capabilities: Capabilities,
}

impl LocalView {
    /// A plain content view.
    pub fn new(frame: Rect) -> Self {
        Self {
            frame,
            role: ViewRole::empty(),
            capabilities: Capabilities::empty(),
        }
    }

    /// Set the structural role.
    pub fn with_role(mut self, role: ViewRole) -> Self {
        self.role = role;
        self
    }

    /// Set the capability tags.
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }
}

impl Default for LocalView {
    fn default() -> Self {
        Self::new(Rect::ZERO)
    }
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    parent: Option<ViewId>,
    children: Vec<ViewId>,
    local: LocalView,
    constraints: Vec<LayoutConstraint<ViewId>>,
}

/// Arena of views with parent links, roles, capabilities and installed constraints.
#[derive(Clone, Debug, Default)]
pub struct ViewArena {
    slots: Vec<Option<Slot>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    next_constraint: u32,
}

impl ViewArena {
    /// An empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a view as a child of `parent` (or as a root if `None`).
    ///
    /// A stale `parent` inserts the view as a root.
    pub fn insert(&mut self, parent: Option<ViewId>, local: LocalView) -> ViewId {
        let slot = |generation| Slot {
            generation,
            parent: None,
            children: Vec::new(),
            local,
            constraints: Vec::new(),
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.slots[idx] = Some(slot(generation));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.slots.push(Some(slot(generation)));
            self.generations.push(generation);
            (self.slots.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ViewId uses 32-bit indices by design."
        )]
        let id = ViewId(idx as u32, generation);
        if let Some(p) = parent.filter(|&p| self.is_alive(p)) {
            self.slot_mut(id).parent = Some(p);
            self.slot_mut(p).children.push(id);
        }
        id
    }

    /// Remove a view and its subtree. Stale ids are ignored.
    pub fn remove(&mut self, id: ViewId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.slot(id).parent {
            self.slot_mut(parent).children.retain(|&c| c != id);
        }
        let mut pending = Vec::from([id]);
        while let Some(view) = pending.pop() {
            pending.append(&mut self.slot_mut(view).children);
            self.slots[view.idx()] = None;
            self.free_list.push(view.idx());
        }
    }

    /// Returns true if `id` refers to a live view.
    pub fn is_alive(&self, id: ViewId) -> bool {
        self.slots
            .get(id.idx())
            .and_then(|s| s.as_ref())
            .is_some_and(|s| s.generation == id.1)
    }

    /// Parent of a live view, or `None` for roots and stale ids.
    pub fn parent_of(&self, id: ViewId) -> Option<ViewId> {
        self.get(id).and_then(|s| s.parent)
    }

    /// Parent-relative frame of a live view.
    pub fn frame(&self, id: ViewId) -> Option<Rect> {
        self.get(id).map(|s| s.local.frame)
    }

    /// Move a live view vertically so its frame starts at `y`, keeping its size.
    pub fn set_origin_y(&mut self, id: ViewId, y: f64) {
        if let Some(slot) = self.get_mut(id) {
            let frame = slot.local.frame;
            slot.local.frame = frame.with_origin(Point::new(frame.x0, y));
        }
    }

    /// Install a constraint on `view` and return its handle.
    ///
    /// The `id` field of `constraint` is overwritten with a freshly allocated handle.
    /// Returns `None` if `view` is stale.
    pub fn add_constraint(
        &mut self,
        view: ViewId,
        mut constraint: LayoutConstraint<ViewId>,
    ) -> Option<ConstraintId> {
        if !self.is_alive(view) {
            return None;
        }
        self.next_constraint += 1;
        let id = ConstraintId(self.next_constraint);
        constraint.id = id;
        self.slot_mut(view).constraints.push(constraint);
        Some(id)
    }

    /// Look up an installed constraint by handle.
    pub fn constraint(&self, id: ConstraintId) -> Option<&LayoutConstraint<ViewId>> {
        self.slots
            .iter()
            .flatten()
            .flat_map(|s| s.constraints.iter())
            .find(|c| c.id == id)
    }

    /// Write the constant of an installed constraint. Returns `false` if it is gone.
    pub fn set_constraint_constant(&mut self, id: ConstraintId, constant: f64) -> bool {
        let found = self
            .slots
            .iter_mut()
            .flatten()
            .flat_map(|s| s.constraints.iter_mut())
            .find(|c| c.id == id);
        match found {
            Some(c) => {
                c.constant = constant;
                true
            }
            None => false,
        }
    }

    /// Settle `request` to its final value immediately.
    ///
    /// Useful for hosts whose animator has nothing to interpolate, and for tests.
    /// A constraint that pins the container's top to its superview (or to nothing)
    /// also moves the container, standing in for the layout pass.
    /// Returns `false` if the target no longer exists.
    pub fn apply(&mut self, request: &AnimationRequest<ViewId>) -> bool {
        match request.target {
            AnimationTarget::ConstraintConstant {
                container,
                constraint,
                constant,
            } => {
                let pins_top = self.constraint(constraint).is_some_and(|c| {
                    c.first_item == container
                        && c.second_item.is_none_or(|s| self.parent_of(container) == Some(s))
                });
                if !self.set_constraint_constant(constraint, constant) {
                    return false;
                }
                if pins_top {
                    self.set_origin_y(container, constant);
                }
                true
            }
            AnimationTarget::FrameOriginY { view, y } => {
                let alive = self.is_alive(view);
                self.set_origin_y(view, y);
                alive
            }
        }
    }

    fn ancestors_or_self(&self, id: ViewId) -> impl Iterator<Item = ViewId> + '_ {
        core::iter::successors(self.is_alive(id).then_some(id), |&v| self.parent_of(v))
    }

    fn role(&self, id: ViewId) -> ViewRole {
        self.get(id).map(|s| s.local.role).unwrap_or_default()
    }

    fn get(&self, id: ViewId) -> Option<&Slot> {
        self.slots
            .get(id.idx())
            .and_then(|s| s.as_ref())
            .filter(|s| s.generation == id.1)
    }

    fn get_mut(&mut self, id: ViewId) -> Option<&mut Slot> {
        self.slots
            .get_mut(id.idx())
            .and_then(|s| s.as_mut())
            .filter(|s| s.generation == id.1)
    }

    /// Access a slot; panics if `id` is stale.
    fn slot(&self, id: ViewId) -> &Slot {
        self.slots[id.idx()].as_ref().expect("dangling ViewId")
    }

    /// Access a slot mutably; panics if `id` is stale.
    fn slot_mut(&mut self, id: ViewId) -> &mut Slot {
        self.slots[id.idx()].as_mut().expect("dangling ViewId")
    }
}

impl ViewTree<ViewId> for ViewArena {
    fn window_of(&self, view: ViewId) -> Option<ViewId> {
        self.ancestors_or_self(view)
            .find(|&v| self.role(v).contains(ViewRole::WINDOW))
    }

    fn window_bounds(&self, window: ViewId) -> Option<Rect> {
        let slot = self.get(window)?;
        slot.local
            .role
            .contains(ViewRole::WINDOW)
            .then(|| Rect::from_origin_size(Point::ZERO, slot.local.frame.size()))
    }

    fn frame_in_window(&self, view: ViewId, window: ViewId) -> Option<Rect> {
        if self.window_of(view)? != window {
            return None;
        }
        if view == window {
            return self.window_bounds(window);
        }
        let mut frame = self.frame(view)?;
        let mut current = self.parent_of(view);
        loop {
            let ancestor = current?;
            if ancestor == window {
                return Some(frame);
            }
            frame = frame + self.frame(ancestor)?.origin().to_vec2();
            current = self.parent_of(ancestor);
        }
    }

    fn root_view_of(&self, view: ViewId) -> Option<ViewId> {
        self.ancestors_or_self(view)
            .find(|&v| self.role(v).contains(ViewRole::CONTROLLER_ROOT))
    }

    fn capabilities(&self, view: ViewId) -> Capabilities {
        self.get(view)
            .map(|s| s.local.capabilities)
            .unwrap_or_else(Capabilities::empty)
    }
}

impl ConstraintStore<ViewId> for ViewArena {
    fn constraints(&self, view: ViewId) -> &[LayoutConstraint<ViewId>] {
        match self.get(view) {
            Some(slot) => &slot.constraints,
            None => &[],
        }
    }
}
