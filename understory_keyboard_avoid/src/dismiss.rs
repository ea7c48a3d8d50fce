// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tap-to-dismiss recognizer policy.
//!
//! A [`DismissGesture`] describes a tap recognizer that lives on the focused view's
//! window while editing is active. It never swallows touches, always recognizes
//! alongside other recognizers, and refuses touches that land on views carrying an
//! excluded [`Capabilities`] tag, so buttons and bars keep working while the keyboard
//! is up.
//!
//! ```
//! use understory_keyboard_avoid::dismiss::{Capabilities, DismissGesture, GestureId};
//!
//! let gesture: DismissGesture<u32> = DismissGesture::new(GestureId(1));
//! assert!(!gesture.should_receive(Some(Capabilities::INTERACTIVE_CONTROL)));
//! assert!(!gesture.should_receive(Some(Capabilities::NAVIGATION_BAR)));
//! assert!(gesture.should_receive(Some(Capabilities::empty())));
//!
//! let toolbar_aware = gesture.with_excluded(Capabilities::default() | Capabilities::TOOLBAR);
//! assert!(!toolbar_aware.should_receive(Some(Capabilities::TOOLBAR)));
//! ```

use crate::host::GestureSurface;

bitflags::bitflags! {
    /// Capability tags reported by a hit-tested view.
    ///
    /// [`Capabilities::default`] is the default exclusion set of a [`DismissGesture`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        /// Buttons, switches, sliders, text inputs: anything that handles its own taps.
        const INTERACTIVE_CONTROL = 0b0000_0001;
        /// Navigation bars and similar window chrome.
        const NAVIGATION_BAR      = 0b0000_0010;
        /// Toolbars and tab bars.
        const TOOLBAR             = 0b0000_0100;
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::INTERACTIVE_CONTROL | Self::NAVIGATION_BAR
    }
}

/// Identity of a recognizer on the host side.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GestureId(pub u64);

/// A tap recognizer that requests focus resignation.
#[derive(Clone, Debug)]
pub struct DismissGesture<K> {
    id: GestureId,
    excluded: Capabilities,
    attached_to: Option<K>,
}

impl<K: Copy + PartialEq> DismissGesture<K> {
    /// A detached recognizer with the default exclusion set.
    pub fn new(id: GestureId) -> Self {
        Self {
            id,
            excluded: Capabilities::default(),
            attached_to: None,
        }
    }

    /// Replace the exclusion set.
    pub fn with_excluded(mut self, excluded: Capabilities) -> Self {
        self.excluded = excluded;
        self
    }

    /// Host-side identity.
    pub fn id(&self) -> GestureId {
        self.id
    }

    /// Tags whose views never trigger a dismissal.
    pub fn excluded(&self) -> Capabilities {
        self.excluded
    }

    /// Always `false`: touches keep flowing to the views underneath.
    pub fn cancels_touches_in_view(&self) -> bool {
        false
    }

    /// Always `true`: the recognizer never blocks other recognizers.
    pub fn recognizes_simultaneously(&self) -> bool {
        true
    }

    /// Whether a touch on a view with `target` capabilities should be recognized.
    ///
    /// `None` means the touch hit no view; it is accepted.
    pub fn should_receive(&self, target: Option<Capabilities>) -> bool {
        target.is_none_or(|caps| !caps.intersects(self.excluded))
    }

    /// Surface the recognizer is currently installed on.
    pub fn attached_to(&self) -> Option<K> {
        self.attached_to
    }

    /// Install the recognizer on `surface`.
    ///
    /// Re-attaching to the current surface does nothing; attaching elsewhere detaches
    /// from the previous surface first, so at most one installation exists.
    pub fn attach(&mut self, host: &mut (impl GestureSurface<K> + ?Sized), surface: K) {
        if self.attached_to == Some(surface) {
            return;
        }
        self.detach(host);
        host.attach_gesture(surface, self.id);
        self.attached_to = Some(surface);
    }

    /// Remove the recognizer from its surface, returning that surface.
    pub fn detach(&mut self, host: &mut (impl GestureSurface<K> + ?Sized)) -> Option<K> {
        let surface = self.attached_to.take()?;
        host.detach_gesture(surface, self.id);
        Some(surface)
    }
}
