// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Locating the container constraint that positions it vertically.
//!
//! Some platforms pin a controller's root view to its superview with an auto-generated
//! constraint. When that constraint is present, writing the frame origin directly is
//! undone by the next layout pass, so the offset must be written to the constraint's
//! constant instead. A [`ConstraintLocator`] decides which of the two paths applies.
//!
//! ```
//! use understory_keyboard_avoid::constraint::{
//!     ConstraintId, ConstraintLocator, IdentifierLocator, LayoutConstraint,
//!     ENCAPSULATED_LAYOUT_TOP,
//! };
//!
//! let constraints = [
//!     LayoutConstraint::new(ConstraintId(1), 7_u32, 0.0).with_second_item(3),
//!     LayoutConstraint::new(ConstraintId(2), 7_u32, 0.0).with_identifier(ENCAPSULATED_LAYOUT_TOP),
//! ];
//! let locator = IdentifierLocator::default();
//! assert_eq!(locator.locate(7, &constraints), Some(ConstraintId(2)));
//! assert_eq!(locator.locate(3, &constraints), None);
//! ```

use alloc::string::String;

/// Identifier the platform assigns to the constraint pinning a controller's root view
/// to the top of its superview.
pub const ENCAPSULATED_LAYOUT_TOP: &str = "UIView-Encapsulated-Layout-Top";

/// Handle of a layout constraint, as issued by the host's constraint store.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConstraintId(pub u32);

/// A snapshot of one active layout constraint.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConstraint<K> {
    /// Handle used to write the constant back.
    pub id: ConstraintId,
    /// The item the constraint positions (the owning item).
    pub first_item: K,
    /// The item it is related to, if any.
    pub second_item: Option<K>,
    /// Optional string tag.
    pub identifier: Option<String>,
    /// Current constant.
    pub constant: f64,
}

impl<K> LayoutConstraint<K> {
    /// Create an untagged constraint with no counterpart item.
    pub fn new(id: ConstraintId, first_item: K, constant: f64) -> Self {
        Self {
            id,
            first_item,
            second_item: None,
            identifier: None,
            constant,
        }
    }

    /// Set the counterpart item.
    pub fn with_second_item(mut self, item: K) -> Self {
        self.second_item = Some(item);
        self
    }

    /// Set the string tag.
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }
}

/// Strategy selecting the constraint (if any) whose constant carries the offset.
pub trait ConstraintLocator<K> {
    /// Search `constraints`, the constraints installed on `container`.
    fn locate(&self, container: K, constraints: &[LayoutConstraint<K>]) -> Option<ConstraintId>;
}

/// Finds the first constraint owned by the container that carries a given tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentifierLocator {
    /// Tag to match against [`LayoutConstraint::identifier`].
    pub identifier: String,
}

impl IdentifierLocator {
    /// Locator matching `identifier`.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }
}

impl Default for IdentifierLocator {
    fn default() -> Self {
        Self::new(ENCAPSULATED_LAYOUT_TOP)
    }
}

impl<K: PartialEq> ConstraintLocator<K> for IdentifierLocator {
    fn locate(&self, container: K, constraints: &[LayoutConstraint<K>]) -> Option<ConstraintId> {
        constraints
            .iter()
            .find(|c| {
                c.first_item == container && c.identifier.as_deref() == Some(&*self.identifier)
            })
            .map(|c| c.id)
    }
}

/// Never finds a constraint; offsets always go through the frame origin.
///
/// Use this on platforms that do not pin root views with constraints.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameOnlyLocator;

impl<K> ConstraintLocator<K> for FrameOnlyLocator {
    fn locate(&self, _container: K, _constraints: &[LayoutConstraint<K>]) -> Option<ConstraintId> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn ignores_tagged_constraint_owned_by_another_item() {
        let constraints = vec![
            LayoutConstraint::new(ConstraintId(1), 2_u32, 0.0)
                .with_second_item(1)
                .with_identifier(ENCAPSULATED_LAYOUT_TOP),
        ];
        assert_eq!(IdentifierLocator::default().locate(1, &constraints), None);
    }

    #[test]
    fn returns_first_match() {
        let constraints = vec![
            LayoutConstraint::new(ConstraintId(4), 1_u32, 0.0).with_identifier("other"),
            LayoutConstraint::new(ConstraintId(5), 1_u32, 0.0)
                .with_identifier(ENCAPSULATED_LAYOUT_TOP),
            LayoutConstraint::new(ConstraintId(6), 1_u32, 0.0)
                .with_identifier(ENCAPSULATED_LAYOUT_TOP),
        ];
        assert_eq!(
            IdentifierLocator::default().locate(1, &constraints),
            Some(ConstraintId(5))
        );
    }

    #[test]
    fn custom_identifier() {
        let constraints =
            vec![LayoutConstraint::new(ConstraintId(9), 1_u32, 0.0).with_identifier("sheet-top")];
        assert_eq!(
            IdentifierLocator::new("sheet-top").locate(1, &constraints),
            Some(ConstraintId(9))
        );
        assert_eq!(IdentifierLocator::default().locate(1, &constraints), None);
    }

    #[test]
    fn untagged_and_empty_sets_yield_none() {
        let constraints = vec![LayoutConstraint::new(ConstraintId(1), 1_u32, 0.0)];
        assert_eq!(IdentifierLocator::default().locate(1, &constraints), None);
        let empty: [LayoutConstraint<u32>; 0] = [];
        assert_eq!(IdentifierLocator::default().locate(1, &empty), None);
    }

    #[test]
    fn frame_only_never_matches() {
        let constraints = vec![
            LayoutConstraint::new(ConstraintId(1), 1_u32, 0.0)
                .with_identifier(ENCAPSULATED_LAYOUT_TOP),
        ];
        assert_eq!(FrameOnlyLocator.locate(1, &constraints), None);
    }
}
