// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element behaviors: the measure/arrange strategy seam.
//!
//! Every element kind resolves to one [`ElementBehavior`]. The behavior
//! supplies the `measure`/`arrange` overrides of the two-pass contract and
//! the structural child bound; panels are nothing more than behaviors with an
//! arrangement strategy over their children.
//!
//! Behaviors are registered per kind in a [`BehaviorTable`] and resolved
//! along the kind's base chain, so a subkind inherits its base's behavior
//! unless it registers its own. Unregistered kinds fall back to the table's
//! default (the flow behavior, for ordinary containers and leaves).

use alloc::rc::Rc;

use kurbo::Size;
use trellis_property::{
    KindId, KindTable, Property, PropertyId, PropertyRegistry, PropertyValue,
};
use trellis_tree::{ElementId, ElementTree, GeometryCx, StandardProperties};

use crate::cascade::CascadeQueue;
use crate::engine::LayoutCx;

use hashbrown::HashMap;

/// A per-kind layout strategy.
///
/// `measure` and `arrange` receive content-box sizes: the engine has already
/// peeled the element's margin and padding off the constraint and re-applies
/// them to the result, so strategies deal purely in content space.
///
/// A parent's overrides hand constraints down by calling
/// [`LayoutCx::measure_child`] / [`LayoutCx::arrange_child`] on each child;
/// the global scheduler still owns top-level ordering and deduplication.
pub trait ElementBehavior {
    /// The maximum number of children an element of this kind may own.
    ///
    /// `None` is unbounded (panels); decorator-style wrappers return
    /// `Some(1)`.
    fn max_children(&self) -> Option<usize> {
        None
    }

    /// Measures the element's content given an available content size.
    ///
    /// Returns the desired content size. Must not exceed its budget by
    /// assumption; the engine clamps the result into the element's min/max
    /// bounds afterwards.
    fn measure(&self, cx: &mut LayoutCx<'_>, id: ElementId, available: Size) -> Size;

    /// Arranges the element's children within a final content size.
    ///
    /// Returns the size actually used.
    fn arrange(&self, cx: &mut LayoutCx<'_>, id: ElementId, final_size: Size) -> Size;

    /// Hook invoked after a property change on an element of this kind.
    ///
    /// Runs after the metadata changed-callback, before invalidation routing.
    /// Follow-up writes go through `cx.cascade`; reentering the set-value
    /// pipeline from here is not possible by construction.
    fn property_changed(&self, cx: &mut ChangeCx<'_>, id: ElementId, property: PropertyId) {
        let _ = (cx, id, property);
    }
}

/// Read-only context handed to [`ElementBehavior::property_changed`].
pub struct ChangeCx<'a> {
    /// The element arena.
    pub tree: &'a ElementTree,
    /// The property registry.
    pub registry: &'a PropertyRegistry,
    /// The kind table.
    pub kinds: &'a KindTable,
    /// The standard property handles.
    pub props: &'a StandardProperties,
    /// Queue for follow-up writes.
    pub cascade: &'a mut CascadeQueue,
}

impl ChangeCx<'_> {
    /// Resolves an element's effective value for a property.
    ///
    /// # Panics
    ///
    /// Panics if the element is dead or the property is unregistered.
    #[must_use]
    pub fn value<T: PropertyValue>(&self, id: ElementId, property: Property<T>) -> T {
        GeometryCx::new(self.tree, self.registry, self.kinds, self.props).value(id, property)
    }
}

impl core::fmt::Debug for ChangeCx<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ChangeCx")
            .field("cascade", &self.cascade)
            .finish_non_exhaustive()
    }
}

/// Per-kind behavior registrations with base-chain resolution.
pub struct BehaviorTable {
    entries: HashMap<KindId, Rc<dyn ElementBehavior>>,
    default: Rc<dyn ElementBehavior>,
}

impl BehaviorTable {
    /// Creates a table with the given fallback behavior.
    #[must_use]
    pub fn new(default: Rc<dyn ElementBehavior>) -> Self {
        Self {
            entries: HashMap::new(),
            default,
        }
    }

    /// Registers the behavior for a kind.
    ///
    /// # Panics
    ///
    /// Panics if the kind already has a behavior.
    pub fn register(&mut self, kind: KindId, behavior: Rc<dyn ElementBehavior>) {
        let prior = self.entries.insert(kind, behavior);
        assert!(prior.is_none(), "kind {kind:?} already has a behavior");
    }

    /// Resolves the behavior for a kind along its base chain.
    ///
    /// Falls back to the table's default when no kind in the chain has a
    /// registration.
    #[must_use]
    pub fn resolve(&self, kind: KindId, kinds: &KindTable) -> Rc<dyn ElementBehavior> {
        kinds
            .self_and_ancestors(kind)
            .find_map(|k| self.entries.get(&k))
            .unwrap_or(&self.default)
            .clone()
    }

    /// The structural child bound for a kind.
    #[must_use]
    pub fn max_children(&self, kind: KindId, kinds: &KindTable) -> Option<usize> {
        self.resolve(kind, kinds).max_children()
    }
}

impl core::fmt::Debug for BehaviorTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BehaviorTable")
            .field("count", &self.entries.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Size, Option<usize>);

    impl ElementBehavior for Fixed {
        fn max_children(&self) -> Option<usize> {
            self.1
        }

        fn measure(&self, _cx: &mut LayoutCx<'_>, _id: ElementId, _available: Size) -> Size {
            self.0
        }

        fn arrange(&self, _cx: &mut LayoutCx<'_>, _id: ElementId, final_size: Size) -> Size {
            final_size
        }
    }

    #[test]
    fn resolves_along_base_chain() {
        let mut kinds = KindTable::new();
        let element = kinds.register("Element", None);
        let panel = kinds.register("Panel", Some(element));
        let stack = kinds.register("StackPanel", Some(panel));
        let other = kinds.register("Other", Some(element));

        let mut table = BehaviorTable::new(Rc::new(Fixed(Size::ZERO, Some(7))));
        table.register(panel, Rc::new(Fixed(Size::new(1.0, 1.0), None)));

        // Subkind inherits the panel behavior.
        assert_eq!(table.max_children(stack, &kinds), None);
        assert_eq!(table.max_children(panel, &kinds), None);
        // Unrelated kinds use the default.
        assert_eq!(table.max_children(other, &kinds), Some(7));
        assert_eq!(table.max_children(element, &kinds), Some(7));
    }

    #[test]
    #[should_panic(expected = "already has a behavior")]
    fn duplicate_registration_panics() {
        let mut kinds = KindTable::new();
        let element = kinds.register("Element", None);
        let mut table = BehaviorTable::new(Rc::new(Fixed(Size::ZERO, None)));
        table.register(element, Rc::new(Fixed(Size::ZERO, None)));
        table.register(element, Rc::new(Fixed(Size::ZERO, None)));
    }
}
