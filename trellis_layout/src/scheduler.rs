// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout scheduler.
//!
//! Two depth-ordered queues, measure and arrange, drained once per frame.
//! The per-element [`LayoutFlags`] on the tree are the deduplication state:
//! an element is "in" a queue exactly while its flag is set. Marking an
//! already-dirty element is a no-op; popping clears the flag; detaching or
//! removing an element clears its flags, which lazily deletes any entry still
//! sitting in a heap. No callback ever fires for a removed element.
//!
//! [`Affects`] flags from property metadata route here: `MEASURE`/`ARRANGE`
//! mark the element itself, the `PARENT_*` variants mark its parent (a no-op
//! on detached roots). This routing is the sole bridge between the property
//! system and layout.

use trellis_property::Affects;
use trellis_tree::{ElementId, ElementTree, LayoutFlags};

use crate::queue::DepthQueue;

/// Routes invalidations into depth-ordered measure/arrange queues.
///
/// # Example
///
/// ```rust
/// use trellis_property::{Affects, KindTable};
/// use trellis_layout::LayoutScheduler;
/// use trellis_tree::ElementTree;
///
/// let mut kinds = KindTable::new();
/// let kind = kinds.register("Element", None);
/// let mut tree = ElementTree::new();
/// let root = tree.insert(kind);
/// let child = tree.insert(kind);
/// tree.add_child(root, child).unwrap();
///
/// let mut scheduler = LayoutScheduler::new();
/// scheduler.invalidate(&mut tree, child, Affects::MEASURE | Affects::PARENT_MEASURE);
///
/// // Both are queued; the shallower parent drains first.
/// assert_eq!(scheduler.pop_measure(&mut tree), Some(root));
/// assert_eq!(scheduler.pop_measure(&mut tree), Some(child));
/// assert_eq!(scheduler.pop_measure(&mut tree), None);
/// ```
#[derive(Debug, Default)]
pub struct LayoutScheduler {
    measure: DepthQueue,
    arrange: DepthQueue,
    generation: u64,
}

impl LayoutScheduler {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the generation counter.
    ///
    /// Incremented on every mark and successful pop; observers can use it to
    /// detect whether any layout work happened between two points.
    #[must_use]
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Routes a set of [`Affects`] flags for `id` into the queues.
    pub fn invalidate(&mut self, tree: &mut ElementTree, id: ElementId, affects: Affects) {
        if affects.contains(Affects::MEASURE) {
            self.invalidate_measure(tree, id);
        }
        if affects.contains(Affects::ARRANGE) {
            self.invalidate_arrange(tree, id);
        }
        if affects.intersects(Affects::PARENT_MEASURE | Affects::PARENT_ARRANGE)
            && let Some(parent) = tree.parent(id)
        {
            if affects.contains(Affects::PARENT_MEASURE) {
                self.invalidate_measure(tree, parent);
            }
            if affects.contains(Affects::PARENT_ARRANGE) {
                self.invalidate_arrange(tree, parent);
            }
        }
    }

    /// Marks an element measure-dirty and enqueues it.
    ///
    /// A no-op for dead elements and for elements already queued.
    pub fn invalidate_measure(&mut self, tree: &mut ElementTree, id: ElementId) {
        if tree.insert_layout_flags(id, LayoutFlags::MEASURE_DIRTY) {
            self.measure.push(id, tree.depth(id).unwrap_or(0));
            self.generation = self.generation.wrapping_add(1);
        }
    }

    /// Marks an element arrange-dirty and enqueues it.
    ///
    /// A no-op for dead elements and for elements already queued.
    pub fn invalidate_arrange(&mut self, tree: &mut ElementTree, id: ElementId) {
        if tree.insert_layout_flags(id, LayoutFlags::ARRANGE_DIRTY) {
            self.arrange.push(id, tree.depth(id).unwrap_or(0));
            self.generation = self.generation.wrapping_add(1);
        }
    }

    /// Pops the next measure-dirty element, shallowest first.
    ///
    /// Entries whose element died, was detached, or was already processed are
    /// skipped. The popped element's measure flag is cleared.
    pub fn pop_measure(&mut self, tree: &mut ElementTree) -> Option<ElementId> {
        Self::pop_from(&mut self.measure, tree, LayoutFlags::MEASURE_DIRTY, &mut self.generation)
    }

    /// Pops the next arrange-dirty element, shallowest first.
    pub fn pop_arrange(&mut self, tree: &mut ElementTree) -> Option<ElementId> {
        Self::pop_from(&mut self.arrange, tree, LayoutFlags::ARRANGE_DIRTY, &mut self.generation)
    }

    fn pop_from(
        queue: &mut DepthQueue,
        tree: &mut ElementTree,
        flag: LayoutFlags,
        generation: &mut u64,
    ) -> Option<ElementId> {
        while let Some(id) = queue.pop() {
            // Stale entry: dead, detached, or already drained.
            if !tree.layout_flags(id).contains(flag) {
                continue;
            }
            tree.remove_layout_flags(id, flag);
            *generation = generation.wrapping_add(1);
            return Some(id);
        }
        None
    }

    /// Returns `true` if any measure work is pending.
    ///
    /// May transiently report `true` while only stale entries remain; a drain
    /// settles it.
    #[must_use]
    pub fn has_pending_measure(&self) -> bool {
        !self.measure.is_empty()
    }

    /// Returns `true` if any arrange work is pending.
    #[must_use]
    pub fn has_pending_arrange(&self) -> bool {
        !self.arrange.is_empty()
    }

    /// Total queued entries across both queues, stale entries included.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.measure.len() + self.arrange.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_property::KindTable;

    fn fixture() -> (ElementTree, ElementId, ElementId, ElementId) {
        let mut kinds = KindTable::new();
        let kind = kinds.register("Element", None);
        let mut tree = ElementTree::new();
        let root = tree.insert(kind);
        let mid = tree.insert(kind);
        let leaf = tree.insert(kind);
        tree.add_child(root, mid).unwrap();
        tree.add_child(mid, leaf).unwrap();
        (tree, root, mid, leaf)
    }

    #[test]
    fn drains_by_ascending_depth() {
        let (mut tree, root, mid, leaf) = fixture();
        let mut scheduler = LayoutScheduler::new();

        scheduler.invalidate_measure(&mut tree, leaf);
        scheduler.invalidate_measure(&mut tree, root);
        scheduler.invalidate_measure(&mut tree, mid);

        assert_eq!(scheduler.pop_measure(&mut tree), Some(root));
        assert_eq!(scheduler.pop_measure(&mut tree), Some(mid));
        assert_eq!(scheduler.pop_measure(&mut tree), Some(leaf));
        assert_eq!(scheduler.pop_measure(&mut tree), None);
    }

    #[test]
    fn dedups_by_identity() {
        let (mut tree, root, _, _) = fixture();
        let mut scheduler = LayoutScheduler::new();

        scheduler.invalidate_measure(&mut tree, root);
        scheduler.invalidate_measure(&mut tree, root);
        scheduler.invalidate_measure(&mut tree, root);

        assert_eq!(scheduler.pop_measure(&mut tree), Some(root));
        assert_eq!(scheduler.pop_measure(&mut tree), None);
    }

    #[test]
    fn queues_are_independent() {
        let (mut tree, root, mid, _) = fixture();
        let mut scheduler = LayoutScheduler::new();

        scheduler.invalidate_measure(&mut tree, root);
        scheduler.invalidate_arrange(&mut tree, mid);

        assert_eq!(scheduler.pop_arrange(&mut tree), Some(mid));
        assert_eq!(scheduler.pop_arrange(&mut tree), None);
        assert_eq!(scheduler.pop_measure(&mut tree), Some(root));
    }

    #[test]
    fn parent_routing() {
        let (mut tree, root, mid, leaf) = fixture();
        let mut scheduler = LayoutScheduler::new();

        scheduler.invalidate(
            &mut tree,
            leaf,
            Affects::PARENT_MEASURE | Affects::PARENT_ARRANGE,
        );

        assert_eq!(scheduler.pop_measure(&mut tree), Some(mid));
        assert_eq!(scheduler.pop_arrange(&mut tree), Some(mid));
        assert_eq!(scheduler.pop_measure(&mut tree), None);

        // Parent flags on a detached root go nowhere.
        scheduler.invalidate(&mut tree, root, Affects::PARENT_MEASURE);
        assert_eq!(scheduler.pop_measure(&mut tree), None);
    }

    #[test]
    fn removed_elements_never_drain() {
        let (mut tree, _, mid, leaf) = fixture();
        let mut scheduler = LayoutScheduler::new();

        scheduler.invalidate_measure(&mut tree, leaf);
        scheduler.invalidate_arrange(&mut tree, leaf);
        tree.remove(mid).unwrap();

        assert_eq!(scheduler.pop_measure(&mut tree), None);
        assert_eq!(scheduler.pop_arrange(&mut tree), None);
    }

    #[test]
    fn detached_elements_never_drain() {
        let (mut tree, root, mid, leaf) = fixture();
        let mut scheduler = LayoutScheduler::new();

        scheduler.invalidate_measure(&mut tree, leaf);
        tree.remove_child(root, mid).unwrap();

        assert_eq!(scheduler.pop_measure(&mut tree), None);

        // Re-invalidating after detach queues again at the new depth.
        scheduler.invalidate_measure(&mut tree, leaf);
        assert_eq!(scheduler.pop_measure(&mut tree), Some(leaf));
    }

    #[test]
    fn requeue_during_drain() {
        let (mut tree, root, mid, _) = fixture();
        let mut scheduler = LayoutScheduler::new();

        scheduler.invalidate_measure(&mut tree, root);
        assert_eq!(scheduler.pop_measure(&mut tree), Some(root));

        // A drained element's work may requeue deeper descendants.
        scheduler.invalidate_measure(&mut tree, mid);
        assert_eq!(scheduler.pop_measure(&mut tree), Some(mid));
    }

    #[test]
    fn generation_tracks_activity() {
        let (mut tree, root, _, _) = fixture();
        let mut scheduler = LayoutScheduler::new();
        let start = scheduler.generation();

        scheduler.invalidate_measure(&mut tree, root);
        assert!(scheduler.generation() > start);

        let marked = scheduler.generation();
        let _ = scheduler.pop_measure(&mut tree);
        assert!(scheduler.generation() > marked);
    }
}
