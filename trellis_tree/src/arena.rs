// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The element arena.
//!
//! [`ElementTree`] owns every element in a UI as a slot table with
//! generational handles. The arena doubles as the flat membership index:
//! liveness checks are O(1) and iteration walks the live slots, so there is
//! no separate master list to keep in sync.
//!
//! Structure is strictly tree-shaped: one parent per element, an ordered
//! child list, and a maintained depth ("level") used by the layout scheduler
//! to drain dirty elements shallow-first.

use alloc::vec::Vec;
use core::fmt;

use kurbo::{Rect, Size};
use trellis_property::{KindId, PropertyStore};

/// Identifier for an element in the tree.
///
/// A small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused. It consists of a slot index
/// and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `ElementId` pointing at that
///   slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a
///   new, distinct `ElementId`.
///
/// Stale ids never alias a different live element because the generation
/// must match; use [`ElementTree::is_alive`] to check liveness.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct ElementId(u32, u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({}v{})", self.0, self.1)
    }
}

bitflags::bitflags! {
    /// Per-element layout dirty flags.
    ///
    /// A set flag means the element is waiting in the corresponding layout
    /// queue; clearing the flag is how an element leaves the queue (entries
    /// whose flag is gone are skipped at drain time).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct LayoutFlags: u8 {
        /// The element needs a measure pass.
        const MEASURE_DIRTY = 1 << 0;
        /// The element needs an arrange pass.
        const ARRANGE_DIRTY = 1 << 1;
    }
}

/// Error returned by structural tree operations.
///
/// Structural errors abort the operation and leave the tree unchanged.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TreeError {
    /// The element id is stale or was never allocated.
    Dead,
    /// Attaching would make an element its own ancestor.
    AncestryCycle,
    /// The element is not a child of the given parent.
    NotAChild,
    /// The parent cannot accept more children.
    MaxChildren {
        /// The parent's child capacity.
        limit: usize,
    },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dead => write!(f, "element is not alive"),
            Self::AncestryCycle => {
                write!(f, "attaching would make an element its own ancestor")
            }
            Self::NotAChild => write!(f, "element is not a child of the given parent"),
            Self::MaxChildren { limit } => {
                write!(f, "parent accepts at most {limit} children")
            }
        }
    }
}

impl core::error::Error for TreeError {}

#[derive(Debug)]
struct Node {
    kind: KindId,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    depth: u32,
    store: PropertyStore,
    desired_size: Size,
    measure_constraint: Option<Size>,
    arrange_rect: Option<Rect>,
    flags: LayoutFlags,
}

impl Node {
    fn new(kind: KindId) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            depth: 0,
            store: PropertyStore::new(),
            desired_size: Size::ZERO,
            measure_constraint: None,
            arrange_rect: None,
            flags: LayoutFlags::empty(),
        }
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

const NO_CHILDREN: &[ElementId] = &[];

/// The element arena: slots, structure, and per-element layout state.
///
/// # Example
///
/// ```rust
/// use trellis_property::KindTable;
/// use trellis_tree::ElementTree;
///
/// let mut kinds = KindTable::new();
/// let element = kinds.register("Element", None);
///
/// let mut tree = ElementTree::new();
/// let root = tree.insert(element);
/// let child = tree.insert(element);
/// tree.add_child(root, child).unwrap();
///
/// assert_eq!(tree.parent(child), Some(root));
/// assert_eq!(tree.depth(child), Some(1));
///
/// let freed = tree.remove(root).unwrap();
/// assert_eq!(freed.len(), 2);
/// assert!(!tree.is_alive(child));
/// ```
#[derive(Debug, Default)]
pub struct ElementTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
    revision: u64,
}

impl ElementTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of live elements.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns `true` if there are no live elements.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Returns the revision counter.
    ///
    /// The revision increments on every structural mutation (insert, attach,
    /// detach, remove) and can be used to detect staleness of derived data.
    #[must_use]
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns `true` if `id` refers to a live element.
    #[must_use]
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.node(id).is_some()
    }

    fn node(&self, id: ElementId) -> Option<&Node> {
        let slot = self.slots.get(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.node.as_ref()
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.node.as_mut()
    }

    /// Creates a new detached element of the given kind.
    pub fn insert(&mut self, kind: KindId) -> ElementId {
        self.revision = self.revision.wrapping_add(1);
        self.live += 1;
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.node = Some(Node::new(kind));
            ElementId::new(idx, slot.generation)
        } else {
            let idx = u32::try_from(self.slots.len()).expect("more than u32::MAX elements");
            self.slots.push(Slot {
                generation: 1,
                node: Some(Node::new(kind)),
            });
            ElementId::new(idx, 1)
        }
    }

    /// Returns the kind of an element.
    #[must_use]
    pub fn kind(&self, id: ElementId) -> Option<KindId> {
        self.node(id).map(|n| n.kind)
    }

    /// Returns the parent of an element (`None` when detached or dead).
    #[must_use]
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Returns the ordered children of an element (empty when dead).
    #[must_use]
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.node(id).map_or(NO_CHILDREN, |n| &n.children)
    }

    /// Returns the tree depth of an element (0 for detached roots).
    #[must_use]
    pub fn depth(&self, id: ElementId) -> Option<u32> {
        self.node(id).map(|n| n.depth)
    }

    /// Returns the property store of an element.
    #[must_use]
    pub fn store(&self, id: ElementId) -> Option<&PropertyStore> {
        self.node(id).map(|n| &n.store)
    }

    /// Returns the mutable property store of an element.
    ///
    /// Writing through the raw store bypasses validation, coercion, and
    /// invalidation; UIs should route writes through their set-value
    /// pipeline.
    #[must_use]
    pub fn store_mut(&mut self, id: ElementId) -> Option<&mut PropertyStore> {
        self.node_mut(id).map(|n| &mut n.store)
    }

    /// Attaches `child` as the last child of `parent`.
    ///
    /// A child already owned by another parent is implicitly detached first;
    /// no element ever has two parents. The child subtree's depths are
    /// updated and its stale layout results are cleared.
    ///
    /// # Errors
    ///
    /// - [`TreeError::Dead`] if either id is stale.
    /// - [`TreeError::AncestryCycle`] if `child` is `parent` or one of its
    ///   ancestors. The tree is left unchanged.
    pub fn add_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), TreeError> {
        if !self.is_alive(parent) || !self.is_alive(child) {
            return Err(TreeError::Dead);
        }
        // Walking up from `parent`: hitting `child` (or `parent == child`)
        // means the attach would close a cycle.
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(TreeError::AncestryCycle);
            }
            cursor = self.parent(id);
        }

        if let Some(old_parent) = self.parent(child) {
            self.detach(old_parent, child);
        }

        let parent_depth = self.depth(parent).unwrap_or(0);
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        self.update_depths(child, parent_depth + 1);
        self.revision = self.revision.wrapping_add(1);
        Ok(())
    }

    /// Detaches `child` from `parent`, keeping the child subtree alive.
    ///
    /// The child becomes a detached root (depth 0); its dirty flags and
    /// stale layout results are cleared, which also removes it from any
    /// layout queue.
    ///
    /// # Errors
    ///
    /// - [`TreeError::Dead`] if either id is stale.
    /// - [`TreeError::NotAChild`] if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), TreeError> {
        if !self.is_alive(parent) || !self.is_alive(child) {
            return Err(TreeError::Dead);
        }
        if self.parent(child) != Some(parent) {
            return Err(TreeError::NotAChild);
        }
        self.detach(parent, child);
        self.update_depths(child, 0);
        self.revision = self.revision.wrapping_add(1);
        Ok(())
    }

    /// Removes an element and its whole subtree, freeing their slots.
    ///
    /// Returns every freed id, depth-first, so callers can purge external
    /// bookkeeping (layout queues, caches).
    ///
    /// # Errors
    ///
    /// [`TreeError::Dead`] if the id is stale.
    pub fn remove(&mut self, id: ElementId) -> Result<Vec<ElementId>, TreeError> {
        if !self.is_alive(id) {
            return Err(TreeError::Dead);
        }
        if let Some(parent) = self.parent(id) {
            self.detach(parent, id);
        }

        let freed = self.subtree(id);
        for &element in &freed {
            if let Some(slot) = self.slots.get_mut(element.idx()) {
                slot.node = None;
            }
            self.free.push(element.0);
            self.live -= 1;
        }
        self.revision = self.revision.wrapping_add(1);
        Ok(freed)
    }

    /// Collects `id` and all its descendants, depth-first.
    #[must_use]
    pub fn subtree(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = alloc::vec![id];
        while let Some(current) = stack.pop() {
            if !self.is_alive(current) {
                continue;
            }
            out.push(current);
            stack.extend(self.children(current).iter().copied());
        }
        out
    }

    /// Iterates over all live elements in slot order.
    pub fn iter(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            slot.node.as_ref()?;
            #[expect(clippy::cast_possible_truncation, reason = "slot count fits u32")]
            Some(ElementId::new(idx as u32, slot.generation))
        })
    }

    /// Unlinks child from parent's child list and clears its layout state.
    fn detach(&mut self, parent: ElementId, child: ElementId) {
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|&c| c != child);
        }
        for id in self.subtree(child) {
            if let Some(node) = self.node_mut(id) {
                node.flags = LayoutFlags::empty();
                node.arrange_rect = None;
                node.measure_constraint = None;
            }
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = None;
        }
    }

    /// Rewrites depths across a subtree after re-attachment.
    fn update_depths(&mut self, root: ElementId, depth: u32) {
        let mut stack = alloc::vec![(root, depth)];
        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.node_mut(id) else {
                continue;
            };
            node.depth = depth;
            for &child in &node.children {
                stack.push((child, depth + 1));
            }
        }
    }

    // =========================================================================
    // Layout state
    // =========================================================================

    /// The size recorded by the last measure pass (zero before any).
    #[must_use]
    pub fn desired_size(&self, id: ElementId) -> Size {
        self.node(id).map_or(Size::ZERO, |n| n.desired_size)
    }

    /// Records the desired size of an element.
    pub fn set_desired_size(&mut self, id: ElementId, size: Size) {
        if let Some(node) = self.node_mut(id) {
            node.desired_size = size;
        }
    }

    /// The constraint the element was last measured with.
    #[must_use]
    pub fn measure_constraint(&self, id: ElementId) -> Option<Size> {
        self.node(id).and_then(|n| n.measure_constraint)
    }

    /// Records the constraint an element was measured with.
    pub fn set_measure_constraint(&mut self, id: ElementId, constraint: Size) {
        if let Some(node) = self.node_mut(id) {
            node.measure_constraint = Some(constraint);
        }
    }

    /// The rectangle the element was last arranged into, in parent-content
    /// coordinates.
    #[must_use]
    pub fn arrange_rect(&self, id: ElementId) -> Option<Rect> {
        self.node(id).and_then(|n| n.arrange_rect)
    }

    /// Records the rectangle an element was arranged into.
    pub fn set_arrange_rect(&mut self, id: ElementId, rect: Rect) {
        if let Some(node) = self.node_mut(id) {
            node.arrange_rect = Some(rect);
        }
    }

    /// The element's layout dirty flags (empty when dead).
    #[must_use]
    pub fn layout_flags(&self, id: ElementId) -> LayoutFlags {
        self.node(id).map_or(LayoutFlags::empty(), |n| n.flags)
    }

    /// Sets the given layout flags, returning `true` if any were newly set.
    pub fn insert_layout_flags(&mut self, id: ElementId, flags: LayoutFlags) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                let before = node.flags;
                node.flags |= flags;
                node.flags != before
            }
            None => false,
        }
    }

    /// Clears the given layout flags.
    pub fn remove_layout_flags(&mut self, id: ElementId, flags: LayoutFlags) {
        if let Some(node) = self.node_mut(id) {
            node.flags -= flags;
        }
    }
}
