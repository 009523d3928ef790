// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The UI root.
//!
//! [`Ui`] owns every moving part of a running interface: the kind table,
//! property registry, standard properties, behavior table, element arena,
//! layout scheduler, and the text oracle. Nothing is global; two `Ui`s never
//! share state.
//!
//! [`Ui::set_value`] is the blessed write path: validate → coerce → compare
//! against the prior effective value → commit → metadata changed-callback →
//! behavior hook → invalidation routing, then a bounded drain of any cascaded
//! writes. [`Ui::update_layout`] runs the frame's two-pass layout
//! synchronously.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::fmt;

use kurbo::{Point, Rect, Size};
use trellis_property::{
    Affects, ErasedValue, KindId, KindTable, Property, PropertyId, PropertyRegistry,
    PropertyValue, StoreRef, resolve_value_erased,
};
use trellis_tree::{ElementId, ElementTree, GeometryCx, StandardProperties, TreeError};

use crate::behavior::{BehaviorTable, ChangeCx, ElementBehavior};
use crate::cascade::{CascadeQueue, MAX_CASCADE_ROUNDS};
use crate::engine::{LayoutCx, arrange_element, measure_element};
use crate::flow::FlowBehavior;
use crate::scheduler::LayoutScheduler;
use crate::text::{NullTextMeasurer, TextMeasurer};

/// Error returned by the set-value pipeline.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SetError {
    /// The target element is not alive.
    Dead,
    /// The value's type does not match the property's registration.
    TypeMismatch {
        /// The property that was written.
        property: PropertyId,
    },
    /// The value was rejected by the property's validator.
    ///
    /// Nothing was committed.
    Invalid {
        /// The property that was written.
        property: PropertyId,
    },
    /// Cascaded writes failed to settle within [`MAX_CASCADE_ROUNDS`].
    CascadeOverflow,
}

impl fmt::Display for SetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dead => write!(f, "element is not alive"),
            Self::TypeMismatch { property } => {
                write!(f, "value type does not match {property}")
            }
            Self::Invalid { property } => {
                write!(f, "value rejected by validation of {property}")
            }
            Self::CascadeOverflow => {
                write!(
                    f,
                    "property cascade failed to settle within {MAX_CASCADE_ROUNDS} rounds"
                )
            }
        }
    }
}

impl core::error::Error for SetError {}

/// The UI root: tree, properties, behaviors, scheduler, and text oracle.
///
/// # Example
///
/// ```rust
/// use kurbo::{Rect, Size};
/// use trellis_layout::Ui;
///
/// let mut ui = Ui::headless();
/// let root = ui.create(ui.props().element);
/// let child = ui.create(ui.props().element);
/// ui.add_child(root, child).unwrap();
///
/// let height = ui.props().height;
/// ui.set_value(child, height, Some(25.0)).unwrap();
///
/// ui.arrange_root(root, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
/// ui.update_layout();
///
/// assert_eq!(ui.tree().desired_size(child), Size::new(0.0, 25.0));
/// ```
pub struct Ui {
    kinds: KindTable,
    registry: PropertyRegistry,
    props: StandardProperties,
    behaviors: BehaviorTable,
    tree: ElementTree,
    scheduler: LayoutScheduler,
    text: Box<dyn TextMeasurer>,
}

impl fmt::Debug for Ui {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ui")
            .field("elements", &self.tree.len())
            .field("properties", &self.registry.len())
            .field("kinds", &self.kinds.len())
            .finish_non_exhaustive()
    }
}

impl Ui {
    /// Creates a UI with the given text oracle.
    ///
    /// Registers the `"Element"` kind, the standard properties, and the flow
    /// behavior as the default.
    #[must_use]
    pub fn new(text: Box<dyn TextMeasurer>) -> Self {
        let mut kinds = KindTable::new();
        let mut registry = PropertyRegistry::new();
        let props = StandardProperties::register(&mut kinds, &mut registry);
        Self {
            kinds,
            registry,
            props,
            behaviors: BehaviorTable::new(Rc::new(FlowBehavior)),
            tree: ElementTree::new(),
            scheduler: LayoutScheduler::new(),
            text,
        }
    }

    /// Creates a UI whose text oracle reports zero extents.
    #[must_use]
    pub fn headless() -> Self {
        Self::new(Box::new(NullTextMeasurer))
    }

    /// The kind table.
    #[must_use]
    pub fn kinds(&self) -> &KindTable {
        &self.kinds
    }

    /// The property registry.
    #[must_use]
    pub fn registry(&self) -> &PropertyRegistry {
        &self.registry
    }

    /// Mutable access to the property registry, for registration at startup.
    pub fn registry_mut(&mut self) -> &mut PropertyRegistry {
        &mut self.registry
    }

    /// The standard property handles.
    #[must_use]
    pub fn props(&self) -> &StandardProperties {
        &self.props
    }

    /// The element arena.
    #[must_use]
    pub fn tree(&self) -> &ElementTree {
        &self.tree
    }

    /// The layout scheduler (read-only; observers may watch its generation).
    #[must_use]
    pub fn scheduler(&self) -> &LayoutScheduler {
        &self.scheduler
    }

    /// A read-only geometry view over the current tree.
    #[must_use]
    pub fn geometry(&self) -> GeometryCx<'_> {
        GeometryCx::new(&self.tree, &self.registry, &self.kinds, &self.props)
    }

    /// Registers a new element kind.
    ///
    /// `base` defaults the kind under `"Element"` when `None`.
    ///
    /// # Panics
    ///
    /// Panics if the name is already registered.
    pub fn register_kind(&mut self, name: &'static str, base: Option<KindId>) -> KindId {
        self.kinds.register(name, base.or(Some(self.props.element)))
    }

    /// Registers the behavior for a kind.
    ///
    /// # Panics
    ///
    /// Panics if the kind already has a behavior.
    pub fn register_behavior(&mut self, kind: KindId, behavior: Rc<dyn ElementBehavior>) {
        self.behaviors.register(kind, behavior);
    }

    /// Creates a new detached element of the given kind.
    pub fn create(&mut self, kind: KindId) -> ElementId {
        self.tree.insert(kind)
    }

    /// Attaches `child` as the last child of `parent` and invalidates layout
    /// for both.
    ///
    /// # Errors
    ///
    /// Structural errors ([`TreeError`]) leave the tree and the queues
    /// unchanged, including [`TreeError::MaxChildren`] when the parent kind's
    /// behavior bounds its child count.
    pub fn add_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), TreeError> {
        if let Some(kind) = self.tree.kind(parent)
            && let Some(limit) = self.behaviors.max_children(kind, &self.kinds)
        {
            let already_owned = self.tree.parent(child) == Some(parent);
            if !already_owned && self.tree.children(parent).len() >= limit {
                return Err(TreeError::MaxChildren { limit });
            }
        }
        self.tree.add_child(parent, child)?;
        let fresh = Affects::MEASURE | Affects::ARRANGE;
        self.scheduler.invalidate(&mut self.tree, child, fresh);
        self.scheduler.invalidate(&mut self.tree, parent, fresh);
        Ok(())
    }

    /// Detaches `child` from `parent`, keeping the child subtree alive.
    ///
    /// The detached subtree leaves both layout queues; the parent is
    /// invalidated.
    ///
    /// # Errors
    ///
    /// See [`ElementTree::remove_child`].
    pub fn remove_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), TreeError> {
        self.tree.remove_child(parent, child)?;
        self.scheduler
            .invalidate(&mut self.tree, parent, Affects::MEASURE | Affects::ARRANGE);
        Ok(())
    }

    /// Removes an element and its subtree, freeing their slots.
    ///
    /// Freed elements leave both layout queues; no callback fires for them
    /// afterwards. The former parent is invalidated.
    ///
    /// # Errors
    ///
    /// See [`ElementTree::remove`].
    pub fn remove(&mut self, id: ElementId) -> Result<(), TreeError> {
        let parent = self.tree.parent(id);
        self.tree.remove(id)?;
        if let Some(parent) = parent {
            self.scheduler
                .invalidate(&mut self.tree, parent, Affects::MEASURE | Affects::ARRANGE);
        }
        Ok(())
    }

    /// Resolves an element's effective value: local → inherited → default.
    ///
    /// # Panics
    ///
    /// Panics if the element is dead or the property is unregistered.
    #[must_use]
    pub fn get_value<T: PropertyValue>(&self, id: ElementId, property: Property<T>) -> T {
        self.geometry().value(id, property)
    }

    /// Returns `true` if the element has a local value for the property.
    #[must_use]
    pub fn has_local(&self, id: ElementId, property: PropertyId) -> bool {
        self.tree.store(id).is_some_and(|store| store.has(property))
    }

    /// Sets a property value through the full pipeline.
    ///
    /// Writing the current effective value is a no-op: no callback fires and
    /// nothing is invalidated.
    ///
    /// # Errors
    ///
    /// See [`SetError`]; on error nothing was committed by this write (a
    /// cascade overflow commits the writes of the rounds that ran).
    pub fn set_value<T: PropertyValue>(
        &mut self,
        id: ElementId,
        property: Property<T>,
        value: T,
    ) -> Result<(), SetError> {
        self.set_value_erased(id, property.id(), ErasedValue::new(value))
    }

    /// Sets a property value from an erased value (binding layers).
    ///
    /// # Errors
    ///
    /// See [`set_value`](Self::set_value).
    pub fn set_value_erased(
        &mut self,
        id: ElementId,
        property: PropertyId,
        value: ErasedValue,
    ) -> Result<(), SetError> {
        let mut cascade = CascadeQueue::new();
        self.apply_write(id, property, value, &mut cascade)?;
        self.drain_cascade(cascade)
    }

    /// Clears an element's local value, restoring inheritance/default
    /// resolution.
    ///
    /// If the effective value changes as a result, callbacks and invalidation
    /// fire exactly as for a set.
    ///
    /// # Errors
    ///
    /// See [`SetError`].
    pub fn clear_value<T: PropertyValue>(
        &mut self,
        id: ElementId,
        property: Property<T>,
    ) -> Result<(), SetError> {
        self.clear_value_erased(id, property.id())
    }

    /// Clears an element's local value by property id.
    ///
    /// # Errors
    ///
    /// See [`SetError`].
    pub fn clear_value_erased(
        &mut self,
        id: ElementId,
        property: PropertyId,
    ) -> Result<(), SetError> {
        let mut cascade = CascadeQueue::new();
        self.apply_clear(id, property, &mut cascade)?;
        self.drain_cascade(cascade)
    }

    /// Seeds a root element with a viewport rectangle and queues a full pass.
    ///
    /// # Errors
    ///
    /// [`TreeError::Dead`] if the id is stale.
    pub fn arrange_root(&mut self, id: ElementId, viewport: Rect) -> Result<(), TreeError> {
        if !self.tree.is_alive(id) {
            return Err(TreeError::Dead);
        }
        self.tree.set_measure_constraint(id, viewport.size());
        self.tree.set_arrange_rect(id, viewport);
        self.scheduler
            .invalidate(&mut self.tree, id, Affects::MEASURE | Affects::ARRANGE);
        Ok(())
    }

    /// Runs the frame's layout: drains the measure queue, then the arrange
    /// queue, both in ascending tree-depth order.
    ///
    /// Each measured element resumes from its last known constraint (or the
    /// unbounded constraint on a first pass); each arranged element resumes
    /// from its last rectangle (or its desired size at the origin). A second
    /// call with no intervening invalidation does no work.
    pub fn update_layout(&mut self) {
        while let Some(id) = self.scheduler.pop_measure(&mut self.tree) {
            let constraint = self
                .tree
                .measure_constraint(id)
                .unwrap_or(Size::new(f64::INFINITY, f64::INFINITY));
            let before = self.tree.desired_size(id);
            let mut cx = LayoutCx {
                tree: &mut self.tree,
                registry: &self.registry,
                kinds: &self.kinds,
                props: &self.props,
                behaviors: &self.behaviors,
                text: self.text.as_mut(),
            };
            measure_element(&mut cx, id, constraint);
            if self.tree.desired_size(id) != before {
                // A new size moves this element and its siblings.
                self.scheduler.invalidate(
                    &mut self.tree,
                    id,
                    Affects::ARRANGE | Affects::PARENT_ARRANGE,
                );
            }
        }

        while let Some(id) = self.scheduler.pop_arrange(&mut self.tree) {
            let rect = self.tree.arrange_rect(id).unwrap_or_else(|| {
                Rect::from_origin_size(Point::ZERO, self.tree.desired_size(id))
            });
            let mut cx = LayoutCx {
                tree: &mut self.tree,
                registry: &self.registry,
                kinds: &self.kinds,
                props: &self.props,
                behaviors: &self.behaviors,
                text: self.text.as_mut(),
            };
            arrange_element(&mut cx, id, rect);
        }
    }

    /// Applies one write: validate → coerce → compare → commit → notify →
    /// invalidate. Cascaded writes land on `cascade`.
    fn apply_write(
        &mut self,
        id: ElementId,
        property: PropertyId,
        value: ErasedValue,
        cascade: &mut CascadeQueue,
    ) -> Result<(), SetError> {
        let kind = self.tree.kind(id).ok_or(SetError::Dead)?;
        let metadata = self.registry.erased_metadata_for(property, kind, &self.kinds);

        if metadata.value_type() != value.type_id() {
            return Err(SetError::TypeMismatch { property });
        }
        if !metadata.validate_erased(&value) {
            return Err(SetError::Invalid { property });
        }
        let coerced = metadata.coerce_erased(value);

        let prior = {
            let tree = &self.tree;
            let lookup = |key: ElementId| {
                let store = tree.store(key)?;
                Some(StoreRef {
                    store,
                    parent: tree.parent(key),
                    kind: tree.kind(key)?,
                })
            };
            resolve_value_erased(id, property, &self.registry, &self.kinds, &lookup)
        };
        if prior == coerced {
            return Ok(());
        }

        self.tree
            .store_mut(id)
            .ok_or(SetError::Dead)?
            .set_erased(property, coerced.clone());
        metadata.changed_erased(Some(&prior), &coerced);

        let behavior = self.behaviors.resolve(kind, &self.kinds);
        {
            let mut cx = ChangeCx {
                tree: &self.tree,
                registry: &self.registry,
                kinds: &self.kinds,
                props: &self.props,
                cascade,
            };
            behavior.property_changed(&mut cx, id, property);
        }

        self.scheduler
            .invalidate(&mut self.tree, id, metadata.affects());
        Ok(())
    }

    /// Clears one local value with the same notification/invalidation rules
    /// as a write.
    fn apply_clear(
        &mut self,
        id: ElementId,
        property: PropertyId,
        cascade: &mut CascadeQueue,
    ) -> Result<(), SetError> {
        let kind = self.tree.kind(id).ok_or(SetError::Dead)?;

        let prior = self.resolve_erased(id, property);
        let removed = self
            .tree
            .store_mut(id)
            .ok_or(SetError::Dead)?
            .clear(property);
        if !removed {
            return Ok(());
        }
        let restored = self.resolve_erased(id, property);
        if restored == prior {
            return Ok(());
        }

        let metadata = self.registry.erased_metadata_for(property, kind, &self.kinds);
        metadata.changed_erased(Some(&prior), &restored);

        let behavior = self.behaviors.resolve(kind, &self.kinds);
        {
            let mut cx = ChangeCx {
                tree: &self.tree,
                registry: &self.registry,
                kinds: &self.kinds,
                props: &self.props,
                cascade,
            };
            behavior.property_changed(&mut cx, id, property);
        }

        self.scheduler
            .invalidate(&mut self.tree, id, metadata.affects());
        Ok(())
    }

    fn resolve_erased(&self, id: ElementId, property: PropertyId) -> ErasedValue {
        let tree = &self.tree;
        let lookup = |key: ElementId| {
            let store = tree.store(key)?;
            Some(StoreRef {
                store,
                parent: tree.parent(key),
                kind: tree.kind(key)?,
            })
        };
        resolve_value_erased(id, property, &self.registry, &self.kinds, &lookup)
    }

    /// Drains cascaded writes, coalescing within the frame.
    ///
    /// Each round applies every write queued by the previous round. Writes
    /// targeting elements that died mid-cascade are dropped silently.
    fn drain_cascade(&mut self, mut cascade: CascadeQueue) -> Result<(), SetError> {
        let mut rounds = 0;
        while !cascade.is_empty() {
            rounds += 1;
            if rounds > MAX_CASCADE_ROUNDS {
                return Err(SetError::CascadeOverflow);
            }
            let mut next = CascadeQueue::new();
            for write in cascade.take() {
                match self.apply_write(write.target, write.property, write.value, &mut next) {
                    Ok(()) | Err(SetError::Dead) => {}
                    Err(err) => return Err(err),
                }
            }
            cascade = next;
        }
        Ok(())
    }
}
