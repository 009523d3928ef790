// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Derived geometry.
//!
//! Position is derived, never stored. An element's extended (margin-inclusive)
//! rectangle comes from its arrange result when a panel positioned it, or
//! from box-model flow over its preceding siblings otherwise; the border and
//! content rectangles are pure functions of that rectangle plus the element's
//! margin and padding.
//!
//! [`GeometryCx`] bundles the read-only borrows resolution needs (tree,
//! registry, kind table, standard properties) so call sites don't thread four
//! parameters everywhere.

use kurbo::{Point, Rect, Size};

use trellis_property::{
    KindTable, Property, PropertyRegistry, PropertyValue, StoreRef, resolve_value,
};

use crate::arena::{ElementId, ElementTree};
use crate::box_mode::BoxMode;
use crate::props::StandardProperties;
use crate::thickness::Thickness;

/// Read-only context for deriving element geometry.
#[derive(Copy, Clone, Debug)]
pub struct GeometryCx<'a> {
    /// The element arena.
    pub tree: &'a ElementTree,
    /// The property registry.
    pub registry: &'a PropertyRegistry,
    /// The kind table.
    pub kinds: &'a KindTable,
    /// The standard property handles.
    pub props: &'a StandardProperties,
}

impl<'a> GeometryCx<'a> {
    /// Creates a geometry context over the given borrows.
    #[must_use]
    pub fn new(
        tree: &'a ElementTree,
        registry: &'a PropertyRegistry,
        kinds: &'a KindTable,
        props: &'a StandardProperties,
    ) -> Self {
        Self {
            tree,
            registry,
            kinds,
            props,
        }
    }

    /// Resolves an element's effective value for a property.
    ///
    /// # Panics
    ///
    /// Panics if the element is dead or the property is unregistered.
    #[must_use]
    pub fn value<T: PropertyValue>(&self, id: ElementId, property: Property<T>) -> T {
        let lookup = |key: ElementId| {
            let store = self.tree.store(key)?;
            Some(StoreRef {
                store,
                parent: self.tree.parent(key),
                kind: self.tree.kind(key)?,
            })
        };
        resolve_value(id, property, self.registry, self.kinds, &lookup)
    }

    /// The element's margin.
    #[must_use]
    pub fn margin(&self, id: ElementId) -> Thickness {
        self.value(id, self.props.margin)
    }

    /// The element's padding.
    #[must_use]
    pub fn padding(&self, id: ElementId) -> Thickness {
        self.value(id, self.props.padding)
    }

    /// The element's box mode with `Inherit` resolved away.
    ///
    /// Walks ancestors while the mode is `Inherit`; a root without an
    /// explicit mode is `Block`.
    #[must_use]
    pub fn resolved_box_mode(&self, id: ElementId) -> BoxMode {
        let mut current = Some(id);
        while let Some(element) = current {
            match self.value(element, self.props.box_mode) {
                BoxMode::Inherit => current = self.tree.parent(element),
                mode => return mode,
            }
        }
        BoxMode::Block
    }

    /// The size of the element's extended (margin-inclusive) box.
    ///
    /// The arrange result wins when present; otherwise the desired size from
    /// the last measure.
    #[must_use]
    pub fn extended_size(&self, id: ElementId) -> Size {
        self.tree
            .arrange_rect(id)
            .map_or_else(|| self.tree.desired_size(id), |rect| rect.size())
    }

    /// The size of the element's content box.
    #[must_use]
    pub fn content_size(&self, id: ElementId) -> Size {
        let inner = self.margin(id).deflate_size(self.extended_size(id));
        self.padding(id).deflate_size(inner)
    }

    /// The extended rectangle in parent-content coordinates.
    #[must_use]
    pub fn local_extended_rect(&self, id: ElementId) -> Rect {
        match self.tree.arrange_rect(id) {
            Some(rect) => rect,
            None => Rect::from_origin_size(self.flow_offset(id), self.tree.desired_size(id)),
        }
    }

    /// The extended (margin-inclusive) rectangle in absolute coordinates.
    #[must_use]
    pub fn extended_rect(&self, id: ElementId) -> Rect {
        let local = self.local_extended_rect(id);
        match self.tree.parent(id) {
            None => local,
            Some(parent) => local + self.content_rect(parent).origin().to_vec2(),
        }
    }

    /// The border rectangle (inside margin) in absolute coordinates.
    #[must_use]
    pub fn border_rect(&self, id: ElementId) -> Rect {
        self.margin(id).deflate_rect(self.extended_rect(id))
    }

    /// The content rectangle (inside margin and padding) in absolute
    /// coordinates.
    #[must_use]
    pub fn content_rect(&self, id: ElementId) -> Rect {
        self.padding(id).deflate_rect(self.border_rect(id))
    }

    /// The element's flow position within its parent's content box.
    ///
    /// Walks preceding siblings applying the box-model rules: Block siblings
    /// claim a full line, Inline siblings advance and wrap against the
    /// parent's content width, Overlap siblings anchor at the origin without
    /// advancing the cursor. Detached roots flow at the origin.
    #[must_use]
    pub fn flow_offset(&self, id: ElementId) -> Point {
        let Some(parent) = self.tree.parent(id) else {
            return Point::ZERO;
        };
        let content_width = self.content_size(parent).width;

        let mut x = 0.0_f64;
        let mut y = 0.0_f64;
        let mut line_height = 0.0_f64;
        for &sibling in self.tree.children(parent) {
            let mode = self.resolved_box_mode(sibling);
            let size = self.extended_size(sibling);
            match mode {
                BoxMode::Overlap => {
                    if sibling == id {
                        return Point::ZERO;
                    }
                }
                BoxMode::Inline => {
                    // Wrap before this sibling if it would overrun the line.
                    if x > 0.0 && x + size.width > content_width {
                        y += line_height;
                        x = 0.0;
                        line_height = 0.0;
                    }
                    if sibling == id {
                        return Point::new(x, y);
                    }
                    x += size.width;
                    line_height = line_height.max(size.height);
                }
                BoxMode::Block | BoxMode::Inherit => {
                    // A block finishes any open inline line first.
                    if x > 0.0 {
                        y += line_height;
                        x = 0.0;
                        line_height = 0.0;
                    }
                    if sibling == id {
                        return Point::new(0.0, y);
                    }
                    y += size.height;
                }
            }
        }
        Point::ZERO
    }
}
