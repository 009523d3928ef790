// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The measure/arrange contracts.
//!
//! [`measure_element`] and [`arrange_element`] implement the engine side of
//! the two-pass contract around the per-kind behavior overrides:
//!
//! - **Measure**: deflate the constraint by margin, pin it to an explicit
//!   Width/Height, clamp into [min, max], deflate by padding, run the
//!   behavior's `measure` in content space, then inflate and clamp back out
//!   and record the desired size and the constraint.
//! - **Arrange**: deflate the final rectangle by margin to the border box and
//!   by padding to the content size, run the behavior's `arrange`, and record
//!   the rectangle.
//!
//! Sizing bounds resolve min-over-max: when `min > max`, min wins.

use kurbo::{Rect, Size};
use trellis_property::{KindTable, Property, PropertyRegistry, PropertyValue};
use trellis_tree::{
    ElementId, ElementTree, GeometryCx, LayoutFlags, StandardProperties, Thickness,
};

use alloc::vec::Vec;

use crate::behavior::BehaviorTable;
use crate::text::TextMeasurer;

/// Mutable context threaded through a layout pass.
///
/// Behaviors use it to read properties, measure and arrange children, and
/// reach the text oracle.
pub struct LayoutCx<'a> {
    /// The element arena.
    pub tree: &'a mut ElementTree,
    /// The property registry.
    pub registry: &'a PropertyRegistry,
    /// The kind table.
    pub kinds: &'a KindTable,
    /// The standard property handles.
    pub props: &'a StandardProperties,
    /// The behavior table.
    pub behaviors: &'a BehaviorTable,
    /// The text measurement oracle.
    pub text: &'a mut dyn TextMeasurer,
}

impl core::fmt::Debug for LayoutCx<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LayoutCx").finish_non_exhaustive()
    }
}

impl LayoutCx<'_> {
    /// A read-only geometry view over the current tree.
    #[must_use]
    pub fn geometry(&self) -> GeometryCx<'_> {
        GeometryCx::new(self.tree, self.registry, self.kinds, self.props)
    }

    /// Resolves an element's effective value for a property.
    ///
    /// # Panics
    ///
    /// Panics if the element is dead or the property is unregistered.
    #[must_use]
    pub fn value<T: PropertyValue>(&self, id: ElementId, property: Property<T>) -> T {
        self.geometry().value(id, property)
    }

    /// The element's children, cloned out of the arena.
    #[must_use]
    pub fn children(&self, id: ElementId) -> Vec<ElementId> {
        self.tree.children(id).to_vec()
    }

    /// The desired size recorded by the element's last measure.
    #[must_use]
    pub fn desired_size(&self, id: ElementId) -> Size {
        self.tree.desired_size(id)
    }

    /// Measures a child with the given available size and returns its
    /// desired size.
    pub fn measure_child(&mut self, id: ElementId, available: Size) -> Size {
        measure_element(self, id, available);
        self.tree.desired_size(id)
    }

    /// Arranges a child into a rectangle in this element's content
    /// coordinates.
    pub fn arrange_child(&mut self, id: ElementId, rect: Rect) {
        arrange_element(self, id, rect);
    }
}

/// Resolved sizing bounds of one element.
struct SizingBounds {
    width: Option<f64>,
    height: Option<f64>,
    min: Size,
    max: Size,
}

impl SizingBounds {
    fn resolve(cx: &LayoutCx<'_>, id: ElementId) -> Self {
        Self {
            width: cx.value(id, cx.props.width),
            height: cx.value(id, cx.props.height),
            min: Size::new(
                cx.value(id, cx.props.min_width),
                cx.value(id, cx.props.min_height),
            ),
            max: Size::new(
                cx.value(id, cx.props.max_width),
                cx.value(id, cx.props.max_height),
            ),
        }
    }

    /// Pins a border-box size to the explicit size and clamps it into
    /// [min, max], min winning over max.
    fn apply(&self, mut size: Size) -> Size {
        if let Some(width) = self.width {
            size.width = width;
        }
        if let Some(height) = self.height {
            size.height = height;
        }
        size.width = size.width.min(self.max.width).max(self.min.width);
        size.height = size.height.min(self.max.height).max(self.min.height);
        size
    }
}

/// Runs the measure contract for one element.
///
/// Records the desired size (margin-inclusive) and the constraint, and clears
/// the element's measure-dirty flag. A no-op for dead elements.
pub fn measure_element(cx: &mut LayoutCx<'_>, id: ElementId, available: Size) {
    let Some(kind) = cx.tree.kind(id) else {
        return;
    };
    let margin: Thickness = cx.value(id, cx.props.margin);
    let padding: Thickness = cx.value(id, cx.props.padding);
    let bounds = SizingBounds::resolve(cx, id);

    let border_budget = bounds.apply(margin.deflate_size(available));
    let content_budget = padding.deflate_size(border_budget);

    let behavior = cx.behaviors.resolve(kind, cx.kinds);
    let content_size = behavior.measure(cx, id, content_budget);

    let border_size = bounds.apply(padding.inflate_size(content_size));
    let desired = margin.inflate_size(border_size);

    cx.tree.set_desired_size(id, desired);
    cx.tree.set_measure_constraint(id, available);
    cx.tree.remove_layout_flags(id, LayoutFlags::MEASURE_DIRTY);
}

/// Runs the arrange contract for one element.
///
/// `final_rect` is the margin-inclusive slot in parent-content coordinates.
/// Records it and clears the element's arrange-dirty flag. A no-op for dead
/// elements.
pub fn arrange_element(cx: &mut LayoutCx<'_>, id: ElementId, final_rect: Rect) {
    let Some(kind) = cx.tree.kind(id) else {
        return;
    };
    let margin: Thickness = cx.value(id, cx.props.margin);
    let padding: Thickness = cx.value(id, cx.props.padding);

    let border = margin.deflate_rect(final_rect);
    let content_size = padding.deflate_size(border.size());

    let behavior = cx.behaviors.resolve(kind, cx.kinds);
    let _ = behavior.arrange(cx, id, content_size);

    cx.tree.set_arrange_rect(id, final_rect);
    cx.tree.remove_layout_flags(id, LayoutFlags::ARRANGE_DIRTY);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::FlowBehavior;
    use crate::text::NullTextMeasurer;
    use alloc::rc::Rc;
    use trellis_property::KindTable;

    struct Fixture {
        tree: ElementTree,
        registry: PropertyRegistry,
        kinds: KindTable,
        props: StandardProperties,
        behaviors: BehaviorTable,
        text: NullTextMeasurer,
    }

    impl Fixture {
        fn new() -> Self {
            let mut kinds = KindTable::new();
            let mut registry = PropertyRegistry::new();
            let props = StandardProperties::register(&mut kinds, &mut registry);
            Self {
                tree: ElementTree::new(),
                registry,
                kinds,
                props,
                behaviors: BehaviorTable::new(Rc::new(FlowBehavior)),
                text: NullTextMeasurer,
            }
        }

        fn cx(&mut self) -> LayoutCx<'_> {
            LayoutCx {
                tree: &mut self.tree,
                registry: &self.registry,
                kinds: &self.kinds,
                props: &self.props,
                behaviors: &self.behaviors,
                text: &mut self.text,
            }
        }

        fn set<T: PropertyValue>(&mut self, id: ElementId, property: Property<T>, value: T) {
            self.tree.store_mut(id).unwrap().set(property, value);
        }
    }

    #[test]
    fn explicit_size_wins() {
        let mut fx = Fixture::new();
        let id = fx.tree.insert(fx.props.element);
        let (width, height) = (fx.props.width, fx.props.height);
        fx.set(id, width, Some(30.0));
        fx.set(id, height, Some(20.0));

        let mut cx = fx.cx();
        measure_element(&mut cx, id, Size::new(f64::INFINITY, f64::INFINITY));
        assert_eq!(fx.tree.desired_size(id), Size::new(30.0, 20.0));
    }

    #[test]
    fn min_max_clamp_with_min_winning() {
        let mut fx = Fixture::new();
        let id = fx.tree.insert(fx.props.element);
        let (width, min_w, max_w) = (fx.props.width, fx.props.min_width, fx.props.max_width);
        fx.set(id, width, Some(50.0));
        fx.set(id, max_w, 40.0);
        fx.set(id, min_w, 45.0);

        let mut cx = fx.cx();
        measure_element(&mut cx, id, Size::new(f64::INFINITY, f64::INFINITY));
        // min (45) beats max (40), both beat the explicit 50.
        assert_eq!(fx.tree.desired_size(id).width, 45.0);
    }

    #[test]
    fn desired_includes_margin_and_padding() {
        let mut fx = Fixture::new();
        let id = fx.tree.insert(fx.props.element);
        let (width, height, margin, padding) = (
            fx.props.width,
            fx.props.height,
            fx.props.margin,
            fx.props.padding,
        );
        fx.set(id, width, Some(30.0));
        fx.set(id, height, Some(20.0));
        fx.set(id, margin, Thickness::uniform(5.0));
        fx.set(id, padding, Thickness::uniform(2.0));

        let mut cx = fx.cx();
        measure_element(&mut cx, id, Size::new(f64::INFINITY, f64::INFINITY));
        // Explicit size is the border box; margin is added on top.
        assert_eq!(fx.tree.desired_size(id), Size::new(40.0, 30.0));
        assert_eq!(
            fx.tree.measure_constraint(id),
            Some(Size::new(f64::INFINITY, f64::INFINITY))
        );
    }

    #[test]
    fn measure_clears_dirty_flag() {
        let mut fx = Fixture::new();
        let id = fx.tree.insert(fx.props.element);
        fx.tree.insert_layout_flags(id, LayoutFlags::MEASURE_DIRTY);

        let mut cx = fx.cx();
        measure_element(&mut cx, id, Size::new(100.0, 100.0));
        assert!(!fx.tree.layout_flags(id).contains(LayoutFlags::MEASURE_DIRTY));
    }

    #[test]
    fn arrange_records_rect() {
        let mut fx = Fixture::new();
        let id = fx.tree.insert(fx.props.element);
        fx.tree.insert_layout_flags(id, LayoutFlags::ARRANGE_DIRTY);

        let mut cx = fx.cx();
        let rect = Rect::new(5.0, 5.0, 45.0, 25.0);
        arrange_element(&mut cx, id, rect);

        assert_eq!(fx.tree.arrange_rect(id), Some(rect));
        assert!(!fx.tree.layout_flags(id).contains(LayoutFlags::ARRANGE_DIRTY));
    }

    #[test]
    fn dead_element_is_a_no_op() {
        let mut fx = Fixture::new();
        let id = fx.tree.insert(fx.props.element);
        fx.tree.remove(id).unwrap();

        let mut cx = fx.cx();
        measure_element(&mut cx, id, Size::new(100.0, 100.0));
        arrange_element(&mut cx, id, Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(fx.tree.desired_size(id), Size::ZERO);
        assert_eq!(fx.tree.arrange_rect(id), None);
    }
}
