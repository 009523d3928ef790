// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canvas: absolute positioning by attached edge offsets.

use kurbo::{Rect, Size};
use trellis_layout::{ElementBehavior, LayoutCx};
use trellis_property::Property;
use trellis_tree::ElementId;

/// Positions children absolutely from attached `Canvas.Left/Top/Right/Bottom`
/// offsets.
///
/// Children are measured unconstrained. Per axis, `Left`/`Top` wins over
/// `Right`/`Bottom`; with neither set the child anchors at the top-left
/// origin. A canvas reports zero desired size: it never grows to fit its
/// children.
#[derive(Debug)]
pub struct CanvasBehavior {
    left: Property<Option<f64>>,
    top: Property<Option<f64>>,
    right: Property<Option<f64>>,
    bottom: Property<Option<f64>>,
}

impl CanvasBehavior {
    /// Creates the behavior reading the given attached offset properties.
    #[must_use]
    pub fn new(
        left: Property<Option<f64>>,
        top: Property<Option<f64>>,
        right: Property<Option<f64>>,
        bottom: Property<Option<f64>>,
    ) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

impl ElementBehavior for CanvasBehavior {
    fn measure(&self, cx: &mut LayoutCx<'_>, id: ElementId, _available: Size) -> Size {
        let unconstrained = Size::new(f64::INFINITY, f64::INFINITY);
        for child in cx.children(id) {
            cx.measure_child(child, unconstrained);
        }
        Size::ZERO
    }

    fn arrange(&self, cx: &mut LayoutCx<'_>, id: ElementId, final_size: Size) -> Size {
        for child in cx.children(id) {
            let desired = cx.desired_size(child);

            let x = match (cx.value(child, self.left), cx.value(child, self.right)) {
                (Some(left), _) => left,
                (None, Some(right)) => final_size.width - desired.width - right,
                (None, None) => 0.0,
            };
            let y = match (cx.value(child, self.top), cx.value(child, self.bottom)) {
                (Some(top), _) => top,
                (None, Some(bottom)) => final_size.height - desired.height - bottom,
                (None, None) => 0.0,
            };

            cx.arrange_child(child, Rect::new(x, y, x + desired.width, y + desired.height));
        }
        final_size
    }
}
