// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The default element behavior.
//!
//! Ordinary elements (everything that is not a panel) measure and arrange by
//! box-model flow:
//!
//! - A text-bearing leaf asks the text oracle for its extent.
//! - A childless element has zero intrinsic content.
//! - A container measures its children against the content budget, then lays
//!   them out with the Block/Inline/Overlap cursor rules; its desired content
//!   is the flow extent.
//!
//! Explicit Width/Height and min/max clamping are applied outside, by the
//! engine contract, so an explicit-sized leaf needs nothing from this file.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};
use trellis_tree::{BoxMode, ElementId};

use crate::behavior::ElementBehavior;
use crate::engine::LayoutCx;

/// The flow behavior: default for every kind without its own registration.
#[derive(Copy, Clone, Debug, Default)]
pub struct FlowBehavior;

impl ElementBehavior for FlowBehavior {
    fn measure(&self, cx: &mut LayoutCx<'_>, id: ElementId, available: Size) -> Size {
        let text: Option<String> = cx.value(id, cx.props.text);
        if let Some(text) = text {
            let font_size = cx.value(id, cx.props.font_size);
            return cx.text.measure_text(&text, font_size);
        }

        let children = cx.children(id);
        if children.is_empty() {
            return Size::ZERO;
        }
        for &child in &children {
            cx.measure_child(child, available);
        }
        flow_run(cx, &children, available.width).1
    }

    fn arrange(&self, cx: &mut LayoutCx<'_>, id: ElementId, final_size: Size) -> Size {
        let children = cx.children(id);
        let (rects, _) = flow_run(cx, &children, final_size.width);
        for (&child, rect) in children.iter().zip(rects) {
            cx.arrange_child(child, rect);
        }
        final_size
    }
}

/// Runs the flow cursor over `children`, producing each child's rectangle in
/// content coordinates and the overall extent.
///
/// Mirrors the sibling walk in `trellis_tree::GeometryCx::flow_offset`: Block
/// children claim a full line, Inline children advance and wrap against
/// `content_width`, Overlap children anchor at the origin without advancing.
fn flow_run(cx: &LayoutCx<'_>, children: &[ElementId], content_width: f64) -> (Vec<Rect>, Size) {
    let geometry = cx.geometry();
    let mut x = 0.0_f64;
    let mut y = 0.0_f64;
    let mut line_height = 0.0_f64;
    let mut extent = Size::ZERO;
    let mut rects = Vec::with_capacity(children.len());

    for &child in children {
        let mode = geometry.resolved_box_mode(child);
        let size = cx.desired_size(child);
        let origin = match mode {
            BoxMode::Overlap => Point::ZERO,
            BoxMode::Inline => {
                if x > 0.0 && x + size.width > content_width {
                    y += line_height;
                    x = 0.0;
                    line_height = 0.0;
                }
                let origin = Point::new(x, y);
                x += size.width;
                line_height = line_height.max(size.height);
                origin
            }
            BoxMode::Block | BoxMode::Inherit => {
                if x > 0.0 {
                    y += line_height;
                    x = 0.0;
                    line_height = 0.0;
                }
                let origin = Point::new(0.0, y);
                y += size.height;
                origin
            }
        };
        let rect = Rect::from_origin_size(origin, size);
        extent.width = extent.width.max(rect.x1);
        extent.height = extent.height.max(rect.y1);
        rects.push(rect);
    }
    (rects, extent)
}
