// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wrap panel: children greedily grouped into lines.

use core::cell::RefCell;

use alloc::vec::Vec;
use hashbrown::HashMap;
use kurbo::Size;
use trellis_layout::{ElementBehavior, LayoutCx};
use trellis_property::Property;
use trellis_tree::ElementId;

use crate::orientation::Orientation;

/// One line of a wrap layout: a child range with its extents.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Line {
    /// First child index in the line.
    start: usize,
    /// One past the last child index.
    end: usize,
    /// Stack-axis length of the line.
    main: f64,
    /// Cross-axis thickness: the largest member's.
    cross: f64,
}

/// Wraps children into lines along the orientation axis.
///
/// A new line starts when the running stack-axis length plus the next
/// child's stack-axis extent would exceed the available length. Lines stack
/// along the cross axis; each line is as thick as its largest member.
///
/// Line grouping is computed by the measure pass and reused by the
/// following arrange pass; child-list mutation re-measures the panel, which
/// rebuilds the grouping.
#[derive(Debug)]
pub struct WrapBehavior {
    orientation: Property<Orientation>,
    lines: RefCell<HashMap<ElementId, Vec<Line>>>,
}

impl WrapBehavior {
    /// Creates the behavior reading the given orientation property.
    #[must_use]
    pub fn new(orientation: Property<Orientation>) -> Self {
        Self {
            orientation,
            lines: RefCell::new(HashMap::new()),
        }
    }

    /// Greedily groups children into lines from their desired sizes.
    fn group(
        cx: &LayoutCx<'_>,
        children: &[ElementId],
        orientation: Orientation,
        main_budget: f64,
    ) -> Vec<Line> {
        let mut lines = Vec::new();
        let mut line = Line {
            start: 0,
            end: 0,
            main: 0.0,
            cross: 0.0,
        };
        for (index, &child) in children.iter().enumerate() {
            let desired = cx.desired_size(child);
            let main = orientation.main(desired);
            let cross = orientation.cross(desired);

            if line.end > line.start && line.main + main > main_budget {
                lines.push(line);
                line = Line {
                    start: index,
                    end: index,
                    main: 0.0,
                    cross: 0.0,
                };
            }
            line.end = index + 1;
            line.main += main;
            line.cross = line.cross.max(cross);
        }
        if line.end > line.start {
            lines.push(line);
        }
        lines
    }
}

impl ElementBehavior for WrapBehavior {
    fn measure(&self, cx: &mut LayoutCx<'_>, id: ElementId, available: Size) -> Size {
        let orientation: Orientation = cx.value(id, self.orientation);
        let children = cx.children(id);
        for &child in &children {
            cx.measure_child(child, available);
        }

        let lines = Self::group(cx, &children, orientation, orientation.main(available));
        let mut main = 0.0_f64;
        let mut cross = 0.0_f64;
        for line in &lines {
            main = main.max(line.main);
            cross += line.cross;
        }
        self.lines.borrow_mut().insert(id, lines);

        orientation.size(main, cross)
    }

    fn arrange(&self, cx: &mut LayoutCx<'_>, id: ElementId, final_size: Size) -> Size {
        let orientation: Orientation = cx.value(id, self.orientation);
        let children = cx.children(id);

        // Grouped at measure time; rebuilt only if arrange runs without one.
        let lines = self.lines.borrow().get(&id).cloned();
        let lines = lines.unwrap_or_else(|| {
            Self::group(cx, &children, orientation, orientation.main(final_size))
        });

        let mut cross_offset = 0.0_f64;
        for line in &lines {
            let mut main_offset = 0.0_f64;
            for &child in &children[line.start..line.end] {
                let main_len = orientation.main(cx.desired_size(child));
                let rect = orientation.rect(main_offset, cross_offset, main_len, line.cross);
                main_offset += main_len;
                cx.arrange_child(child, rect);
            }
            cross_offset += line.cross;
        }
        final_size
    }
}

#[cfg(test)]
mod tests {
    use crate::PanelProperties;
    use kurbo::{Rect, Size};
    use trellis_layout::Ui;
    use trellis_tree::ElementId;

    fn sized_child(ui: &mut Ui, parent: ElementId, w: f64, h: f64) -> ElementId {
        let (width, height) = (ui.props().width, ui.props().height);
        let child = ui.create(ui.props().element);
        ui.add_child(parent, child).unwrap();
        ui.set_value(child, width, Some(w)).unwrap();
        ui.set_value(child, height, Some(h)).unwrap();
        child
    }

    #[test]
    fn groups_into_lines_at_budget() {
        let mut ui = Ui::headless();
        let panels = PanelProperties::register(&mut ui);
        // WrapPanel defaults to Horizontal via its metadata override.
        let wrap = ui.create(panels.wrap);

        let a = sized_child(&mut ui, wrap, 40.0, 10.0);
        let b = sized_child(&mut ui, wrap, 40.0, 10.0);
        let c = sized_child(&mut ui, wrap, 40.0, 10.0);

        ui.arrange_root(wrap, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        ui.update_layout();

        // 40 + 40 <= 100, the third 40 starts line two.
        assert_eq!(ui.tree().arrange_rect(a), Some(Rect::new(0.0, 0.0, 40.0, 10.0)));
        assert_eq!(ui.tree().arrange_rect(b), Some(Rect::new(40.0, 0.0, 80.0, 10.0)));
        assert_eq!(ui.tree().arrange_rect(c), Some(Rect::new(0.0, 10.0, 40.0, 20.0)));

        // Extent: widest line by summed line thicknesses.
        assert_eq!(ui.tree().desired_size(wrap), Size::new(80.0, 20.0));
    }

    #[test]
    fn line_thickness_is_tallest_member() {
        let mut ui = Ui::headless();
        let panels = PanelProperties::register(&mut ui);
        let wrap = ui.create(panels.wrap);

        let a = sized_child(&mut ui, wrap, 30.0, 10.0);
        let b = sized_child(&mut ui, wrap, 30.0, 25.0);
        let c = sized_child(&mut ui, wrap, 80.0, 5.0);

        ui.arrange_root(wrap, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        ui.update_layout();

        // a and b share line one (thickness 25); c wraps below it.
        assert_eq!(ui.tree().arrange_rect(a), Some(Rect::new(0.0, 0.0, 30.0, 25.0)));
        assert_eq!(ui.tree().arrange_rect(b), Some(Rect::new(30.0, 0.0, 60.0, 25.0)));
        assert_eq!(ui.tree().arrange_rect(c), Some(Rect::new(0.0, 25.0, 80.0, 30.0)));
    }

    #[test]
    fn oversized_child_gets_its_own_line() {
        let mut ui = Ui::headless();
        let panels = PanelProperties::register(&mut ui);
        let wrap = ui.create(panels.wrap);

        // Wider than the budget: still placed, alone on its line.
        let a = sized_child(&mut ui, wrap, 150.0, 10.0);
        let b = sized_child(&mut ui, wrap, 20.0, 10.0);

        ui.arrange_root(wrap, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        ui.update_layout();

        assert_eq!(ui.tree().arrange_rect(a), Some(Rect::new(0.0, 0.0, 150.0, 10.0)));
        assert_eq!(ui.tree().arrange_rect(b), Some(Rect::new(0.0, 10.0, 20.0, 20.0)));
    }

    #[test]
    fn vertical_wrap_stacks_columns() {
        let mut ui = Ui::headless();
        let panels = PanelProperties::register(&mut ui);
        let wrap = ui.create(panels.wrap);
        ui.set_value(wrap, panels.orientation, crate::Orientation::Vertical)
            .unwrap();

        let a = sized_child(&mut ui, wrap, 10.0, 60.0);
        let b = sized_child(&mut ui, wrap, 15.0, 60.0);

        ui.arrange_root(wrap, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        ui.update_layout();

        // 60 + 60 > 100: b starts a second column to the right of a.
        assert_eq!(ui.tree().arrange_rect(a), Some(Rect::new(0.0, 0.0, 10.0, 60.0)));
        assert_eq!(ui.tree().arrange_rect(b), Some(Rect::new(10.0, 0.0, 25.0, 60.0)));
    }

    #[test]
    fn empty_wrap_measures_zero() {
        let mut ui = Ui::headless();
        let panels = PanelProperties::register(&mut ui);
        let wrap = ui.create(panels.wrap);

        ui.arrange_root(wrap, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        ui.update_layout();
        assert_eq!(ui.tree().desired_size(wrap), Size::ZERO);
    }
}
