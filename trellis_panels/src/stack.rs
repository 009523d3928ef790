// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stack panel: children in a single row or column.

use kurbo::Size;
use trellis_layout::{ElementBehavior, LayoutCx};
use trellis_property::Property;
use trellis_tree::ElementId;

use crate::orientation::Orientation;

/// Stacks children sequentially along the orientation axis.
///
/// Measure gives each child unbounded space along the stack axis and the
/// panel's available length along the cross axis; the desired size is the
/// sum of stack-axis extents by the maximum cross-axis extent. Arrange
/// places children at increasing stack-axis offsets, each spanning the full
/// cross-axis length.
#[derive(Debug)]
pub struct StackBehavior {
    orientation: Property<Orientation>,
}

impl StackBehavior {
    /// Creates the behavior reading the given orientation property.
    #[must_use]
    pub fn new(orientation: Property<Orientation>) -> Self {
        Self { orientation }
    }
}

impl ElementBehavior for StackBehavior {
    fn measure(&self, cx: &mut LayoutCx<'_>, id: ElementId, available: Size) -> Size {
        let orientation: Orientation = cx.value(id, self.orientation);
        let child_budget = orientation.size(f64::INFINITY, orientation.cross(available));

        let mut main = 0.0_f64;
        let mut cross = 0.0_f64;
        for child in cx.children(id) {
            let desired = cx.measure_child(child, child_budget);
            main += orientation.main(desired);
            cross = cross.max(orientation.cross(desired));
        }
        orientation.size(main, cross)
    }

    fn arrange(&self, cx: &mut LayoutCx<'_>, id: ElementId, final_size: Size) -> Size {
        let orientation: Orientation = cx.value(id, self.orientation);
        let cross_len = orientation.cross(final_size);

        let mut offset = 0.0_f64;
        for child in cx.children(id) {
            let main_len = orientation.main(cx.desired_size(child));
            let rect = orientation.rect(offset, 0.0, main_len, cross_len);
            offset += main_len;
            cx.arrange_child(child, rect);
        }
        final_size
    }
}

#[cfg(test)]
mod tests {
    use crate::PanelProperties;
    use kurbo::{Rect, Size};
    use trellis_layout::Ui;

    fn sized_child(ui: &mut Ui, parent: trellis_tree::ElementId, w: f64, h: f64) -> trellis_tree::ElementId {
        let (width, height) = (ui.props().width, ui.props().height);
        let child = ui.create(ui.props().element);
        ui.add_child(parent, child).unwrap();
        ui.set_value(child, width, Some(w)).unwrap();
        ui.set_value(child, height, Some(h)).unwrap();
        child
    }

    #[test]
    fn vertical_stack_offsets_and_extent() {
        let mut ui = Ui::headless();
        let panels = PanelProperties::register(&mut ui);
        let stack = ui.create(panels.stack);

        let a = sized_child(&mut ui, stack, 25.0, 10.0);
        let b = sized_child(&mut ui, stack, 40.0, 20.0);
        let c = sized_child(&mut ui, stack, 30.0, 30.0);

        ui.arrange_root(stack, Rect::new(0.0, 0.0, 40.0, 60.0)).unwrap();
        ui.update_layout();

        // Desired: sum of heights by max width.
        assert_eq!(ui.tree().desired_size(stack), Size::new(40.0, 60.0));

        // Cumulative offsets 0, 10, 30; each child fills the cross axis.
        assert_eq!(ui.tree().arrange_rect(a), Some(Rect::new(0.0, 0.0, 40.0, 10.0)));
        assert_eq!(ui.tree().arrange_rect(b), Some(Rect::new(0.0, 10.0, 40.0, 30.0)));
        assert_eq!(ui.tree().arrange_rect(c), Some(Rect::new(0.0, 30.0, 40.0, 60.0)));
    }

    #[test]
    fn horizontal_stack_advances_x() {
        let mut ui = Ui::headless();
        let panels = PanelProperties::register(&mut ui);
        let stack = ui.create(panels.stack);
        ui.set_value(stack, panels.orientation, crate::Orientation::Horizontal)
            .unwrap();

        let a = sized_child(&mut ui, stack, 10.0, 15.0);
        let b = sized_child(&mut ui, stack, 20.0, 25.0);

        ui.arrange_root(stack, Rect::new(0.0, 0.0, 100.0, 25.0)).unwrap();
        ui.update_layout();

        assert_eq!(ui.tree().desired_size(stack), Size::new(30.0, 25.0));
        assert_eq!(ui.tree().arrange_rect(a), Some(Rect::new(0.0, 0.0, 10.0, 25.0)));
        assert_eq!(ui.tree().arrange_rect(b), Some(Rect::new(10.0, 0.0, 30.0, 25.0)));
    }

    #[test]
    fn empty_stack_measures_zero() {
        let mut ui = Ui::headless();
        let panels = PanelProperties::register(&mut ui);
        let stack = ui.create(panels.stack);

        ui.arrange_root(stack, Rect::new(0.0, 0.0, 50.0, 50.0)).unwrap();
        ui.update_layout();
        assert_eq!(ui.tree().desired_size(stack), Size::ZERO);
    }
}
