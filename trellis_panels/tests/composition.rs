// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests composing panels and re-running layout under property mutation.
//!
//! These exercise the full pipeline: property writes route invalidation into
//! the scheduler, `update_layout` drains measure then arrange, and derived
//! geometry reflects the results.

use kurbo::{Rect, Size};
use trellis_layout::Ui;
use trellis_panels::{DockSide, Orientation, PanelProperties};
use trellis_tree::{ElementId, Thickness};

fn sized_child(ui: &mut Ui, parent: ElementId, w: f64, h: f64) -> ElementId {
    let (width, height) = (ui.props().width, ui.props().height);
    let child = ui.create(ui.props().element);
    ui.add_child(parent, child).unwrap();
    ui.set_value(child, width, Some(w)).unwrap();
    ui.set_value(child, height, Some(h)).unwrap();
    child
}

#[test]
fn dock_nested_in_stack() {
    let mut ui = Ui::headless();
    let panels = PanelProperties::register(&mut ui);

    let stack = ui.create(panels.stack);
    let header = sized_child(&mut ui, stack, 60.0, 10.0);

    let dock = ui.create(panels.dock);
    ui.add_child(stack, dock).unwrap();
    let dock_height = ui.props().height;
    ui.set_value(dock, dock_height, Some(30.0)).unwrap();

    let side = sized_child(&mut ui, dock, 12.0, 30.0);
    ui.set_value(side, panels.dock_side, DockSide::Left).unwrap();
    let fill = ui.create(ui.props().element);
    ui.add_child(dock, fill).unwrap();

    ui.arrange_root(stack, Rect::new(0.0, 0.0, 60.0, 100.0)).unwrap();
    ui.update_layout();

    // Stack: header on top, dock right below it.
    assert_eq!(ui.tree().arrange_rect(header), Some(Rect::new(0.0, 0.0, 60.0, 10.0)));
    assert_eq!(ui.tree().arrange_rect(dock), Some(Rect::new(0.0, 10.0, 60.0, 40.0)));

    // Inside the dock, coordinates are dock-content-relative.
    assert_eq!(ui.tree().arrange_rect(side), Some(Rect::new(0.0, 0.0, 12.0, 30.0)));
    assert_eq!(ui.tree().arrange_rect(fill), Some(Rect::new(12.0, 0.0, 60.0, 30.0)));

    // Absolute geometry composes the nesting.
    assert_eq!(
        ui.geometry().border_rect(fill),
        Rect::new(12.0, 10.0, 60.0, 40.0)
    );
}

#[test]
fn orientation_change_relayouts_stack() {
    let mut ui = Ui::headless();
    let panels = PanelProperties::register(&mut ui);
    let stack = ui.create(panels.stack);

    let a = sized_child(&mut ui, stack, 10.0, 10.0);
    let b = sized_child(&mut ui, stack, 10.0, 10.0);

    ui.arrange_root(stack, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
    ui.update_layout();
    assert_eq!(ui.tree().arrange_rect(b), Some(Rect::new(0.0, 10.0, 100.0, 20.0)));

    // Flipping the orientation re-measures and re-arranges on the next frame.
    ui.set_value(stack, panels.orientation, Orientation::Horizontal)
        .unwrap();
    ui.update_layout();
    assert_eq!(ui.tree().arrange_rect(a), Some(Rect::new(0.0, 0.0, 10.0, 100.0)));
    assert_eq!(ui.tree().arrange_rect(b), Some(Rect::new(10.0, 0.0, 20.0, 100.0)));
}

#[test]
fn child_resize_reflows_siblings() {
    let mut ui = Ui::headless();
    let panels = PanelProperties::register(&mut ui);
    let stack = ui.create(panels.stack);

    let a = sized_child(&mut ui, stack, 10.0, 10.0);
    let b = sized_child(&mut ui, stack, 10.0, 10.0);

    ui.arrange_root(stack, Rect::new(0.0, 0.0, 50.0, 100.0)).unwrap();
    ui.update_layout();
    assert_eq!(ui.tree().arrange_rect(b), Some(Rect::new(0.0, 10.0, 50.0, 20.0)));

    // Growing the first child pushes the second one down a frame later.
    let height = ui.props().height;
    ui.set_value(a, height, Some(25.0)).unwrap();
    ui.update_layout();
    assert_eq!(ui.tree().arrange_rect(b), Some(Rect::new(0.0, 25.0, 50.0, 35.0)));
    assert_eq!(ui.tree().desired_size(stack), Size::new(10.0, 35.0));
}

#[test]
fn margin_participates_in_stacking() {
    let mut ui = Ui::headless();
    let panels = PanelProperties::register(&mut ui);
    let stack = ui.create(panels.stack);

    let a = sized_child(&mut ui, stack, 20.0, 10.0);
    let margin = ui.props().margin;
    ui.set_value(a, margin, Thickness::uniform(5.0)).unwrap();
    let b = sized_child(&mut ui, stack, 20.0, 10.0);

    ui.arrange_root(stack, Rect::new(0.0, 0.0, 30.0, 100.0)).unwrap();
    ui.update_layout();

    // a's slot includes its margin (30x20); b starts after it.
    assert_eq!(ui.tree().desired_size(a), Size::new(30.0, 20.0));
    assert_eq!(ui.tree().arrange_rect(b), Some(Rect::new(0.0, 20.0, 30.0, 30.0)));
    // The border box sits inside the margin.
    assert_eq!(ui.geometry().border_rect(a), Rect::new(5.0, 5.0, 25.0, 15.0));
}

#[test]
fn removal_purges_pending_layout() {
    let mut ui = Ui::headless();
    let panels = PanelProperties::register(&mut ui);
    let stack = ui.create(panels.stack);
    let a = sized_child(&mut ui, stack, 10.0, 10.0);
    let b = sized_child(&mut ui, stack, 10.0, 10.0);

    ui.arrange_root(stack, Rect::new(0.0, 0.0, 50.0, 50.0)).unwrap();
    ui.update_layout();

    // Queue work for a, then remove it before the frame.
    let height = ui.props().height;
    ui.set_value(a, height, Some(40.0)).unwrap();
    ui.remove(a).unwrap();
    ui.update_layout();

    assert!(!ui.tree().is_alive(a));
    // b moved up into a's place; no stale layout from the removed element.
    assert_eq!(ui.tree().arrange_rect(b), Some(Rect::new(0.0, 0.0, 50.0, 10.0)));
    assert_eq!(ui.tree().desired_size(stack), Size::new(10.0, 10.0));
}

#[test]
fn wrap_regroups_after_child_removal() {
    let mut ui = Ui::headless();
    let panels = PanelProperties::register(&mut ui);
    let wrap = ui.create(panels.wrap);

    let a = sized_child(&mut ui, wrap, 40.0, 10.0);
    let b = sized_child(&mut ui, wrap, 40.0, 10.0);
    let c = sized_child(&mut ui, wrap, 40.0, 10.0);

    ui.arrange_root(wrap, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
    ui.update_layout();
    assert_eq!(ui.tree().arrange_rect(c), Some(Rect::new(0.0, 10.0, 40.0, 20.0)));

    // Removing a line-one member pulls c back onto the first line.
    ui.remove(a).unwrap();
    ui.update_layout();
    assert_eq!(ui.tree().arrange_rect(b), Some(Rect::new(0.0, 0.0, 40.0, 10.0)));
    assert_eq!(ui.tree().arrange_rect(c), Some(Rect::new(40.0, 0.0, 80.0, 10.0)));
}

#[test]
fn canvas_inside_dock_fill() {
    let mut ui = Ui::headless();
    let panels = PanelProperties::register(&mut ui);

    let dock = ui.create(panels.dock);
    let top = sized_child(&mut ui, dock, 10.0, 20.0);
    ui.set_value(top, panels.dock_side, DockSide::Top).unwrap();

    let canvas = ui.create(panels.canvas);
    ui.add_child(dock, canvas).unwrap();
    let pinned = sized_child(&mut ui, canvas, 10.0, 10.0);
    ui.set_value(pinned, panels.canvas_right, Some(5.0)).unwrap();
    ui.set_value(pinned, panels.canvas_bottom, Some(5.0)).unwrap();

    ui.arrange_root(dock, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
    ui.update_layout();

    // The canvas fills the 100x80 remainder below the top bar.
    assert_eq!(ui.tree().arrange_rect(canvas), Some(Rect::new(0.0, 20.0, 100.0, 100.0)));
    // Pinned child anchors to the canvas's far corner.
    assert_eq!(ui.tree().arrange_rect(pinned), Some(Rect::new(85.0, 65.0, 95.0, 75.0)));
    // Absolute: offset by the canvas position inside the dock.
    assert_eq!(ui.geometry().border_rect(pinned), Rect::new(85.0, 85.0, 95.0, 95.0));
}
