// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end: a markup-loader-shaped build of a small UI.
//!
//! Everything an XML-ish loader would do — construct by kind name, assign
//! attribute text, attach children — happens through the binder, then layout
//! runs and geometry is checked. Failures on one element leave siblings
//! loadable, per the resolution-error contract.

use kurbo::Rect;
use trellis_binding::{BindError, Binder};
use trellis_layout::{SetError, Ui};
use trellis_panels::PanelProperties;
use trellis_tree::Thickness;

#[test]
fn loader_builds_and_lays_out_a_page() {
    let mut ui = Ui::headless();
    PanelProperties::register(&mut ui);
    let binder = Binder::new();

    // <DockPanel LastChildFill="True">
    //   <Element DockPanel.Dock="Top" Height="20"/>
    //   <StackPanel Orientation="Vertical">
    //     <Element Height="10" Margin="4,8"/>
    //     <Element Height="10"/>
    //   </StackPanel>
    // </DockPanel>
    let dock = binder.instantiate(&mut ui, "DockPanel").unwrap();
    binder.set_by_name(&mut ui, dock, "LastChildFill", "True").unwrap();

    let bar = binder.instantiate(&mut ui, "Element").unwrap();
    binder.set_by_name(&mut ui, bar, "DockPanel.Dock", "Top").unwrap();
    binder.set_by_name(&mut ui, bar, "Height", "20").unwrap();
    ui.add_child(dock, bar).unwrap();

    let stack = binder.instantiate(&mut ui, "StackPanel").unwrap();
    binder
        .set_by_name(&mut ui, stack, "Orientation", "Vertical")
        .unwrap();
    ui.add_child(dock, stack).unwrap();

    let first = binder.instantiate(&mut ui, "Element").unwrap();
    binder.set_by_name(&mut ui, first, "Height", "10").unwrap();
    binder.set_by_name(&mut ui, first, "Margin", "4,8").unwrap();
    ui.add_child(stack, first).unwrap();

    let second = binder.instantiate(&mut ui, "Element").unwrap();
    binder.set_by_name(&mut ui, second, "Height", "10").unwrap();
    ui.add_child(stack, second).unwrap();

    // The loaded margin round-trips through GetValue unchanged.
    assert_eq!(
        ui.get_value(first, ui.props().margin),
        Thickness::symmetric(4.0, 8.0)
    );

    ui.arrange_root(dock, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
    ui.update_layout();

    // Top bar, then the stack fills the remainder.
    assert_eq!(ui.tree().arrange_rect(bar), Some(Rect::new(0.0, 0.0, 100.0, 20.0)));
    assert_eq!(
        ui.tree().arrange_rect(stack),
        Some(Rect::new(0.0, 20.0, 100.0, 100.0))
    );

    // First child's slot includes its 4,8 margin: 10 + 8 tall.
    assert_eq!(
        ui.tree().arrange_rect(first),
        Some(Rect::new(0.0, 0.0, 100.0, 18.0))
    );
    assert_eq!(
        ui.tree().arrange_rect(second),
        Some(Rect::new(0.0, 18.0, 100.0, 28.0))
    );

    // Absolute border rect of the margined child sits inside its margin.
    assert_eq!(
        ui.geometry().border_rect(first),
        Rect::new(8.0, 24.0, 92.0, 34.0)
    );
}

#[test]
fn one_bad_element_does_not_poison_siblings() {
    let mut ui = Ui::headless();
    PanelProperties::register(&mut ui);
    let binder = Binder::new();

    let stack = binder.instantiate(&mut ui, "StackPanel").unwrap();

    // First element: a bad attribute value. The loader reports and aborts
    // this element.
    let broken = binder.instantiate(&mut ui, "Element").unwrap();
    let err = binder
        .set_by_name(&mut ui, broken, "Margin", "-2")
        .unwrap_err();
    assert!(matches!(err, BindError::Set(SetError::Invalid { .. })));
    ui.remove(broken).unwrap();

    // Sibling loads fine afterwards.
    let ok = binder.instantiate(&mut ui, "Element").unwrap();
    binder.set_by_name(&mut ui, ok, "Margin", "2").unwrap();
    ui.add_child(stack, ok).unwrap();

    assert_eq!(ui.get_value(ok, ui.props().margin), Thickness::uniform(2.0));
    assert_eq!(ui.tree().children(stack), [ok]);
}
