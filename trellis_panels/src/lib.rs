// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Panels: concrete arrangement strategies.
//!
//! Four positioning strategies plug into the measure/arrange contract of
//! `trellis_layout`:
//!
//! - [`StackBehavior`]: a single row or column along an orientation axis.
//! - [`WrapBehavior`]: greedy line grouping along the orientation axis.
//! - [`DockBehavior`]: children pinned to the edges of a shrinking
//!   rectangle, with last-child fill.
//! - [`CanvasBehavior`]: absolute positioning from attached edge offsets;
//!   never grows to fit.
//!
//! [`PanelProperties::register`] wires everything into a
//! [`Ui`](trellis_layout::Ui): the `Panel` base kind, the four concrete
//! kinds, the panel-local properties (`Orientation`, `LastChildFill`), the
//! attached properties (`DockPanel.Dock`, `Canvas.Left/Top/Right/Bottom`),
//! and the behaviors. Panels accept unbounded children; none of them errors
//! on an empty child list.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod canvas;
mod dock;
mod orientation;
mod stack;
mod wrap;

pub use canvas::CanvasBehavior;
pub use dock::{DockBehavior, DockSide, DockSideParseError};
pub use orientation::{Orientation, OrientationParseError};
pub use stack::StackBehavior;
pub use wrap::WrapBehavior;

use alloc::rc::Rc;

use trellis_layout::Ui;
use trellis_property::{Affects, KindId, Property, PropertyMetadataBuilder};

/// Kind and property handles for the panel family.
///
/// # Example
///
/// ```rust
/// use trellis_layout::Ui;
/// use trellis_panels::{DockSide, PanelProperties};
///
/// let mut ui = Ui::headless();
/// let panels = PanelProperties::register(&mut ui);
///
/// let dock = ui.create(panels.dock);
/// let child = ui.create(ui.props().element);
/// ui.add_child(dock, child).unwrap();
///
/// // The attached side is usable on any element.
/// ui.set_value(child, panels.dock_side, DockSide::Right).unwrap();
/// ```
#[derive(Debug)]
pub struct PanelProperties {
    /// The abstract base kind of every panel.
    pub panel: KindId,
    /// The `StackPanel` kind.
    pub stack: KindId,
    /// The `WrapPanel` kind.
    pub wrap: KindId,
    /// The `DockPanel` kind.
    pub dock: KindId,
    /// The `Canvas` kind.
    pub canvas: KindId,
    /// Stack axis for `StackPanel` and `WrapPanel`.
    ///
    /// Defaults to `Vertical`; `WrapPanel` overrides its metadata to default
    /// `Horizontal`.
    pub orientation: Property<Orientation>,
    /// Whether a `DockPanel`'s final child fills the remaining space.
    pub last_child_fill: Property<bool>,
    /// Attached: the edge a `DockPanel` child is pinned to.
    pub dock_side: Property<DockSide>,
    /// Attached: distance from a `Canvas`'s left edge.
    pub canvas_left: Property<Option<f64>>,
    /// Attached: distance from a `Canvas`'s top edge.
    pub canvas_top: Property<Option<f64>>,
    /// Attached: distance from a `Canvas`'s right edge.
    pub canvas_right: Property<Option<f64>>,
    /// Attached: distance from a `Canvas`'s bottom edge.
    pub canvas_bottom: Property<Option<f64>>,
}

impl PanelProperties {
    /// Registers the panel kinds, properties, and behaviors into a UI.
    ///
    /// # Panics
    ///
    /// Panics if any panel kind or property is already registered.
    pub fn register(ui: &mut Ui) -> Self {
        let panel = ui.register_kind("Panel", None);
        let stack = ui.register_kind("StackPanel", Some(panel));
        let wrap = ui.register_kind("WrapPanel", Some(panel));
        let dock = ui.register_kind("DockPanel", Some(panel));
        let canvas = ui.register_kind("Canvas", Some(panel));

        let registry = ui.registry_mut();
        // Flipping the axis reshapes the panel and may change its desired
        // size, so the parent re-measures too.
        let reshape = Affects::MEASURE
            | Affects::ARRANGE
            | Affects::PARENT_MEASURE
            | Affects::PARENT_ARRANGE;

        let orientation = registry.register(
            "Orientation",
            panel,
            PropertyMetadataBuilder::new(Orientation::Vertical)
                .affects(reshape)
                .build(),
        );
        // Wrap panels flow horizontally unless told otherwise.
        registry.override_metadata(
            orientation,
            wrap,
            PropertyMetadataBuilder::new(Orientation::Horizontal)
                .affects(reshape)
                .build(),
        );

        // Fill only changes placement of the final child.
        let last_child_fill = registry.register(
            "LastChildFill",
            dock,
            PropertyMetadataBuilder::new(true)
                .affects(Affects::ARRANGE)
                .build(),
        );

        let repos_parent = Affects::PARENT_MEASURE | Affects::PARENT_ARRANGE;
        let dock_side = registry.register_attached(
            "Dock",
            dock,
            PropertyMetadataBuilder::new(DockSide::Left)
                .affects(repos_parent)
                .build(),
        );

        let offset = || {
            PropertyMetadataBuilder::new(Option::<f64>::None)
                .affects(Affects::PARENT_ARRANGE)
                .validate(|v: &Option<f64>| v.is_none_or(f64::is_finite))
        };
        let canvas_left = registry.register_attached("Left", canvas, offset().build());
        let canvas_top = registry.register_attached("Top", canvas, offset().build());
        let canvas_right = registry.register_attached("Right", canvas, offset().build());
        let canvas_bottom = registry.register_attached("Bottom", canvas, offset().build());

        ui.register_behavior(stack, Rc::new(StackBehavior::new(orientation)));
        ui.register_behavior(wrap, Rc::new(WrapBehavior::new(orientation)));
        ui.register_behavior(dock, Rc::new(DockBehavior::new(dock_side, last_child_fill)));
        ui.register_behavior(
            canvas,
            Rc::new(CanvasBehavior::new(
                canvas_left,
                canvas_top,
                canvas_right,
                canvas_bottom,
            )),
        );

        Self {
            panel,
            stack,
            wrap,
            dock,
            canvas,
            orientation,
            last_child_fill,
            dock_side,
            canvas_left,
            canvas_top,
            canvas_right,
            canvas_bottom,
        }
    }
}
