// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The standard element property set.
//!
//! Every UI instance registers these once on its root `"Element"` kind.
//! Handles are plain values bundled in [`StandardProperties`]; nothing here
//! is global, so tests build their own set and stay hermetic.

use alloc::string::String;

use trellis_property::{
    Affects, KindId, KindTable, Property, PropertyMetadataBuilder, PropertyRegistry,
};

use crate::box_mode::BoxMode;
use crate::thickness::Thickness;

/// Typed handles for the standard element properties.
///
/// Sizing properties reject negative (and non-finite, where nonsensical)
/// values at validation time, so a bad write reports an error and commits
/// nothing.
#[derive(Debug)]
pub struct StandardProperties {
    /// The root element kind every other kind derives from.
    pub element: KindId,
    /// Explicit width of the border box; `None` sizes to content.
    pub width: Property<Option<f64>>,
    /// Explicit height of the border box; `None` sizes to content.
    pub height: Property<Option<f64>>,
    /// Lower bound on the border-box width.
    pub min_width: Property<f64>,
    /// Lower bound on the border-box height.
    pub min_height: Property<f64>,
    /// Upper bound on the border-box width.
    pub max_width: Property<f64>,
    /// Upper bound on the border-box height.
    pub max_height: Property<f64>,
    /// Outer spacing, part of the element's extended box.
    pub margin: Property<Thickness>,
    /// Inner spacing between the border box and the content box.
    pub padding: Property<Thickness>,
    /// Flow classification for default (non-panel) containers.
    pub box_mode: Property<BoxMode>,
    /// Text content of text-bearing leaves.
    pub text: Property<Option<String>>,
    /// Font size used to measure text; inherits down the tree.
    pub font_size: Property<f64>,
}

impl StandardProperties {
    /// Registers the `"Element"` kind and its standard properties.
    ///
    /// # Panics
    ///
    /// Panics if `"Element"` or any standard property is already registered
    /// in the given tables.
    pub fn register(kinds: &mut KindTable, registry: &mut PropertyRegistry) -> Self {
        let element = kinds.register("Element", None);
        // A size change re-measures, and re-arranges both sides: the parent
        // may keep its own size (fixed bounds) yet still owe the children a
        // fresh placement.
        let sizing = Affects::MEASURE
            | Affects::ARRANGE
            | Affects::PARENT_MEASURE
            | Affects::PARENT_ARRANGE;

        let explicit_size = || {
            PropertyMetadataBuilder::new(Option::<f64>::None)
                .affects(sizing)
                .validate(|v: &Option<f64>| v.is_none_or(|v| v.is_finite() && v >= 0.0))
        };
        let width = registry.register("Width", element, explicit_size().build());
        let height = registry.register("Height", element, explicit_size().build());

        let min_size = || {
            PropertyMetadataBuilder::new(0.0_f64)
                .affects(sizing)
                .validate(|v: &f64| v.is_finite() && *v >= 0.0)
        };
        let min_width = registry.register("MinWidth", element, min_size().build());
        let min_height = registry.register("MinHeight", element, min_size().build());

        // Max bounds may be infinite (unbounded) but never negative or NaN.
        let max_size = || {
            PropertyMetadataBuilder::new(f64::INFINITY)
                .affects(sizing)
                .validate(|v: &f64| !v.is_nan() && *v >= 0.0)
        };
        let max_width = registry.register("MaxWidth", element, max_size().build());
        let max_height = registry.register("MaxHeight", element, max_size().build());

        let margin = registry.register(
            "Margin",
            element,
            PropertyMetadataBuilder::new(Thickness::ZERO)
                .affects(sizing)
                .validate(Thickness::is_valid)
                .build(),
        );
        let padding = registry.register(
            "Padding",
            element,
            PropertyMetadataBuilder::new(Thickness::ZERO)
                .affects(sizing)
                .validate(Thickness::is_valid)
                .build(),
        );

        let box_mode = registry.register(
            "BoxMode",
            element,
            PropertyMetadataBuilder::new(BoxMode::Inherit)
                .affects(Affects::PARENT_MEASURE | Affects::PARENT_ARRANGE)
                .build(),
        );

        let text = registry.register(
            "Text",
            element,
            PropertyMetadataBuilder::new(Option::<String>::None)
                .affects(sizing)
                .build(),
        );
        let font_size = registry.register(
            "FontSize",
            element,
            PropertyMetadataBuilder::new(12.0_f64)
                .inherits(true)
                .affects(sizing)
                .validate(|v: &f64| v.is_finite() && *v > 0.0)
                .build(),
        );

        Self {
            element,
            width,
            height,
            min_width,
            min_height,
            max_width,
            max_height,
            margin,
            padding,
            box_mode,
            text,
            font_size,
        }
    }
}
