// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dock panel: children pinned to edges of a shrinking rectangle.

use core::fmt;
use core::str::FromStr;

use kurbo::{Rect, Size};
use trellis_layout::{ElementBehavior, LayoutCx};
use trellis_property::Property;
use trellis_tree::ElementId;

/// The edge a dock-panel child is pinned to.
///
/// Carried by the attached `DockPanel.Dock` property on each child.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DockSide {
    /// Pin to the left edge, consuming width.
    #[default]
    Left,
    /// Pin to the top edge, consuming height.
    Top,
    /// Pin to the right edge, consuming width.
    Right,
    /// Pin to the bottom edge, consuming height.
    Bottom,
}

/// Error returned when parsing a [`DockSide`] from markup text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DockSideParseError;

impl fmt::Display for DockSideParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected one of Left, Top, Right, Bottom")
    }
}

impl core::error::Error for DockSideParseError {}

impl FromStr for DockSide {
    type Err = DockSideParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Left" => Ok(Self::Left),
            "Top" => Ok(Self::Top),
            "Right" => Ok(Self::Right),
            "Bottom" => Ok(Self::Bottom),
            _ => Err(DockSideParseError),
        }
    }
}

/// Docks children to the edges of the remaining rectangle, in child order.
///
/// Each docked child's footprint is subtracted from the remaining space;
/// with `LastChildFill` (the default) the final child takes everything left,
/// whatever its own dock side says.
#[derive(Debug)]
pub struct DockBehavior {
    side: Property<DockSide>,
    last_child_fill: Property<bool>,
}

impl DockBehavior {
    /// Creates the behavior reading the given attached side and fill
    /// properties.
    #[must_use]
    pub fn new(side: Property<DockSide>, last_child_fill: Property<bool>) -> Self {
        Self {
            side,
            last_child_fill,
        }
    }
}

impl ElementBehavior for DockBehavior {
    fn measure(&self, cx: &mut LayoutCx<'_>, id: ElementId, available: Size) -> Size {
        let mut used_width = 0.0_f64;
        let mut used_height = 0.0_f64;
        let mut needed_width = 0.0_f64;
        let mut needed_height = 0.0_f64;

        for child in cx.children(id) {
            let budget = Size::new(
                (available.width - used_width).max(0.0),
                (available.height - used_height).max(0.0),
            );
            let desired = cx.measure_child(child, budget);
            match cx.value(child, self.side) {
                DockSide::Left | DockSide::Right => {
                    needed_height = needed_height.max(used_height + desired.height);
                    used_width += desired.width;
                }
                DockSide::Top | DockSide::Bottom => {
                    needed_width = needed_width.max(used_width + desired.width);
                    used_height += desired.height;
                }
            }
        }
        Size::new(
            needed_width.max(used_width),
            needed_height.max(used_height),
        )
    }

    fn arrange(&self, cx: &mut LayoutCx<'_>, id: ElementId, final_size: Size) -> Size {
        let fill: bool = cx.value(id, self.last_child_fill);
        let children = cx.children(id);
        let count = children.len();

        let mut left = 0.0_f64;
        let mut top = 0.0_f64;
        let mut right = 0.0_f64;
        let mut bottom = 0.0_f64;

        for (index, child) in children.into_iter().enumerate() {
            let desired = cx.desired_size(child);
            let remaining_width = (final_size.width - left - right).max(0.0);
            let remaining_height = (final_size.height - top - bottom).max(0.0);

            let rect = if fill && index + 1 == count {
                Rect::new(left, top, left + remaining_width, top + remaining_height)
            } else {
                match cx.value(child, self.side) {
                    DockSide::Left => {
                        let rect = Rect::new(left, top, left + desired.width, top + remaining_height);
                        left += desired.width;
                        rect
                    }
                    DockSide::Right => {
                        let rect = Rect::new(
                            final_size.width - right - desired.width,
                            top,
                            final_size.width - right,
                            top + remaining_height,
                        );
                        right += desired.width;
                        rect
                    }
                    DockSide::Top => {
                        let rect = Rect::new(left, top, left + remaining_width, top + desired.height);
                        top += desired.height;
                        rect
                    }
                    DockSide::Bottom => {
                        let rect = Rect::new(
                            left,
                            final_size.height - bottom - desired.height,
                            left + remaining_width,
                            final_size.height - bottom,
                        );
                        bottom += desired.height;
                        rect
                    }
                }
            };
            cx.arrange_child(child, rect);
        }
        final_size
    }
}
