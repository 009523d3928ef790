// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-side thickness (margins, padding).

use core::fmt;
use core::str::FromStr;

use kurbo::{Rect, Size};

/// Per-side thickness around a box: margin or padding.
///
/// Sides are ordered clockwise from the top, CSS-style. The markup forms
/// accepted by [`FromStr`] are:
///
/// - `"4"` — all four sides
/// - `"4,8"` — top/bottom then left/right
/// - `"1,2,3,4"` — top, right, bottom, left
///
/// ```rust
/// use trellis_tree::Thickness;
///
/// let t: Thickness = "4,8".parse().unwrap();
/// assert_eq!(t, Thickness::symmetric(4.0, 8.0));
/// assert_eq!(t.top, 4.0);
/// assert_eq!(t.left, 8.0);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Thickness {
    /// Thickness of the top side.
    pub top: f64,
    /// Thickness of the right side.
    pub right: f64,
    /// Thickness of the bottom side.
    pub bottom: f64,
    /// Thickness of the left side.
    pub left: f64,
}

impl Thickness {
    /// Zero thickness on every side.
    pub const ZERO: Self = Self::uniform(0.0);

    /// Creates a thickness from the four sides, clockwise from the top.
    #[must_use]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates a thickness with the same value on every side.
    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// Creates a thickness from a vertical (top/bottom) and a horizontal
    /// (left/right) value.
    #[must_use]
    pub const fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }

    /// Total horizontal extent (left + right).
    #[must_use]
    #[inline]
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// Total vertical extent (top + bottom).
    #[must_use]
    #[inline]
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    /// Returns `true` if every side is finite and non-negative.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        [self.top, self.right, self.bottom, self.left]
            .iter()
            .all(|side| side.is_finite() && *side >= 0.0)
    }

    /// Shrinks a size by this thickness, clamping at zero.
    #[must_use]
    pub fn deflate_size(&self, size: Size) -> Size {
        Size::new(
            (size.width - self.horizontal()).max(0.0),
            (size.height - self.vertical()).max(0.0),
        )
    }

    /// Grows a size by this thickness.
    #[must_use]
    pub fn inflate_size(&self, size: Size) -> Size {
        Size::new(
            size.width + self.horizontal(),
            size.height + self.vertical(),
        )
    }

    /// Shrinks a rectangle by this thickness.
    ///
    /// The result keeps the deflated origin and never inverts: an over-thick
    /// inset collapses the rectangle to zero size at that origin.
    #[must_use]
    pub fn deflate_rect(&self, rect: Rect) -> Rect {
        let x0 = rect.x0 + self.left;
        let y0 = rect.y0 + self.top;
        Rect::new(
            x0,
            y0,
            (rect.x1 - self.right).max(x0),
            (rect.y1 - self.bottom).max(y0),
        )
    }
}

/// Error returned when parsing a [`Thickness`] from markup text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThicknessParseError;

impl fmt::Display for ThicknessParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expected 1, 2, or 4 comma-separated numbers (\"a\", \"v,h\", or \"t,r,b,l\")"
        )
    }
}

impl core::error::Error for ThicknessParseError {}

impl FromStr for Thickness {
    type Err = ThicknessParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = [0.0_f64; 4];
        let mut count = 0;
        for part in s.split(',') {
            if count == 4 {
                return Err(ThicknessParseError);
            }
            parts[count] = part.trim().parse().map_err(|_| ThicknessParseError)?;
            count += 1;
        }
        match count {
            1 => Ok(Self::uniform(parts[0])),
            2 => Ok(Self::symmetric(parts[0], parts[1])),
            4 => Ok(Self::new(parts[0], parts[1], parts[2], parts[3])),
            _ => Err(ThicknessParseError),
        }
    }
}
