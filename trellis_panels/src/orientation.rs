// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stack-axis orientation and axis helpers.

use core::fmt;
use core::str::FromStr;

use kurbo::{Rect, Size};

/// The stack axis of a [`StackPanel`](crate::StackBehavior) or
/// [`WrapPanel`](crate::WrapBehavior).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Children advance left-to-right.
    Horizontal,
    /// Children advance top-to-bottom.
    #[default]
    Vertical,
}

/// Error returned when parsing an [`Orientation`] from markup text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrientationParseError;

impl fmt::Display for OrientationParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected Horizontal or Vertical")
    }
}

impl core::error::Error for OrientationParseError {}

impl FromStr for Orientation {
    type Err = OrientationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Horizontal" => Ok(Self::Horizontal),
            "Vertical" => Ok(Self::Vertical),
            _ => Err(OrientationParseError),
        }
    }
}

impl Orientation {
    /// The stack-axis component of a size.
    #[must_use]
    #[inline]
    pub fn main(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    /// The cross-axis component of a size.
    #[must_use]
    #[inline]
    pub fn cross(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.height,
            Self::Vertical => size.width,
        }
    }

    /// Builds a size from stack-axis and cross-axis lengths.
    #[must_use]
    #[inline]
    pub fn size(self, main: f64, cross: f64) -> Size {
        match self {
            Self::Horizontal => Size::new(main, cross),
            Self::Vertical => Size::new(cross, main),
        }
    }

    /// Builds a rectangle from stack/cross origins and lengths.
    #[must_use]
    #[inline]
    pub fn rect(self, main_origin: f64, cross_origin: f64, main_len: f64, cross_len: f64) -> Rect {
        match self {
            Self::Horizontal => Rect::new(
                main_origin,
                cross_origin,
                main_origin + main_len,
                cross_origin + cross_len,
            ),
            Self::Vertical => Rect::new(
                cross_origin,
                main_origin,
                cross_origin + cross_len,
                main_origin + main_len,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        assert_eq!(
            "Horizontal".parse::<Orientation>().unwrap(),
            Orientation::Horizontal
        );
        assert_eq!(
            "Vertical".parse::<Orientation>().unwrap(),
            Orientation::Vertical
        );
        assert!("Diagonal".parse::<Orientation>().is_err());
    }

    #[test]
    fn axis_accessors() {
        let size = Size::new(10.0, 20.0);
        assert_eq!(Orientation::Horizontal.main(size), 10.0);
        assert_eq!(Orientation::Horizontal.cross(size), 20.0);
        assert_eq!(Orientation::Vertical.main(size), 20.0);
        assert_eq!(Orientation::Vertical.cross(size), 10.0);

        assert_eq!(Orientation::Vertical.size(20.0, 10.0), size);
        assert_eq!(Orientation::Horizontal.size(10.0, 20.0), size);
    }

    #[test]
    fn axis_rect() {
        assert_eq!(
            Orientation::Horizontal.rect(5.0, 7.0, 10.0, 20.0),
            Rect::new(5.0, 7.0, 15.0, 27.0)
        );
        assert_eq!(
            Orientation::Vertical.rect(5.0, 7.0, 10.0, 20.0),
            Rect::new(7.0, 5.0, 27.0, 15.0)
        );
    }
}
