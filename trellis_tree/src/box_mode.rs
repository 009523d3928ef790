// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Box-model flow classification.

use core::fmt;
use core::str::FromStr;

/// How an element participates in its parent's default flow.
///
/// Flow only matters for children of non-panel containers; panels position
/// their children through their own arrangement strategy.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum BoxMode {
    /// Claims a full line: stacks vertically after prior siblings.
    Block,
    /// Flows left-to-right, wrapping to a new line at the parent's content
    /// width. The preceding sibling decides continue-vs-break.
    Inline,
    /// Positioned independently of sibling flow, anchored at the parent's
    /// content origin.
    Overlap,
    /// Uses the nearest ancestor's resolved mode (`Block` at the root).
    #[default]
    Inherit,
}

/// Error returned when parsing a [`BoxMode`] from markup text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoxModeParseError;

impl fmt::Display for BoxModeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected one of Block, Inline, Overlap, Inherit")
    }
}

impl core::error::Error for BoxModeParseError {}

impl FromStr for BoxMode {
    type Err = BoxModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Block" => Ok(Self::Block),
            "Inline" => Ok(Self::Inline),
            "Overlap" => Ok(Self::Overlap),
            "Inherit" => Ok(Self::Inherit),
            _ => Err(BoxModeParseError),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        assert_eq!("Block".parse::<BoxMode>().unwrap(), BoxMode::Block);
        assert_eq!("Inline".parse::<BoxMode>().unwrap(), BoxMode::Inline);
        assert_eq!("Overlap".parse::<BoxMode>().unwrap(), BoxMode::Overlap);
        assert_eq!("Inherit".parse::<BoxMode>().unwrap(), BoxMode::Inherit);
        assert!("block".parse::<BoxMode>().is_err());
    }

    #[test]
    fn default_is_inherit() {
        assert_eq!(BoxMode::default(), BoxMode::Inherit);
    }
}
