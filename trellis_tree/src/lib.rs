// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Tree: the element arena and box model.
//!
//! This crate owns the structural layer of the Trellis UI toolkit:
//!
//! - [`ElementTree`]: a generational slot arena holding every element, its
//!   parent/children links, depth, property store, and per-element layout
//!   state (desired size, last measure constraint, last arrange rectangle,
//!   dirty flags). The arena is also the membership index: liveness is O(1)
//!   and stale [`ElementId`]s never alias a live element.
//! - [`Thickness`] and [`BoxMode`]: the box-model value types, with the
//!   markup parse forms used by binding layers.
//! - [`StandardProperties`]: the per-UI registration of the standard element
//!   properties (sizing, margin/padding, box mode, text).
//! - [`GeometryCx`]: derived geometry. Position is never stored; the
//!   content, border, and extended rectangles are pure functions of stored
//!   size, margin, padding, and either the arrange result or box-model flow
//!   over preceding siblings.
//!
//! Layout scheduling and the measure/arrange passes live in
//! `trellis_layout`; this crate only records their results.
//!
//! This crate is `no_std` and uses `alloc`.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod arena;
mod box_mode;
mod geometry;
mod props;
mod thickness;

pub use arena::{ElementId, ElementTree, LayoutFlags, TreeError};
pub use box_mode::{BoxMode, BoxModeParseError};
pub use geometry::GeometryCx;
pub use props::StandardProperties;
pub use thickness::{Thickness, ThicknessParseError};
