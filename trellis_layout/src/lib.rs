// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Layout: the two-pass constraint layout engine.
//!
//! This crate owns the dynamic half of the Trellis UI toolkit:
//!
//! - [`LayoutScheduler`]: two depth-ordered dirty queues (measure, arrange)
//!   drained once per frame, deduplicated through the tree's per-element
//!   flags, with lazy deletion for removed elements. Property metadata
//!   [`Affects`](trellis_property::Affects) flags route here and nowhere
//!   else.
//! - [`measure_element`] / [`arrange_element`]: the engine side of the
//!   measure/arrange contract — margin/padding peeling, explicit-size
//!   pinning, min/max clamping — around per-kind behavior overrides.
//! - [`ElementBehavior`] / [`BehaviorTable`]: the strategy seam. Panels plug
//!   their arrangement algorithms in here; everything else falls back to
//!   [`FlowBehavior`], which lays out by Block/Inline/Overlap box-model flow
//!   and measures text leaves through the oracle.
//! - [`TextMeasurer`]: the renderer-supplied measurement oracle, with
//!   [`CachingTextMeasurer`] memoizing its potentially expensive calls.
//! - [`CascadeQueue`]: bounded, iterative follow-up writes from change
//!   hooks — the explicit invalidation-storm policy.
//! - [`Ui`]: the root that owns all of the above plus the element arena, and
//!   exposes the blessed `set_value`/`clear_value`/`update_layout` surface.
//!
//! ## Control flow
//!
//! A property write → validate/coerce/compare in [`Ui::set_value`] →
//! commit → callbacks → `Affects` routing into the scheduler → next
//! [`Ui::update_layout`] drains measure (leaf sizing bubbles up through
//! behavior overrides) then arrange (placement flows down) → geometry
//! available through [`Ui::geometry`].
//!
//! Everything is single-threaded and frame-driven; a layout pass runs to
//! completion with no suspension points.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod behavior;
mod cascade;
mod engine;
mod flow;
mod queue;
mod scheduler;
mod text;
mod ui;

pub use behavior::{BehaviorTable, ChangeCx, ElementBehavior};
pub use cascade::{CascadeQueue, MAX_CASCADE_ROUNDS, PendingWrite};
pub use engine::{LayoutCx, arrange_element, measure_element};
pub use flow::FlowBehavior;
pub use scheduler::LayoutScheduler;
pub use text::{CachingTextMeasurer, FixedMetrics, NullTextMeasurer, TextMeasurer};
pub use ui::{SetError, Ui};
