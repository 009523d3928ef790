// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Binding: the surface a markup loader drives.
//!
//! A markup loader parses some XML-like document, constructs elements by
//! kind name, and assigns properties from attribute text. This crate is the
//! toolkit side of that contract:
//!
//! - [`Binder`]: kind instantiation by name, property-name resolution
//!   (including the dotted `OwnerKind.PropertyName` attached form), and
//!   `set_by_name`, which always routes through the UI's full set-value
//!   pipeline — markup can never bypass validation or coercion.
//! - [`ConverterTable`]: explicit string-to-value conversions keyed by
//!   target type. No implicit conversions exist; unsupported types and
//!   unparseable text are reported errors.
//! - [`BindError`]: the resolution-error taxonomy, each variant carrying the
//!   offending name so loaders can abort one element and continue with its
//!   siblings.
//!
//! The document parser itself lives with the application; this crate has no
//! opinion about markup syntax beyond the dotted attached-property form.
//!
//! ```rust
//! use trellis_binding::Binder;
//! use trellis_layout::Ui;
//! use trellis_panels::PanelProperties;
//! use trellis_tree::Thickness;
//!
//! let mut ui = Ui::headless();
//! let panels = PanelProperties::register(&mut ui);
//! let binder = Binder::new();
//!
//! let stack = binder.instantiate(&mut ui, "StackPanel").unwrap();
//! let label = binder.instantiate(&mut ui, "Element").unwrap();
//! ui.add_child(stack, label).unwrap();
//!
//! binder.set_by_name(&mut ui, label, "Margin", "4,8").unwrap();
//! assert_eq!(
//!     ui.get_value(label, ui.props().margin),
//!     Thickness::symmetric(4.0, 8.0)
//! );
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod bind;
mod convert;
mod error;

pub use bind::Binder;
pub use convert::{ConvertError, ConverterTable};
pub use error::BindError;
