// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The binding surface a markup loader drives.
//!
//! [`Binder`] resolves kind and property names and applies text values, and
//! nothing else: construction goes through [`Ui::create`], writes go through
//! [`Ui::set_value_erased`], so markup can never bypass validation,
//! coercion, change detection, or invalidation.
//!
//! Property names resolve two ways:
//!
//! - `"Margin"` — instance resolution against the element's kind chain.
//!   Attached properties are rejected here; they are not instance
//!   properties, not even on their declaring kind.
//! - `"Canvas.Left"` — attached resolution: the owner kind by name, then the
//!   property among its declarations. Non-attached properties are rejected
//!   in this form.

use alloc::string::ToString as _;

use trellis_layout::{SetError, Ui};
use trellis_property::{KindId, PropertyId};
use trellis_tree::ElementId;

use crate::convert::{ConvertError, ConverterTable};
use crate::error::BindError;

/// Name resolution and text application for markup loaders.
#[derive(Debug)]
pub struct Binder {
    converters: ConverterTable,
}

impl Default for Binder {
    fn default() -> Self {
        Self::new()
    }
}

impl Binder {
    /// Creates a binder with the standard converter set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            converters: ConverterTable::standard(),
        }
    }

    /// Creates a binder with a custom converter table.
    #[must_use]
    pub fn with_converters(converters: ConverterTable) -> Self {
        Self { converters }
    }

    /// The converter table, for registering additional value types.
    pub fn converters_mut(&mut self) -> &mut ConverterTable {
        &mut self.converters
    }

    /// Creates an element from a kind name.
    ///
    /// # Errors
    ///
    /// [`BindError::UnknownKind`] when no kind is registered under `name`.
    pub fn instantiate(&self, ui: &mut Ui, kind_name: &str) -> Result<ElementId, BindError> {
        let kind = ui
            .kinds()
            .by_name(kind_name)
            .ok_or_else(|| BindError::UnknownKind {
                name: kind_name.to_string(),
            })?;
        Ok(ui.create(kind))
    }

    /// Resolves a property name against a target kind.
    ///
    /// Dotted names resolve as attached properties, bare names as instance
    /// properties (see the module docs).
    ///
    /// # Errors
    ///
    /// [`BindError::UnknownKind`], [`BindError::UnknownProperty`],
    /// [`BindError::NotAttached`], or [`BindError::AttachedSyntaxRequired`].
    pub fn resolve(&self, ui: &Ui, target: KindId, name: &str) -> Result<PropertyId, BindError> {
        if let Some((owner_name, property_name)) = name.split_once('.') {
            let owner = ui
                .kinds()
                .by_name(owner_name)
                .ok_or_else(|| BindError::UnknownKind {
                    name: owner_name.to_string(),
                })?;
            let id = ui
                .registry()
                .resolve(owner, property_name, ui.kinds())
                .ok_or_else(|| BindError::UnknownProperty {
                    name: name.to_string(),
                })?;
            let attached = ui.registry().get(id).is_some_and(|r| r.is_attached());
            if !attached {
                return Err(BindError::NotAttached {
                    name: name.to_string(),
                });
            }
            Ok(id)
        } else {
            let id = ui
                .registry()
                .resolve(target, name, ui.kinds())
                .ok_or_else(|| BindError::UnknownProperty {
                    name: name.to_string(),
                })?;
            if ui.registry().get(id).is_some_and(|r| r.is_attached()) {
                return Err(BindError::AttachedSyntaxRequired {
                    name: name.to_string(),
                });
            }
            Ok(id)
        }
    }

    /// Resolves `name` for the element, converts `raw`, and sets the value
    /// through the full pipeline.
    ///
    /// # Errors
    ///
    /// Resolution errors from [`resolve`](Self::resolve), conversion errors
    /// ([`BindError::NoConverter`], [`BindError::Parse`]), or the pipeline's
    /// [`BindError::Set`].
    pub fn set_by_name(
        &self,
        ui: &mut Ui,
        element: ElementId,
        name: &str,
        raw: &str,
    ) -> Result<(), BindError> {
        let kind = ui.tree().kind(element).ok_or(BindError::Set(SetError::Dead))?;
        let property = self.resolve(ui, kind, name)?;
        let target_type = ui
            .registry()
            .get(property)
            .map(|r| r.type_id())
            .ok_or_else(|| BindError::UnknownProperty {
                name: name.to_string(),
            })?;

        let value = self
            .converters
            .convert(target_type, raw)
            .map_err(|err| match err {
                ConvertError::Unsupported => BindError::NoConverter {
                    property: name.to_string(),
                },
                ConvertError::Parse { .. } => BindError::Parse {
                    property: name.to_string(),
                    value: raw.to_string(),
                },
            })?;
        ui.set_value_erased(element, property, value)
            .map_err(BindError::Set)
    }
}
