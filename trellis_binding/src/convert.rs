// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! String-to-value conversion.
//!
//! Markup carries property values as text; [`ConverterTable`] maps a target
//! value type to an explicit conversion function. There are no implicit
//! conversions: a type without a registered converter is an error the loader
//! reports, and loaders never bypass the table.

use alloc::boxed::Box;
use alloc::string::{String, ToString as _};
use core::any::TypeId;

use hashbrown::HashMap;
use trellis_panels::{DockSide, Orientation};
use trellis_property::{ErasedValue, PropertyValue};
use trellis_tree::{BoxMode, Thickness};

/// Why a conversion failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConvertError {
    /// No converter is registered for the target type.
    Unsupported,
    /// The converter rejected the input text.
    Parse {
        /// Name of the target type.
        type_name: &'static str,
    },
}

struct Converter {
    type_name: &'static str,
    convert: Box<dyn Fn(&str) -> Option<ErasedValue>>,
}

/// Type-keyed table of string-to-value converters.
///
/// # Example
///
/// ```rust
/// use core::any::TypeId;
/// use trellis_binding::ConverterTable;
/// use trellis_tree::Thickness;
///
/// let table = ConverterTable::standard();
/// let value = table.convert(TypeId::of::<Thickness>(), "4,8").unwrap();
/// assert_eq!(
///     value.downcast_ref::<Thickness>(),
///     Some(&Thickness::symmetric(4.0, 8.0))
/// );
/// ```
#[derive(Default)]
pub struct ConverterTable {
    converters: HashMap<TypeId, Converter>,
}

impl ConverterTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table with converters for the standard value types:
    /// `f64`, `Option<f64>` (`Auto` = `None`), `bool`, `String`,
    /// `Option<String>`, [`Thickness`], [`BoxMode`], [`Orientation`], and
    /// [`DockSide`].
    #[must_use]
    pub fn standard() -> Self {
        let mut table = Self::new();
        table.register(|s: &str| s.trim().parse::<f64>().ok());
        table.register(|s: &str| {
            let s = s.trim();
            if s.is_empty() || s == "Auto" {
                Some(Option::<f64>::None)
            } else {
                s.parse::<f64>().ok().map(Some)
            }
        });
        table.register(|s: &str| match s.trim() {
            "True" | "true" => Some(true),
            "False" | "false" => Some(false),
            _ => None,
        });
        table.register(|s: &str| Some(s.to_string()));
        table.register(|s: &str| Some(Some(s.to_string())));
        table.register(|s: &str| s.parse::<Thickness>().ok());
        table.register(|s: &str| s.parse::<BoxMode>().ok());
        table.register(|s: &str| s.parse::<Orientation>().ok());
        table.register(|s: &str| s.parse::<DockSide>().ok());
        table
    }

    /// Registers a converter for `T`, replacing any existing one.
    ///
    /// The function returns `None` to reject the input.
    pub fn register<T, F>(&mut self, convert: F)
    where
        T: PropertyValue,
        F: Fn(&str) -> Option<T> + 'static,
    {
        self.converters.insert(
            TypeId::of::<T>(),
            Converter {
                type_name: core::any::type_name::<T>(),
                convert: Box::new(move |s| convert(s).map(ErasedValue::new)),
            },
        );
    }

    /// Returns `true` if a converter is registered for the type.
    #[must_use]
    pub fn supports(&self, target: TypeId) -> bool {
        self.converters.contains_key(&target)
    }

    /// Converts raw text to an erased value of the target type.
    ///
    /// # Errors
    ///
    /// [`ConvertError::Unsupported`] without a registered converter,
    /// [`ConvertError::Parse`] when the converter rejects the text.
    pub fn convert(&self, target: TypeId, raw: &str) -> Result<ErasedValue, ConvertError> {
        let converter = self
            .converters
            .get(&target)
            .ok_or(ConvertError::Unsupported)?;
        (converter.convert)(raw).ok_or(ConvertError::Parse {
            type_name: converter.type_name,
        })
    }
}

impl core::fmt::Debug for ConverterTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConverterTable")
            .field("count", &self.converters.len())
            .finish_non_exhaustive()
    }
}
