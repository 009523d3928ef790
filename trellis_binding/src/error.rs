// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Binding errors.
//!
//! Every variant carries the offending name so a markup loader can report
//! what failed, abort the element it was loading, and continue with its
//! siblings. Nothing here is silently swallowed.

use alloc::string::String;
use core::fmt;

use trellis_layout::SetError;

/// Error returned by name resolution and `set_by_name`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindError {
    /// No kind is registered under this name.
    UnknownKind {
        /// The kind name that failed to resolve.
        name: String,
    },
    /// No property resolves under this name for the target's kind.
    UnknownProperty {
        /// The property name that failed to resolve.
        name: String,
    },
    /// Dotted `Owner.Name` syntax used on a property that is not attached.
    NotAttached {
        /// The dotted name as written.
        name: String,
    },
    /// An attached property addressed as if it were an instance property.
    ///
    /// Attached properties must be written with the dotted `Owner.Name`
    /// form, even on their declaring kind.
    AttachedSyntaxRequired {
        /// The property name as written.
        name: String,
    },
    /// No converter is registered for the property's value type.
    NoConverter {
        /// The property name as written.
        property: String,
    },
    /// The raw text failed to convert to the property's value type.
    Parse {
        /// The property name as written.
        property: String,
        /// The raw text that failed to parse.
        value: String,
    },
    /// The converted value was rejected by the set-value pipeline.
    Set(SetError),
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKind { name } => write!(f, "unknown element kind '{name}'"),
            Self::UnknownProperty { name } => write!(f, "unknown property '{name}'"),
            Self::NotAttached { name } => {
                write!(f, "'{name}' is not an attached property")
            }
            Self::AttachedSyntaxRequired { name } => {
                write!(f, "attached property '{name}' requires Owner.{name} syntax")
            }
            Self::NoConverter { property } => {
                write!(f, "no converter for the value type of '{property}'")
            }
            Self::Parse { property, value } => {
                write!(f, "cannot convert \"{value}\" for property '{property}'")
            }
            Self::Set(err) => write!(f, "set rejected: {err}"),
        }
    }
}

impl core::error::Error for BindError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Set(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SetError> for BindError {
    fn from(err: SetError) -> Self {
        Self::Set(err)
    }
}
