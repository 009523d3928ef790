// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property metadata definitions.
//!
//! [`PropertyMetadata`] holds a property's configuration: its default value,
//! the layout work a change triggers ([`Affects`]), whether the value inherits
//! down the element tree, and optional validation, coercion, and
//! changed-notification hooks. [`PropertyMetadataBuilder`] provides ergonomic
//! construction.

use alloc::boxed::Box;

use crate::value::PropertyValue;

bitflags::bitflags! {
    /// Layout invalidation triggered by a change to a property.
    ///
    /// `PARENT_MEASURE` and `PARENT_ARRANGE` invalidate the owning element's
    /// parent instead of the element itself (a no-op on detached roots).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Affects: u8 {
        /// The owning element must be re-measured.
        const MEASURE = 1 << 0;
        /// The owning element must be re-arranged.
        const ARRANGE = 1 << 1;
        /// The owning element's parent must be re-measured.
        const PARENT_MEASURE = 1 << 2;
        /// The owning element's parent must be re-arranged.
        const PARENT_ARRANGE = 1 << 3;
    }
}

/// Callback invoked after a property value change is committed.
///
/// Receives the prior effective value (if one could be resolved) and the new
/// value.
pub type ChangedCallback<T> = Box<dyn Fn(Option<&T>, &T) + Send + Sync>;

/// Callback for coercing an otherwise-valid value before it is stored.
///
/// Coercion corrects a value (clamping, snapping); rejection is the job of
/// [`ValidateCallback`].
pub type CoerceCallback<T> = Box<dyn Fn(T) -> T + Send + Sync>;

/// Callback for validating a proposed value.
///
/// Returning `false` rejects the set outright; nothing is committed and no
/// other hook runs.
pub type ValidateCallback<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Metadata for a dependency property.
///
/// # Example
///
/// ```rust
/// use trellis_property::{Affects, PropertyMetadataBuilder};
///
/// let metadata = PropertyMetadataBuilder::new(12.0_f64)
///     .inherits(true)
///     .affects(Affects::MEASURE)
///     .validate(|v: &f64| v.is_finite())
///     .coerce(|v: f64| v.max(0.0))
///     .build();
///
/// assert_eq!(metadata.default_value(), &12.0);
/// assert!(metadata.inherits());
/// assert!(metadata.validate(&1.0));
/// assert!(!metadata.validate(&f64::NAN));
/// assert_eq!(metadata.coerce(-3.0), 0.0);
/// ```
pub struct PropertyMetadata<T: PropertyValue> {
    default_value: T,
    inherits: bool,
    affects: Affects,
    validate: Option<ValidateCallback<T>>,
    coerce: Option<CoerceCallback<T>>,
    changed: Option<ChangedCallback<T>>,
}

impl<T: PropertyValue> PropertyMetadata<T> {
    /// Creates metadata with the given default value and no other behavior.
    #[must_use]
    pub fn new(default_value: T) -> Self {
        Self {
            default_value,
            inherits: false,
            affects: Affects::empty(),
            validate: None,
            coerce: None,
            changed: None,
        }
    }

    /// Returns a reference to the default value.
    #[must_use]
    #[inline]
    pub fn default_value(&self) -> &T {
        &self.default_value
    }

    /// Returns whether this property inherits from ancestor elements.
    #[must_use]
    #[inline]
    pub fn inherits(&self) -> bool {
        self.inherits
    }

    /// Returns the layout invalidation flags for this property.
    #[must_use]
    #[inline]
    pub fn affects(&self) -> Affects {
        self.affects
    }

    /// Validates a proposed value.
    ///
    /// Returns `true` when no validate callback is set.
    #[must_use]
    #[inline]
    pub fn validate(&self, value: &T) -> bool {
        self.validate.as_ref().is_none_or(|callback| callback(value))
    }

    /// Coerces a value using the coerce callback if one is set.
    #[inline]
    #[must_use]
    pub fn coerce(&self, value: T) -> T {
        match &self.coerce {
            Some(callback) => callback(value),
            None => value,
        }
    }

    /// Invokes the changed callback if one is set.
    #[inline]
    pub fn on_changed(&self, old_value: Option<&T>, new_value: &T) {
        if let Some(callback) = &self.changed {
            callback(old_value, new_value);
        }
    }

    /// Returns whether a changed callback is set.
    #[must_use]
    #[inline]
    pub fn has_changed_callback(&self) -> bool {
        self.changed.is_some()
    }
}

// Manual Debug impl since callbacks aren't Debug.
impl<T: PropertyValue + core::fmt::Debug> core::fmt::Debug for PropertyMetadata<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PropertyMetadata")
            .field("default_value", &self.default_value)
            .field("inherits", &self.inherits)
            .field("affects", &self.affects)
            .field("has_validate", &self.validate.is_some())
            .field("has_coerce", &self.coerce.is_some())
            .field("has_changed", &self.changed.is_some())
            .finish()
    }
}

/// Builder for [`PropertyMetadata`].
pub struct PropertyMetadataBuilder<T: PropertyValue> {
    metadata: PropertyMetadata<T>,
}

impl<T: PropertyValue + core::fmt::Debug> core::fmt::Debug for PropertyMetadataBuilder<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PropertyMetadataBuilder")
            .field("metadata", &self.metadata)
            .finish()
    }
}

impl<T: PropertyValue> PropertyMetadataBuilder<T> {
    /// Creates a new builder with the given default value.
    #[must_use]
    pub fn new(default_value: T) -> Self {
        Self {
            metadata: PropertyMetadata::new(default_value),
        }
    }

    /// Sets whether this property inherits from ancestor elements.
    ///
    /// When `true`, resolving an unset value walks the parent chain before
    /// falling back to the default.
    #[must_use]
    pub fn inherits(mut self, inherits: bool) -> Self {
        self.metadata.inherits = inherits;
        self
    }

    /// Sets the layout invalidation flags raised when the property changes.
    #[must_use]
    pub fn affects(mut self, affects: Affects) -> Self {
        self.metadata.affects = affects;
        self
    }

    /// Sets a callback that rejects invalid values.
    #[must_use]
    pub fn validate<F>(mut self, callback: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.metadata.validate = Some(Box::new(callback));
        self
    }

    /// Sets a callback that corrects values before they are stored.
    #[must_use]
    pub fn coerce<F>(mut self, callback: F) -> Self
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        self.metadata.coerce = Some(Box::new(callback));
        self
    }

    /// Sets a callback invoked after a change is committed.
    #[must_use]
    pub fn on_changed<F>(mut self, callback: F) -> Self
    where
        F: Fn(Option<&T>, &T) + Send + Sync + 'static,
    {
        self.metadata.changed = Some(Box::new(callback));
        self
    }

    /// Builds the [`PropertyMetadata`].
    #[must_use]
    pub fn build(self) -> PropertyMetadata<T> {
        self.metadata
    }
}
