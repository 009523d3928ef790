// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property identification types.
//!
//! [`PropertyId`] is the runtime identity of a property; [`Property<T>`] wraps
//! it with the property's value type for compile-time checked access.
//!
//! Identity is the handle, not the name: two properties registered under the
//! same name by different declaring kinds receive distinct [`PropertyId`]s and
//! never compare equal.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

/// A runtime property identifier.
///
/// A lightweight `u16` handle that uniquely identifies a registration within a
/// [`PropertyRegistry`](crate::PropertyRegistry). Up to 65,536 properties can
/// be registered while keeping per-object storage compact.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyId(u16);

impl PropertyId {
    /// Creates a new property ID from the given index.
    ///
    /// Typically called by [`PropertyRegistry::register`](crate::PropertyRegistry::register)
    /// rather than directly.
    #[must_use]
    #[inline]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Returns the underlying index of this property ID.
    #[must_use]
    #[inline]
    pub const fn index(self) -> u16 {
        self.0
    }
}

impl fmt::Debug for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PropertyId").field(&self.0).finish()
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyId({})", self.0)
    }
}

/// A typed property key.
///
/// Wraps a [`PropertyId`] with a phantom value type so that gets and sets are
/// checked at compile time. Same size as `PropertyId` (2 bytes).
///
/// # Example
///
/// ```rust
/// use trellis_property::{KindTable, Property, PropertyMetadataBuilder, PropertyRegistry};
///
/// let mut kinds = KindTable::new();
/// let element = kinds.register("Element", None);
///
/// let mut registry = PropertyRegistry::new();
/// let width: Property<f64> = registry.register(
///     "Width",
///     element,
///     PropertyMetadataBuilder::new(0.0_f64).build(),
/// );
/// assert_eq!(width.id().index(), 0);
/// ```
pub struct Property<T> {
    id: PropertyId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Property<T> {
    /// Creates a typed property from a property ID.
    ///
    /// Typically called by the registry. The caller must ensure the
    /// `PropertyId` was registered with value type `T`; mismatched types
    /// cause panics at lookup time.
    #[must_use]
    #[inline]
    pub const fn from_id(id: PropertyId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    /// Returns the underlying property ID.
    #[must_use]
    #[inline]
    pub const fn id(self) -> PropertyId {
        self.id
    }
}

// Manual trait implementations to avoid requiring T: Clone, etc.

impl<T> Copy for Property<T> {}

impl<T> Clone for Property<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for Property<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Property<T> {}

impl<T> Hash for Property<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("id", &self.id)
            .field("type", &core::any::type_name::<T>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn property_id_basics() {
        let id = PropertyId::new(42);
        assert_eq!(id.index(), 42);
        assert_eq!(id, PropertyId::new(42));
        assert_ne!(id, PropertyId::new(43));
    }

    #[test]
    fn property_id_display() {
        assert_eq!(format!("{}", PropertyId::new(7)), "PropertyId(7)");
    }

    #[test]
    fn property_copy_and_eq() {
        let prop: Property<f64> = Property::from_id(PropertyId::new(1));
        let copy = prop;
        assert_eq!(prop, copy);
    }

    #[test]
    fn property_is_compact() {
        use core::mem::size_of;
        assert_eq!(size_of::<PropertyId>(), 2);
        assert_eq!(size_of::<Property<alloc::string::String>>(), 2);
    }
}
