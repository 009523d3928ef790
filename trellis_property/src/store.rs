// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-element sparse property storage.
//!
//! [`PropertyStore`] holds the local (explicitly set) values of one element.
//! Absence of an entry *is* the unset state: there is no stored sentinel, so
//! an explicitly stored `None` of an `Option` value type remains distinct
//! from "never set".
//!
//! # Implementation
//!
//! A sorted vector with binary search rather than a hash map, following the
//! `WinUI` approach:
//!
//! - Better cache locality (contiguous memory)
//! - Lower memory overhead (no hash buckets)
//! - O(log n) lookup, fast for typical property counts (5-20)
//! - Inline storage for small property sets via `SmallVec`

use smallvec::SmallVec;

use crate::id::{Property, PropertyId};
use crate::value::{ErasedValue, PropertyValue};

/// Default inline capacity for property entries.
///
/// Most elements have fewer than 8 non-default properties set, so this avoids
/// heap allocation in the common case.
const INLINE_CAPACITY: usize = 8;

/// Sparse local-value storage for one element.
///
/// # Example
///
/// ```rust
/// use trellis_property::{KindTable, PropertyMetadataBuilder, PropertyRegistry, PropertyStore};
///
/// let mut kinds = KindTable::new();
/// let element = kinds.register("Element", None);
/// let mut registry = PropertyRegistry::new();
/// let width = registry.register("Width", element, PropertyMetadataBuilder::new(0.0_f64).build());
///
/// let mut store = PropertyStore::new();
/// assert!(store.get(width).is_none());
///
/// store.set(width, 100.0);
/// assert_eq!(store.get(width), Some(&100.0));
///
/// // Clearing restores the unset state.
/// assert!(store.clear(width.id()));
/// assert!(store.get(width).is_none());
/// ```
#[derive(Debug, Default, Clone)]
pub struct PropertyStore {
    /// Entries sorted by [`PropertyId`] for binary-search lookup.
    entries: SmallVec<[(PropertyId, ErasedValue); INLINE_CAPACITY]>,
}

impl PropertyStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no properties have local values.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of properties with local values.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    fn find(&self, id: PropertyId) -> Result<usize, usize> {
        self.entries.binary_search_by_key(&id, |(pid, _)| *pid)
    }

    /// Gets the local value, if set.
    #[must_use]
    #[inline]
    pub fn get<T: PropertyValue>(&self, property: Property<T>) -> Option<&T> {
        self.get_erased(property.id())
            .and_then(ErasedValue::downcast_ref)
    }

    /// Gets the local value in erased form, if set.
    #[must_use]
    #[inline]
    pub fn get_erased(&self, id: PropertyId) -> Option<&ErasedValue> {
        self.find(id).ok().map(|idx| &self.entries[idx].1)
    }

    /// Sets the local value.
    ///
    /// This is a raw commit with no validation, coercion, or notification;
    /// those belong to the set-value pipeline of the owning UI.
    pub fn set<T: PropertyValue>(&mut self, property: Property<T>, value: T) {
        self.set_erased(property.id(), ErasedValue::new(value));
    }

    /// Sets the local value from an erased value.
    pub fn set_erased(&mut self, id: PropertyId, value: ErasedValue) {
        match self.find(id) {
            Ok(idx) => self.entries[idx].1 = value,
            Err(idx) => self.entries.insert(idx, (id, value)),
        }
    }

    /// Clears the local value, restoring the unset state.
    ///
    /// Returns `true` if a value was removed.
    pub fn clear(&mut self, id: PropertyId) -> bool {
        if let Ok(idx) = self.find(id) {
            self.entries.remove(idx);
            true
        } else {
            false
        }
    }

    /// Returns `true` if the property has a local value.
    #[must_use]
    #[inline]
    pub fn has(&self, id: PropertyId) -> bool {
        self.find(id).is_ok()
    }

    /// Returns the property IDs with local values, in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = PropertyId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }
}
