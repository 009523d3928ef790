// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Effective-value resolution.
//!
//! An element's effective value for a property is resolved as:
//!
//! 1. The element's own local value.
//! 2. If the effective metadata says the property inherits: the nearest
//!    ancestor's local value, walking the parent chain.
//! 3. The effective metadata's default value.
//!
//! "Effective metadata" is resolved against the *element's* kind (see
//! [`PropertyRegistry::metadata_for`]), so a kind-level metadata override
//! changes the default an instance observes.
//!
//! Resolution is expressed over a [`ParentLookup`] so any tree representation
//! can participate; closures implement the trait directly.

use crate::id::{Property, PropertyId};
use crate::kind::{KindId, KindTable};
use crate::registry::PropertyRegistry;
use crate::store::PropertyStore;
use crate::value::{ErasedValue, PropertyValue};

/// One element's store, parent link, and kind, as seen by resolution.
#[derive(Copy, Clone, Debug)]
pub struct StoreRef<'a, K> {
    /// The element's local-value store.
    pub store: &'a PropertyStore,
    /// The element's parent, if attached.
    pub parent: Option<K>,
    /// The element's kind.
    pub kind: KindId,
}

/// A lookup from element key to its [`StoreRef`].
///
/// Implemented by closures:
///
/// ```rust
/// use trellis_property::{KindTable, ParentLookup, PropertyStore, StoreRef};
///
/// let mut kinds = KindTable::new();
/// let element = kinds.register("Element", None);
/// let store = PropertyStore::new();
///
/// let lookup = |key: u32| {
///     (key == 1).then_some(StoreRef { store: &store, parent: None, kind: element })
/// };
/// assert!(lookup.lookup(1).is_some());
/// assert!(lookup.lookup(2).is_none());
/// ```
pub trait ParentLookup<'a, K: Copy + 'a> {
    /// Looks up the store, parent, and kind for `key`.
    fn lookup(&self, key: K) -> Option<StoreRef<'a, K>>;
}

impl<'a, K, F> ParentLookup<'a, K> for F
where
    K: Copy + 'a,
    F: Fn(K) -> Option<StoreRef<'a, K>>,
{
    #[inline]
    fn lookup(&self, key: K) -> Option<StoreRef<'a, K>> {
        self(key)
    }
}

/// Resolves the effective value of `property` for the element at `key`.
///
/// # Panics
///
/// Panics if `key` cannot be looked up, if the property is not registered, or
/// if its value type is not `T`.
#[must_use]
pub fn resolve_value<'a, K, T, F>(
    key: K,
    property: Property<T>,
    registry: &PropertyRegistry,
    kinds: &KindTable,
    lookup: &F,
) -> T
where
    K: Copy + 'a,
    T: PropertyValue,
    F: ParentLookup<'a, K> + ?Sized,
{
    let entry = lookup
        .lookup(key)
        .unwrap_or_else(|| panic!("cannot resolve properties of an unknown element"));

    if let Some(value) = entry.store.get(property) {
        return value.clone();
    }

    let metadata = registry.metadata_for(property, entry.kind, kinds);
    if metadata.inherits()
        && let Some(value) = walk_inherited(entry.parent, property, lookup)
    {
        return value;
    }
    metadata.default_value().clone()
}

/// Resolves the effective value of a property in erased form.
///
/// Same resolution order as [`resolve_value`].
///
/// # Panics
///
/// Panics if `key` cannot be looked up or the property is not registered.
#[must_use]
pub fn resolve_value_erased<'a, K, F>(
    key: K,
    property: PropertyId,
    registry: &PropertyRegistry,
    kinds: &KindTable,
    lookup: &F,
) -> ErasedValue
where
    K: Copy + 'a,
    F: ParentLookup<'a, K> + ?Sized,
{
    let entry = lookup
        .lookup(key)
        .unwrap_or_else(|| panic!("cannot resolve properties of an unknown element"));

    if let Some(value) = entry.store.get_erased(property) {
        return value.clone();
    }

    let metadata = registry.erased_metadata_for(property, entry.kind, kinds);
    if metadata.inherits() {
        let mut current = entry.parent;
        while let Some(key) = current {
            let Some(ancestor) = lookup.lookup(key) else {
                break;
            };
            if let Some(value) = ancestor.store.get_erased(property) {
                return value.clone();
            }
            current = ancestor.parent;
        }
    }
    metadata.default_erased()
}

/// Walks the parent chain looking for an inherited local value.
///
/// Returns the first value found, or `None` if no ancestor has the property
/// set. This does not consult metadata; callers check `inherits` first.
#[must_use]
pub fn walk_inherited<'a, K, T, F>(
    mut current: Option<K>,
    property: Property<T>,
    lookup: &F,
) -> Option<T>
where
    K: Copy + 'a,
    T: PropertyValue,
    F: ParentLookup<'a, K> + ?Sized,
{
    while let Some(key) = current {
        let entry = lookup.lookup(key)?;
        if let Some(value) = entry.store.get(property) {
            return Some(value.clone());
        }
        current = entry.parent;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::PropertyMetadataBuilder;
    use alloc::vec::Vec;

    struct Flat {
        stores: Vec<PropertyStore>,
        parents: Vec<Option<usize>>,
        kinds_of: Vec<KindId>,
    }

    fn chain(kind: KindId, len: usize) -> Flat {
        Flat {
            stores: (0..len).map(|_| PropertyStore::new()).collect(),
            parents: (0..len).map(|i| i.checked_sub(1)).collect(),
            kinds_of: (0..len).map(|_| kind).collect(),
        }
    }

    /// Builds a [`ParentLookup`] closure over a [`Flat`] tree.
    macro_rules! lookup {
        ($tree:expr) => {
            |key: usize| {
                let store = $tree.stores.get(key)?;
                Some(StoreRef {
                    store,
                    parent: *$tree.parents.get(key)?,
                    kind: *$tree.kinds_of.get(key)?,
                })
            }
        };
    }

    #[test]
    fn local_wins() {
        let mut kinds = KindTable::new();
        let element = kinds.register("Element", None);
        let mut registry = PropertyRegistry::new();
        let font_size = registry.register(
            "FontSize",
            element,
            PropertyMetadataBuilder::new(12.0_f64).inherits(true).build(),
        );

        let mut tree = chain(element, 2);
        tree.stores[0].set(font_size, 16.0);
        tree.stores[1].set(font_size, 20.0);

        let value = resolve_value(1, font_size, &registry, &kinds, &lookup!(tree));
        assert_eq!(value, 20.0);
    }

    #[test]
    fn inherits_from_nearest_ancestor() {
        let mut kinds = KindTable::new();
        let element = kinds.register("Element", None);
        let mut registry = PropertyRegistry::new();
        let font_size = registry.register(
            "FontSize",
            element,
            PropertyMetadataBuilder::new(12.0_f64).inherits(true).build(),
        );

        // Root sets 16, middle sets 14, leaf is unset: nearest (14) wins.
        let mut tree = chain(element, 3);
        tree.stores[0].set(font_size, 16.0);
        tree.stores[1].set(font_size, 14.0);

        let value = resolve_value(2, font_size, &registry, &kinds, &lookup!(tree));
        assert_eq!(value, 14.0);
    }

    #[test]
    fn falls_back_to_default() {
        let mut kinds = KindTable::new();
        let element = kinds.register("Element", None);
        let mut registry = PropertyRegistry::new();
        let font_size = registry.register(
            "FontSize",
            element,
            PropertyMetadataBuilder::new(12.0_f64).inherits(true).build(),
        );

        let tree = chain(element, 3);
        let value = resolve_value(2, font_size, &registry, &kinds, &lookup!(tree));
        assert_eq!(value, 12.0);
    }

    #[test]
    fn non_inheriting_ignores_ancestors() {
        let mut kinds = KindTable::new();
        let element = kinds.register("Element", None);
        let mut registry = PropertyRegistry::new();
        let width = registry.register(
            "Width",
            element,
            PropertyMetadataBuilder::new(100.0_f64).build(),
        );

        let mut tree = chain(element, 2);
        tree.stores[0].set(width, 200.0);

        let value = resolve_value(1, width, &registry, &kinds, &lookup!(tree));
        assert_eq!(value, 100.0);
    }

    #[test]
    fn override_changes_observed_default() {
        let mut kinds = KindTable::new();
        let element = kinds.register("Element", None);
        let label = kinds.register("Label", Some(element));
        let mut registry = PropertyRegistry::new();
        let font_size = registry.register(
            "FontSize",
            element,
            PropertyMetadataBuilder::new(12.0_f64).build(),
        );
        registry.override_metadata(font_size, label, PropertyMetadataBuilder::new(10.0_f64).build());

        let mut tree = chain(element, 2);
        tree.kinds_of[1] = label;

        assert_eq!(
            resolve_value(0, font_size, &registry, &kinds, &lookup!(tree)),
            12.0
        );
        assert_eq!(
            resolve_value(1, font_size, &registry, &kinds, &lookup!(tree)),
            10.0
        );
    }

    #[test]
    fn erased_matches_typed() {
        let mut kinds = KindTable::new();
        let element = kinds.register("Element", None);
        let mut registry = PropertyRegistry::new();
        let font_size = registry.register(
            "FontSize",
            element,
            PropertyMetadataBuilder::new(12.0_f64).inherits(true).build(),
        );

        let mut tree = chain(element, 3);
        tree.stores[0].set(font_size, 18.0);

        let erased = resolve_value_erased(2, font_size.id(), &registry, &kinds, &lookup!(tree));
        assert_eq!(erased.downcast_ref::<f64>(), Some(&18.0));
    }
}
