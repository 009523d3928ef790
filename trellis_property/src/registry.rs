// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property registry.
//!
//! [`PropertyRegistry`] owns every property registration. Registrations are
//! keyed by (name, declaring kind), so two kinds can each declare a `"Width"`
//! without colliding; the returned handles are distinct.
//!
//! Metadata can be overridden per kind without creating a new identifier:
//! [`PropertyRegistry::override_metadata`] attaches an alternate record for a
//! subkind, and [`PropertyRegistry::metadata_for`] resolves the effective
//! record by walking the kind's base chain, nearest first, before falling
//! back to the declaring registration.
//!
//! The registry is an owned value, constructed per UI instance. There is no
//! global static table to poison between tests.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use hashbrown::HashMap;

use crate::id::{Property, PropertyId};
use crate::kind::{KindId, KindTable};
use crate::metadata::{Affects, PropertyMetadata};
use crate::value::{ErasedValue, PropertyValue};

/// A registration entry for a property.
pub struct PropertyRegistration {
    name: &'static str,
    owner: KindId,
    type_id: TypeId,
    attached: bool,
    metadata: Box<dyn ErasedMetadata>,
}

impl PropertyRegistration {
    /// Returns the property name.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the declaring kind.
    #[must_use]
    #[inline]
    pub fn owner(&self) -> KindId {
        self.owner
    }

    /// Returns the [`TypeId`] of the property's value type.
    #[must_use]
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns whether this is an attached property, settable on any element.
    #[must_use]
    #[inline]
    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

impl core::fmt::Debug for PropertyRegistration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PropertyRegistration")
            .field("name", &self.name)
            .field("owner", &self.owner)
            .field("type_id", &self.type_id)
            .field("attached", &self.attached)
            .finish_non_exhaustive()
    }
}

/// A registry of dependency properties.
///
/// # Example
///
/// ```rust
/// use trellis_property::{
///     Affects, KindTable, PropertyMetadataBuilder, PropertyRegistry,
/// };
///
/// let mut kinds = KindTable::new();
/// let element = kinds.register("Element", None);
/// let slider = kinds.register("Slider", Some(element));
///
/// let mut registry = PropertyRegistry::new();
/// let font_size = registry.register(
///     "FontSize",
///     element,
///     PropertyMetadataBuilder::new(12.0_f64).inherits(true).build(),
/// );
///
/// // Sliders get a bigger default without a new identifier.
/// registry.override_metadata(
///     font_size,
///     slider,
///     PropertyMetadataBuilder::new(16.0_f64).inherits(true).build(),
/// );
///
/// assert_eq!(
///     registry.metadata_for(font_size, element, &kinds).default_value(),
///     &12.0
/// );
/// assert_eq!(
///     registry.metadata_for(font_size, slider, &kinds).default_value(),
///     &16.0
/// );
/// ```
#[derive(Default)]
pub struct PropertyRegistry {
    properties: Vec<PropertyRegistration>,
    by_owner_name: HashMap<(KindId, &'static str), PropertyId>,
    overrides: HashMap<(PropertyId, KindId), Box<dyn ErasedMetadata>>,
}

impl PropertyRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new property declared by `owner`.
    ///
    /// Returns a typed [`Property<T>`] handle.
    ///
    /// # Panics
    ///
    /// Panics if `owner` already declares a property with this name, or if
    /// more than 65,536 properties are registered.
    pub fn register<T: PropertyValue>(
        &mut self,
        name: &'static str,
        owner: KindId,
        metadata: PropertyMetadata<T>,
    ) -> Property<T> {
        self.register_inner(name, owner, metadata, false)
    }

    /// Registers a new attached property declared by `owner`.
    ///
    /// An attached property is settable on any element, not only instances of
    /// its declaring kind (for example a panel annotating its children).
    /// Binding layers must address it with the dotted `Owner.Name` form.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`register`](Self::register).
    pub fn register_attached<T: PropertyValue>(
        &mut self,
        name: &'static str,
        owner: KindId,
        metadata: PropertyMetadata<T>,
    ) -> Property<T> {
        self.register_inner(name, owner, metadata, true)
    }

    fn register_inner<T: PropertyValue>(
        &mut self,
        name: &'static str,
        owner: KindId,
        metadata: PropertyMetadata<T>,
        attached: bool,
    ) -> Property<T> {
        assert!(
            !self.by_owner_name.contains_key(&(owner, name)),
            "property '{name}' is already registered for kind {owner:?}"
        );
        assert!(
            self.properties.len() < u16::MAX as usize,
            "too many properties registered (max {})",
            u16::MAX
        );

        #[expect(clippy::cast_possible_truncation, reason = "checked above")]
        let id = PropertyId::new(self.properties.len() as u16);

        self.properties.push(PropertyRegistration {
            name,
            owner,
            type_id: TypeId::of::<T>(),
            attached,
            metadata: Box::new(metadata),
        });
        self.by_owner_name.insert((owner, name), id);

        Property::from_id(id)
    }

    /// Attaches alternate metadata for instances of `kind` (and its subkinds)
    /// without creating a new identifier.
    ///
    /// # Panics
    ///
    /// Panics if the property is not registered, if an override for this
    /// (property, kind) pair already exists, or if the override's value type
    /// differs from the registration's.
    pub fn override_metadata<T: PropertyValue>(
        &mut self,
        property: Property<T>,
        kind: KindId,
        metadata: PropertyMetadata<T>,
    ) {
        let registration = self
            .properties
            .get(property.id().index() as usize)
            .unwrap_or_else(|| panic!("property {:?} is not registered", property.id()));
        assert!(
            registration.type_id == TypeId::of::<T>(),
            "override value type does not match registration of '{}'",
            registration.name
        );
        let prior = self
            .overrides
            .insert((property.id(), kind), Box::new(metadata));
        assert!(
            prior.is_none(),
            "metadata for '{}' is already overridden for kind {kind:?}",
            registration.name
        );
    }

    /// Returns the number of registered properties.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns `true` if no properties are registered.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Returns the registration for a property.
    #[must_use]
    pub fn get(&self, id: PropertyId) -> Option<&PropertyRegistration> {
        self.properties.get(id.index() as usize)
    }

    /// Returns the name of a property.
    #[must_use]
    pub fn name(&self, id: PropertyId) -> Option<&'static str> {
        self.get(id).map(|r| r.name)
    }

    /// Looks up a property declared directly by `owner` under `name`.
    #[must_use]
    pub fn declared(&self, owner: KindId, name: &str) -> Option<PropertyId> {
        self.by_owner_name.get(&(owner, name)).copied()
    }

    /// Resolves a property name against a kind's base chain.
    ///
    /// Walks `kind` and its ancestors, nearest first, returning the first
    /// declaration of `name`. This is instance-property resolution; attached
    /// properties are found too when `kind` derives from their declaring kind,
    /// and callers that must reject them can check
    /// [`PropertyRegistration::is_attached`].
    #[must_use]
    pub fn resolve(&self, kind: KindId, name: &str, kinds: &KindTable) -> Option<PropertyId> {
        kinds
            .self_and_ancestors(kind)
            .find_map(|k| self.declared(k, name))
    }

    /// Returns the effective metadata for a property on an instance of `kind`.
    ///
    /// Resolution order: an override registered for `kind`, else for the
    /// nearest ancestor kind with one, else the declaring registration's
    /// metadata.
    ///
    /// # Panics
    ///
    /// Panics if the property is not registered or its value type is not `T`.
    #[must_use]
    pub fn metadata_for<T: PropertyValue>(
        &self,
        property: Property<T>,
        kind: KindId,
        kinds: &KindTable,
    ) -> &PropertyMetadata<T> {
        self.erased_metadata_for(property.id(), kind, kinds)
            .as_any()
            .downcast_ref()
            .unwrap_or_else(|| {
                panic!(
                    "property {:?} is not of type {}",
                    property.id(),
                    core::any::type_name::<T>()
                )
            })
    }

    /// Returns the effective metadata for a property in type-erased form.
    ///
    /// Same resolution order as [`metadata_for`](Self::metadata_for).
    ///
    /// # Panics
    ///
    /// Panics if the property is not registered.
    #[must_use]
    pub fn erased_metadata_for(
        &self,
        id: PropertyId,
        kind: KindId,
        kinds: &KindTable,
    ) -> &dyn ErasedMetadata {
        for k in kinds.self_and_ancestors(kind) {
            if let Some(metadata) = self.overrides.get(&(id, k)) {
                return metadata.as_ref();
            }
        }
        self.properties
            .get(id.index() as usize)
            .map(|r| r.metadata.as_ref())
            .unwrap_or_else(|| panic!("property {id:?} is not registered"))
    }

    /// Returns an iterator over all registered properties.
    pub fn iter(&self) -> impl Iterator<Item = (PropertyId, &PropertyRegistration)> {
        self.properties.iter().enumerate().map(|(i, r)| {
            #[expect(clippy::cast_possible_truncation, reason = "index < len < u16::MAX")]
            (PropertyId::new(i as u16), r)
        })
    }
}

impl core::fmt::Debug for PropertyRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PropertyRegistry")
            .field("count", &self.properties.len())
            .field("overrides", &self.overrides.len())
            .finish_non_exhaustive()
    }
}

/// Type-erased metadata, for callers that work with [`PropertyId`]s.
///
/// The binding layer and the cascade queue operate on erased values; this
/// trait exposes the metadata hooks in erased form so the full set-value
/// pipeline (validate, coerce, compare, notify) runs without the concrete
/// value type in scope.
pub trait ErasedMetadata: Any {
    /// Upcast for typed downcasting.
    fn as_any(&self) -> &dyn Any;

    /// The layout invalidation flags.
    fn affects(&self) -> Affects;

    /// Whether the property inherits down the element tree.
    fn inherits(&self) -> bool;

    /// The [`TypeId`] of the value type.
    fn value_type(&self) -> TypeId;

    /// The default value, erased.
    fn default_erased(&self) -> ErasedValue;

    /// Validates an erased value.
    ///
    /// Returns `false` for a value of the wrong type.
    fn validate_erased(&self, value: &ErasedValue) -> bool;

    /// Coerces an erased value.
    ///
    /// Values of the wrong type are returned unchanged; callers are expected
    /// to have checked [`value_type`](Self::value_type) first.
    fn coerce_erased(&self, value: ErasedValue) -> ErasedValue;

    /// Invokes the changed callback on erased values of the right type.
    fn changed_erased(&self, old_value: Option<&ErasedValue>, new_value: &ErasedValue);
}

impl<T: PropertyValue> ErasedMetadata for PropertyMetadata<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn affects(&self) -> Affects {
        Self::affects(self)
    }

    fn inherits(&self) -> bool {
        Self::inherits(self)
    }

    fn value_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn default_erased(&self) -> ErasedValue {
        ErasedValue::new(self.default_value().clone())
    }

    fn validate_erased(&self, value: &ErasedValue) -> bool {
        value.downcast_ref::<T>().is_some_and(|v| self.validate(v))
    }

    fn coerce_erased(&self, value: ErasedValue) -> ErasedValue {
        match value.downcast::<T>() {
            Ok(v) => ErasedValue::new(self.coerce(v)),
            Err(value) => value,
        }
    }

    fn changed_erased(&self, old_value: Option<&ErasedValue>, new_value: &ErasedValue) {
        if let Some(new_value) = new_value.downcast_ref::<T>() {
            let old_value = old_value.and_then(ErasedValue::downcast_ref);
            self.on_changed(old_value, new_value);
        }
    }
}
