// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Property: a WPF-style dependency property system.
//!
//! This crate is the value layer of the Trellis UI toolkit. It provides:
//!
//! - **Identification** ([`PropertyId`], [`Property<T>`]): compact runtime
//!   handles with a typed wrapper. Identity is the handle, not the name, so
//!   same-named properties declared by different kinds stay distinct.
//! - **Kinds** ([`KindId`], [`KindTable`]): an explicit element-kind registry
//!   with single-inheritance base chains, used in place of runtime type
//!   reflection for metadata overrides and name resolution.
//! - **Metadata** ([`PropertyMetadata`], [`Affects`]): default value, layout
//!   invalidation flags, inheritance, and validate/coerce/changed hooks.
//! - **Registry** ([`PropertyRegistry`]): (name, declaring kind)-keyed
//!   registrations, attached properties, and per-kind metadata overrides
//!   resolved along the kind's base chain.
//! - **Storage** ([`PropertyStore`]): sparse sorted-vector local values per
//!   element; absence of an entry is the unset state.
//! - **Resolution** ([`resolve_value`], [`walk_inherited`]): effective-value
//!   lookup through local → inherited → default.
//!
//! ## Quick start
//!
//! ```rust
//! use trellis_property::{
//!     Affects, KindTable, PropertyMetadataBuilder, PropertyRegistry, PropertyStore,
//!     StoreRef, resolve_value,
//! };
//!
//! let mut kinds = KindTable::new();
//! let element = kinds.register("Element", None);
//!
//! let mut registry = PropertyRegistry::new();
//! let font_size = registry.register(
//!     "FontSize",
//!     element,
//!     PropertyMetadataBuilder::new(12.0_f64)
//!         .inherits(true)
//!         .affects(Affects::MEASURE)
//!         .build(),
//! );
//!
//! // One store per element; a root and a leaf.
//! let mut root_store = PropertyStore::new();
//! let leaf_store = PropertyStore::new();
//! root_store.set(font_size, 16.0);
//!
//! // The leaf has no local value and inherits the root's.
//! let lookup = |key: u32| match key {
//!     0 => Some(StoreRef { store: &root_store, parent: None, kind: element }),
//!     1 => Some(StoreRef { store: &leaf_store, parent: Some(0), kind: element }),
//!     _ => None,
//! };
//! assert_eq!(resolve_value(1, font_size, &registry, &kinds, &lookup), 16.0);
//! ```
//!
//! ## Scope
//!
//! This crate knows nothing about trees, layout, or rendering. The element
//! arena lives in `trellis_tree`; the set-value pipeline that routes
//! [`Affects`] flags into layout queues lives in `trellis_layout`.
//!
//! ## Memory notes
//!
//! | Optimization | Description |
//! |--------------|-------------|
//! | Sparse storage | stores only allocate for locally-set properties |
//! | Shared defaults | default values live in the registry, not per element |
//! | Inline storage | `SmallVec` keeps small property sets off the heap |
//! | Compact handles | `PropertyId` and `KindId` are `u16` |
//!
//! ## `no_std` support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod id;
mod kind;
mod metadata;
mod registry;
mod resolve;
mod store;
mod value;

pub use id::{Property, PropertyId};
pub use kind::{KindId, KindRegistration, KindTable};
pub use metadata::{
    Affects, ChangedCallback, CoerceCallback, PropertyMetadata, PropertyMetadataBuilder,
    ValidateCallback,
};
pub use registry::{ErasedMetadata, PropertyRegistration, PropertyRegistry};
pub use resolve::{ParentLookup, StoreRef, resolve_value, resolve_value_erased, walk_inherited};
pub use store::PropertyStore;
pub use value::{ErasedValue, PropertyValue};
