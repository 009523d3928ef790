// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element kind registry.
//!
//! A [`KindId`] is a compact tag identifying a kind of element (`"Element"`,
//! `"StackPanel"`, ...). Kinds form an explicit single-inheritance chain: each
//! kind may name one base kind, registered earlier. The chain is what property
//! metadata overrides and property-name resolution walk, in place of runtime
//! type reflection.
//!
//! The table is an owned value, not a global: each UI instance builds its own,
//! which keeps tests hermetic.

use alloc::vec::Vec;
use core::fmt;
use hashbrown::HashMap;

/// A compact tag identifying an element kind.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KindId(u16);

impl KindId {
    /// Creates a kind ID from the given index.
    ///
    /// Typically called by [`KindTable::register`] rather than directly.
    #[must_use]
    #[inline]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Returns the underlying index of this kind ID.
    #[must_use]
    #[inline]
    pub const fn index(self) -> u16 {
        self.0
    }
}

impl fmt::Debug for KindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("KindId").field(&self.0).finish()
    }
}

/// A registration entry for an element kind.
#[derive(Debug, Clone)]
pub struct KindRegistration {
    name: &'static str,
    base: Option<KindId>,
}

impl KindRegistration {
    /// Returns the kind name.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the base kind, if any.
    #[must_use]
    #[inline]
    pub fn base(&self) -> Option<KindId> {
        self.base
    }
}

/// Registry of element kinds and their base-kind chains.
///
/// # Example
///
/// ```rust
/// use trellis_property::KindTable;
///
/// let mut kinds = KindTable::new();
/// let element = kinds.register("Element", None);
/// let panel = kinds.register("Panel", Some(element));
/// let stack = kinds.register("StackPanel", Some(panel));
///
/// assert!(kinds.is_a(stack, element));
/// assert!(kinds.is_a(stack, stack));
/// assert!(!kinds.is_a(element, panel));
/// assert_eq!(kinds.by_name("StackPanel"), Some(stack));
/// ```
#[derive(Debug, Default, Clone)]
pub struct KindTable {
    kinds: Vec<KindRegistration>,
    by_name: HashMap<&'static str, KindId>,
}

impl KindTable {
    /// Creates a new empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new kind with an optional base kind.
    ///
    /// The base must already be registered, which makes cycles in the chain
    /// unrepresentable.
    ///
    /// # Panics
    ///
    /// Panics if a kind with the same name is already registered, if the base
    /// kind is unknown, or if more than 65,536 kinds are registered.
    pub fn register(&mut self, name: &'static str, base: Option<KindId>) -> KindId {
        assert!(
            !self.by_name.contains_key(name),
            "kind '{name}' is already registered"
        );
        assert!(
            self.kinds.len() < u16::MAX as usize,
            "too many kinds registered (max {})",
            u16::MAX
        );
        if let Some(base) = base {
            assert!(
                (base.index() as usize) < self.kinds.len(),
                "base kind {base:?} is not registered"
            );
        }

        #[expect(clippy::cast_possible_truncation, reason = "checked above")]
        let id = KindId::new(self.kinds.len() as u16);
        self.kinds.push(KindRegistration { name, base });
        self.by_name.insert(name, id);
        id
    }

    /// Returns the number of registered kinds.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Returns `true` if no kinds are registered.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Looks up a kind by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<KindId> {
        self.by_name.get(name).copied()
    }

    /// Returns the name of a kind.
    #[must_use]
    pub fn name(&self, kind: KindId) -> Option<&'static str> {
        self.kinds.get(kind.index() as usize).map(|r| r.name)
    }

    /// Returns the base kind of a kind, or `None` for a root kind.
    #[must_use]
    pub fn base_of(&self, kind: KindId) -> Option<KindId> {
        self.kinds.get(kind.index() as usize).and_then(|r| r.base)
    }

    /// Returns `true` if `kind` is `ancestor` or derives from it.
    ///
    /// Reflexive and transitive; `false` for unregistered kinds.
    #[must_use]
    pub fn is_a(&self, kind: KindId, ancestor: KindId) -> bool {
        self.self_and_ancestors(kind).any(|k| k == ancestor)
    }

    /// Iterates over `kind` followed by its base chain, nearest first.
    pub fn self_and_ancestors(&self, kind: KindId) -> impl Iterator<Item = KindId> + '_ {
        let mut current = if (kind.index() as usize) < self.kinds.len() {
            Some(kind)
        } else {
            None
        };
        core::iter::from_fn(move || {
            let kind = current?;
            current = self.base_of(kind);
            Some(kind)
        })
    }

    /// Returns an iterator over all registered kinds.
    pub fn iter(&self) -> impl Iterator<Item = (KindId, &KindRegistration)> {
        self.kinds.iter().enumerate().map(|(i, r)| {
            #[expect(clippy::cast_possible_truncation, reason = "index < len < u16::MAX")]
            (KindId::new(i as u16), r)
        })
    }
}
