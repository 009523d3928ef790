// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cascaded property writes.
//!
//! Changed-callbacks and behavior hooks must not reenter the set-value
//! pipeline; instead they queue follow-up writes here. The UI drains the
//! queue iteratively right after the triggering write, so cascades coalesce
//! within the frame, and bounds the drain at [`MAX_CASCADE_ROUNDS`] rounds so
//! a self-perpetuating cascade terminates with an error instead of looping.

use alloc::vec::Vec;
use core::mem;

use trellis_property::{ErasedValue, Property, PropertyId, PropertyValue};
use trellis_tree::ElementId;

/// Maximum number of cascade rounds drained for one triggering write.
///
/// Each round applies every write queued by the previous round. Well-behaved
/// cascades (a container pushing its padding onto a presenter child's margin)
/// settle in one or two rounds; hitting the bound reports
/// `SetError::CascadeOverflow` and drops the remaining queue.
pub const MAX_CASCADE_ROUNDS: usize = 32;

/// A queued property write.
#[derive(Clone, Debug)]
pub struct PendingWrite {
    /// The element to write to.
    pub target: ElementId,
    /// The property to write.
    pub property: PropertyId,
    /// The value, erased.
    pub value: ErasedValue,
}

/// A queue of property writes raised by change hooks.
#[derive(Debug, Default)]
pub struct CascadeQueue {
    writes: Vec<PendingWrite>,
}

impl CascadeQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a typed write.
    pub fn push<T: PropertyValue>(&mut self, target: ElementId, property: Property<T>, value: T) {
        self.push_erased(target, property.id(), ErasedValue::new(value));
    }

    /// Queues an erased write.
    pub fn push_erased(&mut self, target: ElementId, property: PropertyId, value: ErasedValue) {
        self.writes.push(PendingWrite {
            target,
            property,
            value,
        });
    }

    /// Returns `true` if no writes are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Returns the number of queued writes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Takes the queued writes, leaving the queue empty.
    pub fn take(&mut self) -> Vec<PendingWrite> {
        mem::take(&mut self.writes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_property::{KindTable, PropertyMetadataBuilder, PropertyRegistry};
    use trellis_tree::ElementTree;

    #[test]
    fn push_and_take() {
        let mut kinds = KindTable::new();
        let element = kinds.register("Element", None);
        let mut registry = PropertyRegistry::new();
        let width = registry.register("Width", element, PropertyMetadataBuilder::new(0.0_f64).build());

        let mut tree = ElementTree::new();
        let id = tree.insert(element);

        let mut queue = CascadeQueue::new();
        assert!(queue.is_empty());

        queue.push(id, width, 10.0);
        queue.push_erased(id, width.id(), ErasedValue::new(20.0_f64));
        assert_eq!(queue.len(), 2);

        let writes = queue.take();
        assert!(queue.is_empty());
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0].property, width.id());
        assert_eq!(writes[0].value.downcast_ref::<f64>(), Some(&10.0));
        assert_eq!(writes[1].value.downcast_ref::<f64>(), Some(&20.0));
    }
}
