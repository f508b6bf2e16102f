//! Dense slot allocation for sell orders.

use rustc_hash::FxHashMap;

use crate::types::OrderId;

/// Hands out tournament slots to the sell orders of one symbol.
///
/// Ordinals are 0, 1, 2, ... in first-insert order and stay with their order
/// for the life of the allocator, so the assigned ordinals always form the
/// contiguous range `[0, len)`. Cancelling an order does not free its slot.
#[derive(Debug, Clone, Default)]
pub struct OrdinalAllocator {
    ordinals: FxHashMap<OrderId, usize>,
}

impl OrdinalAllocator {
    /// Create an empty allocator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the ordinal of `order_id`, allocating the next free one on first sight
    pub fn resolve(&mut self, order_id: OrderId) -> usize {
        let next = self.ordinals.len();
        *self.ordinals.entry(order_id).or_insert(next)
    }

    /// Get the ordinal of a previously seen order
    #[must_use]
    pub fn lookup(&self, order_id: OrderId) -> Option<usize> {
        self.ordinals.get(&order_id).copied()
    }

    /// Number of ordinals handed out
    #[must_use]
    pub fn len(&self) -> usize {
        self.ordinals.len()
    }

    /// Check if no ordinal has been handed out
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordinals.is_empty()
    }
}
