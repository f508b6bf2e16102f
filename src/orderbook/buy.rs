//! Volume-ranked index of active buy orders.
//!
//! Entries live in a `BTreeSet` ordered by volume descending, then order ID
//! ascending, so the top K orders are simply the first K elements. A side
//! table remembers each order's current volume, which is the other half of
//! the set key and makes removal O(log n).

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use crate::types::{BuyEntry, OrderId, Volume};

/// Top-K buy index for one symbol
#[derive(Debug, Clone, Default)]
pub struct BuyTopK {
    /// Active orders, largest first
    entries: BTreeSet<BuyEntry>,

    /// order ID -> volume currently stored in `entries`
    volumes: FxHashMap<OrderId, Volume>,
}

impl BuyTopK {
    /// Create an empty index
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an order
    ///
    /// Returns `false` and leaves the index unchanged if the order is already
    /// present.
    pub fn insert(&mut self, order_id: OrderId, volume: Volume) -> bool {
        if self.volumes.contains_key(&order_id) {
            return false;
        }
        self.volumes.insert(order_id, volume);
        self.entries.insert(BuyEntry::new(order_id, volume));
        true
    }

    /// Change the volume of an order
    ///
    /// Returns the previous volume, or `None` (index unchanged) if the order is
    /// not present.
    pub fn amend(&mut self, order_id: OrderId, volume: Volume) -> Option<Volume> {
        let slot = self.volumes.get_mut(&order_id)?;
        let previous = std::mem::replace(slot, volume);
        self.entries.remove(&BuyEntry::new(order_id, previous));
        self.entries.insert(BuyEntry::new(order_id, volume));
        Some(previous)
    }

    /// Remove an order
    ///
    /// Returns its last volume, or `None` if the order is not present.
    pub fn cancel(&mut self, order_id: OrderId) -> Option<Volume> {
        let volume = self.volumes.remove(&order_id)?;
        self.entries.remove(&BuyEntry::new(order_id, volume));
        Some(volume)
    }

    /// The `k` largest orders, largest first
    ///
    /// Returns every order if fewer than `k` are active.
    #[must_use]
    pub fn top_k(&self, k: usize) -> Vec<BuyEntry> {
        self.entries.iter().take(k).copied().collect()
    }

    /// Current volume of an order
    #[must_use]
    pub fn volume_of(&self, order_id: OrderId) -> Option<Volume> {
        self.volumes.get(&order_id).copied()
    }

    /// Number of active orders
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no active orders
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(entries: &[BuyEntry]) -> Vec<OrderId> {
        entries.iter().map(|e| e.order_id).collect()
    }

    #[test]
    fn test_top_k_order() {
        let mut index = BuyTopK::new();
        index.insert(10, 100);
        index.insert(11, 50);
        index.insert(12, 200);

        let top = index.top_k(3);
        assert_eq!(
            top,
            vec![
                BuyEntry::new(12, 200),
                BuyEntry::new(10, 100),
                BuyEntry::new(11, 50)
            ]
        );
    }

    #[test]
    fn test_ties_break_on_order_id() {
        let mut index = BuyTopK::new();
        index.insert(7, 100);
        index.insert(3, 100);
        index.insert(5, 100);
        index.insert(1, 10);

        assert_eq!(ids(&index.top_k(3)), vec![3, 5, 7]);
    }

    #[test]
    fn test_fewer_than_k() {
        let mut index = BuyTopK::new();
        assert!(index.top_k(3).is_empty());

        index.insert(1, 5);
        assert_eq!(index.top_k(3).len(), 1);
        assert_eq!(index.top_k(0).len(), 0);
    }

    #[test]
    fn test_amend_reorders() {
        let mut index = BuyTopK::new();
        index.insert(1, 10);
        index.insert(2, 20);

        assert_eq!(index.amend(1, 30), Some(10));
        assert_eq!(ids(&index.top_k(3)), vec![1, 2]);
        assert_eq!(index.volume_of(1), Some(30));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_cancel_removes_entry() {
        let mut index = BuyTopK::new();
        index.insert(1, 10);
        index.insert(2, 20);

        assert_eq!(index.cancel(2), Some(20));
        assert_eq!(ids(&index.top_k(3)), vec![1]);
        assert_eq!(index.volume_of(2), None);
    }

    #[test]
    fn test_unknown_orders_leave_index_unchanged() {
        let mut index = BuyTopK::new();
        index.insert(1, 10);

        assert_eq!(index.amend(9, 99), None);
        assert_eq!(index.cancel(9), None);
        assert!(!index.insert(1, 500));
        assert_eq!(index.top_k(3), vec![BuyEntry::new(1, 10)]);
    }
}
