//! Persistent tournament tree over sell-order slots.
//!
//! Every sell order of a symbol owns one leaf, addressed by its ordinal. Each
//! internal node caches the winner of its two children under the sell
//! tournament rule (see [`SellQuote::beats`]), so the root always holds the
//! best active sell order.
//!
//! The tree is persistent: nodes are immutable and shared through [`Arc`].
//! An update copies only the nodes on the root-to-leaf path of the touched
//! slot, and the resulting root is recorded under the event timestamp. Any
//! root published earlier keeps describing exactly the state it was built
//! for, which is what makes "as of" queries possible.
//!
//! | Operation | Cost |
//! |-----------|------|
//! | Update within capacity | O(log capacity) new nodes |
//! | Growth (capacity doubling) | O(capacity) new nodes, amortized O(1) per slot |
//! | Best as of timestamp | O(log versions) |

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use tracing::debug;

use crate::types::{SellQuote, Timestamp};

/// A tournament tree node
///
/// Nodes are never mutated once built; new versions reuse untouched subtrees
/// by reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Slot with no active order (never filled, or cancelled)
    Empty,
    /// Slot holding an active order
    Leaf(SellQuote),
    /// Winner of two subtrees
    Internal {
        /// Tournament winner of `left` and `right`, `None` if both are empty
        best: Option<SellQuote>,
        /// Lower half of the slot range
        left: Arc<Node>,
        /// Upper half of the slot range
        right: Arc<Node>,
    },
}

impl Node {
    /// Best active order in this subtree
    #[must_use]
    pub fn best(&self) -> Option<SellQuote> {
        match self {
            Node::Empty => None,
            Node::Leaf(quote) => Some(*quote),
            Node::Internal { best, .. } => *best,
        }
    }

    fn slot(value: Option<SellQuote>) -> Self {
        value.map_or(Node::Empty, Node::Leaf)
    }

    fn internal(left: Arc<Node>, right: Arc<Node>) -> Self {
        Node::Internal {
            best: winner(left.best(), right.best()),
            left,
            right,
        }
    }

    /// Fully materialized subtree of empty slots, `depth` levels above its leaves
    fn empty_subtree(depth: u32) -> Arc<Node> {
        if depth == 0 {
            Arc::new(Node::Empty)
        } else {
            Arc::new(Node::internal(
                Node::empty_subtree(depth - 1),
                Node::empty_subtree(depth - 1),
            ))
        }
    }

    /// Subtree holding `value` at slot `offset` and empty slots everywhere else
    fn path_subtree(depth: u32, offset: usize, value: Option<SellQuote>) -> Arc<Node> {
        if depth == 0 {
            return Arc::new(Node::slot(value));
        }

        let half = 1usize << (depth - 1);
        let node = if offset < half {
            Node::internal(
                Node::path_subtree(depth - 1, offset, value),
                Node::empty_subtree(depth - 1),
            )
        } else {
            Node::internal(
                Node::empty_subtree(depth - 1),
                Node::path_subtree(depth - 1, offset - half, value),
            )
        };
        Arc::new(node)
    }

    /// Children of a node above leaf level
    ///
    /// # Panics
    ///
    /// Every node above leaf level is built as `Internal`; anything else means
    /// the tree is corrupt and the history cannot be trusted.
    fn children(&self) -> (Arc<Node>, Arc<Node>) {
        match self {
            Node::Internal { left, right, .. } => (Arc::clone(left), Arc::clone(right)),
            other => unreachable!("non-internal node above leaf level: {other:?}"),
        }
    }
}

/// Tournament rule over optional candidates
///
/// Empty loses to any order; on a full tie the left operand is kept.
fn winner(left: Option<SellQuote>, right: Option<SellQuote>) -> Option<SellQuote> {
    match (left, right) {
        (Some(l), Some(r)) => Some(if r.beats(&l) { r } else { l }),
        (l, None) => l,
        (None, r) => r,
    }
}

/// Copy the path from `node` down to `ordinal`, replacing that slot.
fn set_slot(
    node: &Arc<Node>,
    lo: usize,
    hi: usize,
    ordinal: usize,
    value: Option<SellQuote>,
) -> Arc<Node> {
    if lo + 1 == hi {
        return Arc::new(Node::slot(value));
    }

    let mid = lo + (hi - lo) / 2;
    let (left, right) = node.children();
    let node = if ordinal < mid {
        Node::internal(set_slot(&left, lo, mid, ordinal, value), right)
    } else {
        Node::internal(left, set_slot(&right, mid, hi, ordinal, value))
    };
    Arc::new(node)
}

/// An immutable tree state published at one timestamp
///
/// Snapshots are cheap to clone (one reference count) and stay valid while
/// the history keeps growing.
#[derive(Debug, Clone)]
pub struct SellSnapshot {
    root: Arc<Node>,
    capacity: usize,
}

impl SellSnapshot {
    /// Best active sell order in this state
    #[must_use]
    pub fn best(&self) -> Option<SellQuote> {
        self.root.best()
    }

    /// Number of leaf slots in this state
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Root node of this state
    #[must_use]
    pub fn root(&self) -> &Arc<Node> {
        &self.root
    }

    /// The order occupying slot `ordinal`, if any
    #[must_use]
    pub fn quote_at(&self, ordinal: usize) -> Option<SellQuote> {
        if ordinal >= self.capacity {
            return None;
        }

        let (mut lo, mut hi) = (0, self.capacity);
        let mut node = &self.root;
        while lo + 1 < hi {
            let mid = lo + (hi - lo) / 2;
            let Node::Internal { left, right, .. } = node.as_ref() else {
                return None;
            };
            if ordinal < mid {
                node = left;
                hi = mid;
            } else {
                node = right;
                lo = mid;
            }
        }
        node.best()
    }

    /// Check whether two snapshots are the very same tree state
    #[must_use]
    pub fn shares_root_with(&self, other: &SellSnapshot) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }
}

/// Versioned sell-side tournament tree for one symbol.
///
/// Slots are addressed by ordinal. The caller is responsible for handing out
/// ordinals densely (see [`OrdinalAllocator`](super::OrdinalAllocator)); the
/// tree doubles its capacity whenever an ordinal falls outside it and never
/// shrinks.
///
/// # Example
///
/// ```rust
/// use orderbook_history::orderbook::SellHistory;
/// use orderbook_history::types::{SellQuote, Timestamp};
///
/// let mut history = SellHistory::new();
/// history.insert(0, SellQuote::new(1, 10.0, 5), &Timestamp::from("09:00:00"));
/// history.insert(1, SellQuote::new(2, 12.0, 3), &Timestamp::from("09:00:01"));
/// history.cancel(1, &Timestamp::from("09:00:02"));
///
/// assert_eq!(history.best_as_of("09:00:01").map(|q| q.order_id), Some(2));
/// assert_eq!(history.best_as_of("09:00:02").map(|q| q.order_id), Some(1));
/// assert_eq!(history.best_as_of("08:59:59"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SellHistory {
    /// Leaf slots in the current tree, zero before the first write
    capacity: usize,

    /// Most recently written state
    latest: Option<SellSnapshot>,

    /// One published state per distinct timestamp
    versions: BTreeMap<Timestamp, SellSnapshot>,
}

impl SellHistory {
    /// Create an empty history
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a new order in slot `ordinal`, growing the tree if needed
    pub fn insert(&mut self, ordinal: usize, quote: SellQuote, timestamp: &Timestamp) {
        self.write(ordinal, Some(quote), timestamp);
    }

    /// Replace the order in slot `ordinal`
    pub fn amend(&mut self, ordinal: usize, quote: SellQuote, timestamp: &Timestamp) {
        self.write(ordinal, Some(quote), timestamp);
    }

    /// Mark slot `ordinal` as empty
    ///
    /// The slot itself stays allocated.
    pub fn cancel(&mut self, ordinal: usize, timestamp: &Timestamp) {
        self.write(ordinal, None, timestamp);
    }

    /// Best sell order in the most recent state not after `timestamp`
    ///
    /// Returns `None` when no state was recorded at or before `timestamp`, or
    /// when that state has no active orders.
    #[must_use]
    pub fn best_as_of(&self, timestamp: &str) -> Option<SellQuote> {
        self.snapshot_as_of(timestamp).and_then(SellSnapshot::best)
    }

    /// The most recent state not after `timestamp`
    #[must_use]
    pub fn snapshot_as_of(&self, timestamp: &str) -> Option<&SellSnapshot> {
        self.versions
            .range::<str, _>((Bound::Unbounded, Bound::Included(timestamp)))
            .next_back()
            .map(|(_, snapshot)| snapshot)
    }

    /// The most recently written state
    #[must_use]
    pub fn latest(&self) -> Option<&SellSnapshot> {
        self.latest.as_ref()
    }

    /// Current number of leaf slots
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of distinct timestamps with a recorded state
    #[must_use]
    pub fn version_count(&self) -> usize {
        self.versions.len()
    }

    fn write(&mut self, ordinal: usize, value: Option<SellQuote>, timestamp: &Timestamp) {
        let current = self
            .latest
            .as_ref()
            .filter(|_| ordinal < self.capacity)
            .map(|latest| Arc::clone(&latest.root));

        let root = match current {
            Some(root) => set_slot(&root, 0, self.capacity, ordinal, value),
            None => self.grow(ordinal, value),
        };

        let snapshot = SellSnapshot {
            root,
            capacity: self.capacity,
        };
        self.versions.insert(timestamp.clone(), snapshot.clone());
        self.latest = Some(snapshot);
    }

    /// Double the capacity until `ordinal` fits, placing `value` on the way.
    ///
    /// The previous root becomes the left child of the new root unchanged. The
    /// new right half is built in full: the slot for `ordinal` carries `value`
    /// and every other slot is an empty leaf.
    fn grow(&mut self, ordinal: usize, value: Option<SellQuote>) -> Arc<Node> {
        let mut root = match &self.latest {
            Some(latest) => Arc::clone(&latest.root),
            None => {
                self.capacity = 1;
                Arc::new(if ordinal == 0 { Node::slot(value) } else { Node::Empty })
            }
        };

        while ordinal >= self.capacity {
            let depth = self.capacity.trailing_zeros();
            let offset = ordinal - self.capacity;
            let right = if offset < self.capacity {
                Node::path_subtree(depth, offset, value)
            } else {
                Node::empty_subtree(depth)
            };

            // Old root on the left: on a full tie the older order keeps the crown.
            root = Arc::new(Node::internal(root, right));
            self.capacity <<= 1;
            debug!(capacity = self.capacity, ordinal, "sell tree grew");
        }

        root
    }
}
