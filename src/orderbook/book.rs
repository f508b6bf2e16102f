//! Per-symbol order book state and event dispatch.
//!
//! A [`SymbolBook`] owns everything the store knows about one symbol:
//!
//! - the versioned sell tournament tree and the ordinals addressing it
//! - the top-K buy index and its volume side table
//! - the active-order counter
//!
//! The side tables are private; they are only read and written by
//! [`SymbolBook::apply`], which validates every reference before touching
//! any structure. A rejected event leaves the book exactly as it was.

use rustc_hash::FxHashSet;
use tracing::{trace, warn};

use crate::error::Error;
use crate::types::{BuyEntry, OrderEvent, OrderId, OrderKind, SellQuote, Side};
use crate::Result;

use super::{BuyTopK, OrdinalAllocator, SellHistory, SellSnapshot};

/// Order book state for a single symbol.
///
/// # Thread Safety
///
/// This struct is `Send + Sync` but not internally synchronized. Events for
/// one symbol must be applied by a single writer in event order;
/// [`BookManager`](super::BookManager) wraps each book in a
/// `parking_lot::RwLock` for that.
///
/// # Example
///
/// ```rust
/// use orderbook_history::orderbook::SymbolBook;
/// use orderbook_history::types::{OrderEvent, Side};
///
/// let mut book = SymbolBook::new("AAA");
/// book.apply(&OrderEvent::insert("09:00:00", "AAA", 1, Side::Sell, 5, 10.0))?;
/// book.apply(&OrderEvent::insert("09:00:01", "AAA", 10, Side::Buy, 100, 0.0))?;
///
/// assert_eq!(book.active_orders(), 2);
/// assert_eq!(book.best_sell_as_of("09:00:00").map(|q| q.order_id), Some(1));
/// assert_eq!(book.top_buy_orders(3)[0].order_id, 10);
/// # Ok::<(), orderbook_history::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct SymbolBook {
    /// Instrument symbol
    symbol: String,

    /// Orders inserted and not yet cancelled, both sides
    active_orders: u64,

    /// Sell side: versioned tournament tree
    sells: SellHistory,

    /// Sell side: order ID -> tournament slot
    ordinals: OrdinalAllocator,

    /// Sell side: orders currently occupying their slot
    live_sells: FxHashSet<OrderId>,

    /// Buy side: volume-ranked index
    buys: BuyTopK,
}

impl SymbolBook {
    /// Create an empty book for the given symbol
    #[must_use]
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            active_orders: 0,
            sells: SellHistory::new(),
            ordinals: OrdinalAllocator::new(),
            live_sells: FxHashSet::default(),
            buys: BuyTopK::new(),
        }
    }

    /// Get the symbol
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Apply one event
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidEvent`] if the event is addressed to another symbol,
    ///   or is a sell insert or amend with a NaN or infinite price
    /// - [`Error::UnknownOrder`] for an amend or cancel of an order that is not
    ///   active on this side of the book
    /// - [`Error::DuplicateOrder`] for an insert of an order that is already
    ///   active on this side of the book
    pub fn apply(&mut self, event: &OrderEvent) -> Result<()> {
        trace!(
            symbol = %self.symbol,
            order_id = event.order_id,
            kind = ?event.kind,
            side = ?event.side,
            timestamp = %event.timestamp,
            "applying order event"
        );

        let result = self.check(event).and_then(|()| match event.side {
            Side::Sell => self.apply_sell(event),
            Side::Buy => self.apply_buy(event),
        });

        if let Err(err) = &result {
            warn!(
                symbol = %self.symbol,
                order_id = event.order_id,
                kind = ?event.kind,
                error = %err,
                "rejected order event"
            );
        }
        result
    }

    fn apply_sell(&mut self, event: &OrderEvent) -> Result<()> {
        let quote = SellQuote::new(event.order_id, event.price, event.volume);

        match event.kind {
            OrderKind::Insert => {
                if self.live_sells.contains(&event.order_id) {
                    return Err(self.duplicate(event));
                }
                let ordinal = self.ordinals.resolve(event.order_id);
                self.sells.insert(ordinal, quote, &event.timestamp);
                self.live_sells.insert(event.order_id);
                self.active_orders += 1;
            }
            OrderKind::Amend => {
                let ordinal = self.live_ordinal(event)?;
                self.sells.amend(ordinal, quote, &event.timestamp);
            }
            OrderKind::Cancel => {
                let ordinal = self.live_ordinal(event)?;
                self.sells.cancel(ordinal, &event.timestamp);
                self.live_sells.remove(&event.order_id);
                self.active_orders -= 1;
            }
        }
        Ok(())
    }

    fn apply_buy(&mut self, event: &OrderEvent) -> Result<()> {
        match event.kind {
            OrderKind::Insert => {
                if !self.buys.insert(event.order_id, event.volume) {
                    return Err(self.duplicate(event));
                }
                self.active_orders += 1;
            }
            OrderKind::Amend => {
                self.buys
                    .amend(event.order_id, event.volume)
                    .ok_or_else(|| self.unknown(event))?;
            }
            OrderKind::Cancel => {
                self.buys
                    .cancel(event.order_id)
                    .ok_or_else(|| self.unknown(event))?;
                self.active_orders -= 1;
            }
        }
        Ok(())
    }

    /// Reject events this book must not apply, before anything is touched
    fn check(&self, event: &OrderEvent) -> Result<()> {
        if event.symbol != self.symbol {
            return Err(self.invalid(event, format!("addressed to {}", event.symbol)));
        }
        if !event.has_rankable_price() {
            return Err(self.invalid(event, format!("non-finite price {}", event.price)));
        }
        Ok(())
    }

    /// Slot of a sell order that is currently on the book
    fn live_ordinal(&self, event: &OrderEvent) -> Result<usize> {
        if !self.live_sells.contains(&event.order_id) {
            return Err(self.unknown(event));
        }
        self.ordinals
            .lookup(event.order_id)
            .ok_or_else(|| self.unknown(event))
    }

    fn unknown(&self, event: &OrderEvent) -> Error {
        Error::UnknownOrder {
            symbol: self.symbol.clone(),
            order_id: event.order_id,
            side: event.side,
        }
    }

    fn invalid(&self, event: &OrderEvent, reason: String) -> Error {
        Error::InvalidEvent {
            symbol: self.symbol.clone(),
            order_id: event.order_id,
            reason,
        }
    }

    fn duplicate(&self, event: &OrderEvent) -> Error {
        Error::DuplicateOrder {
            symbol: self.symbol.clone(),
            order_id: event.order_id,
            side: event.side,
        }
    }

    /// Number of orders inserted and not yet cancelled
    #[must_use]
    pub fn active_orders(&self) -> u64 {
        self.active_orders
    }

    /// The `k` largest active buy orders, largest first
    #[must_use]
    pub fn top_buy_orders(&self, k: usize) -> Vec<BuyEntry> {
        self.buys.top_k(k)
    }

    /// Best sell order in the most recent state not after `timestamp`
    #[must_use]
    pub fn best_sell_as_of(&self, timestamp: &str) -> Option<SellQuote> {
        self.sells.best_as_of(timestamp)
    }

    /// Sell-side state as of `timestamp`, detached from this book
    #[must_use]
    pub fn sell_snapshot_as_of(&self, timestamp: &str) -> Option<SellSnapshot> {
        self.sells.snapshot_as_of(timestamp).cloned()
    }

    /// Sell-side version history
    #[must_use]
    pub fn sell_history(&self) -> &SellHistory {
        &self.sells
    }
}
