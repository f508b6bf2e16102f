//! Order-related types.
//!
//! This module contains the parsed order event consumed by the store and the
//! values returned by its queries.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::{OrderId, Price, Timestamp, Volume};

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Bid - buy orders are ranked by volume
    Buy,
    /// Ask - sell orders are ranked by price, then volume
    Sell,
}

impl Side {
    /// Get the feed spelling of this side (`"BUY"` / `"SELL"`)
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }

    /// Parse the feed spelling of a side
    pub fn from_feed(value: &str) -> Option<Self> {
        match value {
            "BUY" => Some(Side::Buy),
            "SELL" => Some(Side::Sell),
            _ => None,
        }
    }
}

/// Operation carried by an order event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderKind {
    /// New order enters the book
    #[serde(rename = "I")]
    Insert,
    /// Resting order changes price and/or volume
    #[serde(rename = "A")]
    Amend,
    /// Resting order leaves the book
    #[serde(rename = "C")]
    Cancel,
}

impl OrderKind {
    /// Get the single-character operation code used by the feed
    pub fn as_code(self) -> char {
        match self {
            OrderKind::Insert => 'I',
            OrderKind::Amend => 'A',
            OrderKind::Cancel => 'C',
        }
    }

    /// Parse a single-character operation code
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'I' => Some(OrderKind::Insert),
            'A' => Some(OrderKind::Amend),
            'C' => Some(OrderKind::Cancel),
            _ => None,
        }
    }
}

/// A single parsed order-book event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderEvent {
    /// Exchange order ID
    pub order_id: OrderId,

    /// Operation
    pub kind: OrderKind,

    /// Instrument symbol
    pub symbol: String,

    /// Book side
    pub side: Side,

    /// Volume after this event (ignored for cancels)
    pub volume: Volume,

    /// Limit price after this event (ignored for cancels and buy orders)
    pub price: Price,

    /// When the event happened
    pub timestamp: Timestamp,
}

impl OrderEvent {
    /// Create an event from its parts
    pub fn new(
        timestamp: impl Into<Timestamp>,
        symbol: impl Into<String>,
        order_id: OrderId,
        kind: OrderKind,
        side: Side,
        volume: Volume,
        price: Price,
    ) -> Self {
        Self {
            order_id,
            kind,
            symbol: symbol.into(),
            side,
            volume,
            price,
            timestamp: timestamp.into(),
        }
    }

    /// Create an insert event
    pub fn insert(
        timestamp: impl Into<Timestamp>,
        symbol: impl Into<String>,
        order_id: OrderId,
        side: Side,
        volume: Volume,
        price: Price,
    ) -> Self {
        Self::new(timestamp, symbol, order_id, OrderKind::Insert, side, volume, price)
    }

    /// Create an amend event
    pub fn amend(
        timestamp: impl Into<Timestamp>,
        symbol: impl Into<String>,
        order_id: OrderId,
        side: Side,
        volume: Volume,
        price: Price,
    ) -> Self {
        Self::new(timestamp, symbol, order_id, OrderKind::Amend, side, volume, price)
    }

    /// Create a cancel event
    pub fn cancel(
        timestamp: impl Into<Timestamp>,
        symbol: impl Into<String>,
        order_id: OrderId,
        side: Side,
    ) -> Self {
        Self::new(timestamp, symbol, order_id, OrderKind::Cancel, side, 0, 0.0)
    }

    /// Whether the price can be ranked by the sell tournament.
    ///
    /// Only sell inserts and amends carry a price that is ranked; those must
    /// be finite. Buy events and cancels ignore the price.
    #[must_use]
    pub fn has_rankable_price(&self) -> bool {
        self.side == Side::Buy || self.kind == OrderKind::Cancel || self.price.is_finite()
    }
}

/// An active sell order as seen by the tournament tree
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SellQuote {
    /// Exchange order ID
    pub order_id: OrderId,
    /// Limit price
    pub price: Price,
    /// Resting volume
    pub volume: Volume,
}

impl SellQuote {
    /// Create a new quote
    pub const fn new(order_id: OrderId, price: Price, volume: Volume) -> Self {
        Self {
            order_id,
            price,
            volume,
        }
    }

    /// Tournament rule: does `self` strictly beat `other`?
    ///
    /// Higher price wins; at equal price higher volume wins. A full tie is not
    /// a win, so the incumbent is kept. `-0.0` and `0.0` are the same price.
    #[must_use]
    pub fn beats(&self, other: &SellQuote) -> bool {
        // Adding +0.0 folds -0.0 into 0.0 before the total order sees it.
        match (self.price + 0.0).total_cmp(&(other.price + 0.0)) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => self.volume > other.volume,
        }
    }
}

impl From<SellQuote> for (OrderId, Price, Volume) {
    fn from(quote: SellQuote) -> Self {
        (quote.order_id, quote.price, quote.volume)
    }
}

/// An active buy order in the top-K index
///
/// Ordered by volume descending, then order ID ascending, so iterating a
/// sorted set of entries yields the largest orders first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuyEntry {
    /// Exchange order ID
    pub order_id: OrderId,
    /// Resting volume
    pub volume: Volume,
}

impl BuyEntry {
    /// Create a new entry
    pub const fn new(order_id: OrderId, volume: Volume) -> Self {
        Self { order_id, volume }
    }
}

impl Ord for BuyEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .volume
            .cmp(&self.volume)
            .then_with(|| self.order_id.cmp(&other.order_id))
    }
}

impl PartialOrd for BuyEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<BuyEntry> for (OrderId, Volume) {
    fn from(entry: BuyEntry) -> Self {
        (entry.order_id, entry.volume)
    }
}
