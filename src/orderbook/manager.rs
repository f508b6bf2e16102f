//! Symbol-sharded store for order-book events.
//!
//! This module provides [`BookManager`], a thread-safe container holding one
//! [`SymbolBook`] per symbol and exposing the store's query surface.
//!
//! # Design
//!
//! State is sharded by symbol. Each shard sits behind its own
//! `parking_lot::RwLock`, so:
//!
//! - events for one symbol are applied by a single writer, in order
//! - different symbols are updated and queried in parallel
//! - readers of one symbol only wait for that symbol's writer
//!
//! Sell-side snapshots returned by [`BookManager::sell_snapshot_as_of`] are
//! immutable and detached from the shard, so they can be read with no lock
//! held while writes continue.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::Error;
use crate::types::{parse_record, BuyEntry, OrderEvent, OrderKind, SellQuote};
use crate::Result;

use super::{SellSnapshot, SymbolBook};

/// Store for order-book events across many symbols.
///
/// # Thread Safety
///
/// The manager is safe to share across threads via `Arc<BookManager>`.
/// Callers that feed one symbol from several threads must still deliver that
/// symbol's events in event order.
///
/// # Example
///
/// ```rust
/// use orderbook_history::orderbook::BookManager;
/// use orderbook_history::types::{OrderEvent, Side};
///
/// let manager = BookManager::new();
/// manager.apply(&OrderEvent::insert("09:00:00", "AAA", 1, Side::Sell, 5, 10.0))?;
/// manager.ingest_record("09:00:01;AAA;2;I;SELL;3;12")?;
/// manager.ingest_record("09:00:02;AAA;10;I;BUY;100;0")?;
///
/// let best = manager.best_sell_as_of("AAA", "09:00:01").unwrap();
/// assert_eq!((best.order_id, best.price, best.volume), (2, 12.0, 3));
/// assert_eq!(manager.top_buy_orders("AAA")[0].order_id, 10);
/// assert_eq!(manager.active_order_counts()["AAA"], 3);
/// # Ok::<(), orderbook_history::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct BookManager {
    /// Query depth and record format
    config: Config,

    /// Books by symbol
    books: RwLock<FxHashMap<String, RwLock<SymbolBook>>>,
}

impl BookManager {
    /// Create a manager with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager with the given configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            books: RwLock::new(FxHashMap::default()),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Apply one event to its symbol's book
    ///
    /// The book is created by the first insert for a symbol.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownOrder`] or [`Error::DuplicateOrder`] when the
    /// event references an order inconsistently, or [`Error::InvalidEvent`]
    /// for a sell price that cannot be ranked; the store is left unchanged.
    pub fn apply(&self, event: &OrderEvent) -> Result<()> {
        let books = self.books.read();
        if let Some(book) = books.get(&event.symbol) {
            return book.write().apply(event);
        }
        drop(books);

        if event.kind != OrderKind::Insert {
            warn!(
                symbol = %event.symbol,
                order_id = event.order_id,
                kind = ?event.kind,
                "order event for unseen symbol"
            );
            return Err(Error::UnknownOrder {
                symbol: event.symbol.clone(),
                order_id: event.order_id,
                side: event.side,
            });
        }

        // A rejected first insert must not leave an empty book behind.
        if !event.has_rankable_price() {
            return Err(Error::InvalidEvent {
                symbol: event.symbol.clone(),
                order_id: event.order_id,
                reason: format!("non-finite price {}", event.price),
            });
        }

        // Another writer may have created the book between the two locks.
        let mut books = self.books.write();
        let book = books.entry(event.symbol.clone()).or_insert_with(|| {
            debug!(symbol = %event.symbol, "created symbol book");
            RwLock::new(SymbolBook::new(&event.symbol))
        });
        book.get_mut().apply(event)
    }

    /// Parse one delimiter-separated record and apply it
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the record is malformed (nothing is
    /// applied), or any error of [`BookManager::apply`].
    pub fn ingest_record(&self, line: &str) -> Result<()> {
        let event = parse_record(line, self.config.delimiter())?;
        self.apply(&event)
    }

    /// Number of active orders per symbol, sorted by symbol
    pub fn active_order_counts(&self) -> BTreeMap<String, u64> {
        let books = self.books.read();
        books
            .iter()
            .map(|(symbol, book)| (symbol.clone(), book.read().active_orders()))
            .collect()
    }

    /// Largest active buy orders for a symbol, up to the configured depth
    pub fn top_buy_orders(&self, symbol: &str) -> Vec<BuyEntry> {
        self.top_buy_orders_n(symbol, self.config.top_buy_depth())
    }

    /// Largest `k` active buy orders for a symbol
    ///
    /// Sorted by volume descending, then order ID ascending. Unknown symbols
    /// have no orders.
    pub fn top_buy_orders_n(&self, symbol: &str, k: usize) -> Vec<BuyEntry> {
        let books = self.books.read();
        books
            .get(symbol)
            .map(|book| book.read().top_buy_orders(k))
            .unwrap_or_default()
    }

    /// Best sell order for a symbol as of `timestamp`
    ///
    /// Returns `None` if the symbol has no sell-side state at or before
    /// `timestamp`, or no active sell order in that state.
    pub fn best_sell_as_of(&self, symbol: &str, timestamp: &str) -> Option<SellQuote> {
        let books = self.books.read();
        books
            .get(symbol)
            .and_then(|book| book.read().best_sell_as_of(timestamp))
    }

    /// Sell-side state of a symbol as of `timestamp`
    ///
    /// The snapshot is immutable and can be queried without holding any lock.
    pub fn sell_snapshot_as_of(&self, symbol: &str, timestamp: &str) -> Option<SellSnapshot> {
        let books = self.books.read();
        books
            .get(symbol)
            .and_then(|book| book.read().sell_snapshot_as_of(timestamp))
    }

    /// Get a copy of a symbol's book
    pub fn get_book(&self, symbol: &str) -> Option<SymbolBook> {
        let books = self.books.read();
        books.get(symbol).map(|book| book.read().clone())
    }

    /// All known symbols, sorted
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.books.read().keys().cloned().collect();
        symbols.sort_unstable();
        symbols
    }

    /// Get number of known symbols
    pub fn len(&self) -> usize {
        self.books.read().len()
    }

    /// Check if no symbol has been seen
    pub fn is_empty(&self) -> bool {
        self.books.read().is_empty()
    }
}
