//! Order-book state and point-in-time queries.
//!
//! This module provides the structures behind the store:
//!
//! - [`SellHistory`] - persistent tournament tree answering "best sell as of"
//!   queries over every recorded state (O(log n) path-copy updates)
//! - [`OrdinalAllocator`] - dense slot numbering for sell orders
//! - [`BuyTopK`] - volume-ranked index of active buy orders
//! - [`SymbolBook`] - per-symbol dispatcher keeping the above consistent
//! - [`BookManager`] - symbol-sharded, thread-safe store and query surface
//!
//! # Example
//!
//! ```rust
//! use orderbook_history::orderbook::BookManager;
//! use orderbook_history::types::{OrderEvent, Side};
//!
//! let manager = BookManager::new();
//!
//! manager.apply(&OrderEvent::insert("09:00:00", "AAA", 1, Side::Sell, 5, 10.0))?;
//! manager.apply(&OrderEvent::insert("09:00:01", "AAA", 2, Side::Sell, 3, 12.0))?;
//! manager.apply(&OrderEvent::cancel("09:00:02", "AAA", 2, Side::Sell))?;
//!
//! // Best sell as it stood at 09:00:01
//! if let Some(best) = manager.best_sell_as_of("AAA", "09:00:01") {
//!     println!("Best sell: {} @ {}", best.volume, best.price);
//! }
//! # Ok::<(), orderbook_history::Error>(())
//! ```

pub mod book;
pub mod buy;
pub mod manager;
pub mod ordinal;
pub mod tournament;

pub use book::SymbolBook;
pub use buy::BuyTopK;
pub use manager::BookManager;
pub use ordinal::OrdinalAllocator;
pub use tournament::{Node, SellHistory, SellSnapshot};
