//! # orderbook-history
//!
//! An in-memory store for order-book event streams that answers two
//! point-in-time questions cheaply:
//!
//! - **Top buy orders** - the highest-volume active BUY orders of a symbol
//!   right now
//! - **Best sell as of** - the best (highest price, then highest volume)
//!   active SELL order of a symbol as it stood at any past timestamp
//!
//! ## Quick Start
//!
//! ```rust
//! use orderbook_history::orderbook::BookManager;
//!
//! # fn main() -> orderbook_history::Result<()> {
//! let manager = BookManager::new();
//!
//! // timestamp;symbol;orderId;operation;side;volume;price
//! manager.ingest_record("09:00:00;AAA;1;I;SELL;5;10.0")?;
//! manager.ingest_record("09:00:01;AAA;2;I;SELL;3;12.0")?;
//! manager.ingest_record("09:00:02;AAA;2;C;SELL;3;12.0")?;
//!
//! let best = manager.best_sell_as_of("AAA", "09:00:01").unwrap();
//! assert_eq!(best.order_id, 2);
//!
//! let best = manager.best_sell_as_of("AAA", "09:00:02").unwrap();
//! assert_eq!(best.order_id, 1);
//!
//! assert!(manager.best_sell_as_of("AAA", "08:59:59").is_none());
//! # Ok(())
//! # }
//! ```
//!
//! ## Timestamps
//!
//! Timestamps are compared **lexically**. Feed them in a fixed-width,
//! zero-padded format (e.g. `HH:MM:SS`) so that string order matches time
//! order, and apply events in that order.
//!
//! ## Architecture
//!
//! This crate is organized into several modules:
//!
//! - [`orderbook`] - Sell history tree, buy index, per-symbol books, manager
//! - [`types`] - Order events, query results, and record parsing
//! - [`config`] - Query depth and record format settings
//! - [`error`] - Error types for the crate
//!
//! ## Performance
//!
//! - Sell updates copy only O(log n) tree nodes; older states are shared
//! - Buy updates are O(log n) via a `BTreeSet` plus a volume side table
//! - `FxHashMap` for order-ID keyed lookups
//! - `parking_lot` locks, one per symbol, so symbols never contend

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod orderbook;
pub mod types;

// Re-export main types at crate root for convenience
pub use config::Config;
pub use error::{Error, ParseError};
pub use orderbook::BookManager;

/// Result type alias using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
