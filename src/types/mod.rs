//! Order-book event types.
//!
//! This module contains the value types that flow through the store:
//!
//! - [`order`] - Order events, sides, operations, and query results
//! - [`record`] - Parsing of delimiter-separated event records

pub mod order;
pub mod record;

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use order::{BuyEntry, OrderEvent, OrderKind, SellQuote, Side};
pub use record::{parse_record, Field};

/// Exchange-assigned order identifier
pub type OrderId = u64;

/// Order volume (number of units resting on the book)
pub type Volume = u64;

/// Limit price
///
/// Prices are compared with [`f64::total_cmp`], so every value (including
/// zero and negative prices) has a well-defined rank. There is no sentinel
/// price: an empty tournament slot is a distinct variant, never a number.
pub type Price = f64;

/// Event timestamp as delivered by the feed (e.g. `"09:00:01"`).
///
/// Timestamps are ordered **lexically**. Callers must supply strings whose
/// lexical order matches chronological order (fixed-width, zero-padded
/// fields); no chronological parsing is performed.
///
/// Implements `Borrow<str>` so ordered maps keyed by `Timestamp` can be
/// queried with a plain `&str`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    /// Wrap a feed timestamp
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the raw timestamp text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Timestamp {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Timestamp {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for Timestamp {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
