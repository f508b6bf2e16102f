//! Configuration for the order-book store.
//!
//! This module provides the [`Config`] struct controlling query depth and the
//! record format accepted by [`BookManager::ingest_record`](crate::orderbook::BookManager::ingest_record).

use serde::Deserialize;

use crate::error::Error;
use crate::types::record::DEFAULT_DELIMITER;

/// Number of buy orders returned by `top_buy_orders` unless configured otherwise
pub const DEFAULT_TOP_BUY_DEPTH: usize = 3;

/// Configuration for the order-book store
///
/// # Example
///
/// ```rust
/// use orderbook_history::Config;
///
/// let config = Config::new();
/// assert_eq!(config.top_buy_depth(), 3);
///
/// // Pipe-separated records, top five buy orders
/// let config = Config::new()
///     .with_delimiter('|')
///     .with_top_buy_depth(5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How many buy orders `top_buy_orders` returns
    top_buy_depth: usize,

    /// Field separator for input records
    delimiter: char,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            top_buy_depth: DEFAULT_TOP_BUY_DEPTH,
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl Config {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how many buy orders `top_buy_orders` returns
    #[must_use]
    pub fn with_top_buy_depth(mut self, depth: usize) -> Self {
        self.top_buy_depth = depth;
        self
    }

    /// Set the record field separator
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Get the top-of-book buy depth
    pub fn top_buy_depth(&self) -> usize {
        self.top_buy_depth
    }

    /// Get the record field separator
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Check that the settings are usable
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the depth is zero or the delimiter could
    /// appear inside a field value.
    pub fn validate(&self) -> Result<(), Error> {
        if self.top_buy_depth == 0 {
            return Err(Error::Config("top_buy_depth must be at least 1".into()));
        }

        let d = self.delimiter;
        if d.is_alphanumeric() || d.is_whitespace() || matches!(d, '.' | '-' | ':' | '+') {
            return Err(Error::Config(format!(
                "delimiter {d:?} can appear inside a field"
            )));
        }

        Ok(())
    }
}
