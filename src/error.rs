//! Error types for the orderbook-history crate.
//!
//! This module defines the errors that can occur when feeding events into the
//! store: references to orders the store has never seen, duplicate inserts,
//! events that cannot be applied, malformed input records, and invalid
//! configuration.
//!
//! Asking for the best sell order before any data exists is *not* an error;
//! such queries return `None`.

use crate::types::record::Field;
use crate::types::{OrderId, Side};

/// The main error type for this crate
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Amend or cancel referenced an order that is not active on the symbol
    #[error("unknown {side:?} order {order_id} on {symbol}")]
    UnknownOrder {
        /// Symbol the event was addressed to
        symbol: String,
        /// Order ID that could not be resolved
        order_id: OrderId,
        /// Side the event was addressed to
        side: Side,
    },

    /// Insert referenced an order that is already active on the symbol
    #[error("duplicate {side:?} order {order_id} on {symbol}")]
    DuplicateOrder {
        /// Symbol the event was addressed to
        symbol: String,
        /// Order ID that is already active
        order_id: OrderId,
        /// Side the event was addressed to
        side: Side,
    },

    /// Event cannot be applied as given: a non-finite sell price, or an
    /// event addressed to another symbol's book
    #[error("invalid event for order {order_id} on {symbol}: {reason}")]
    InvalidEvent {
        /// Symbol of the book that rejected the event
        symbol: String,
        /// Order ID carried by the event
        order_id: OrderId,
        /// What is wrong with the event
        reason: String,
    },

    /// Input record could not be parsed
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Check if this error reports an unresolved order reference
    pub fn is_unknown_order(&self) -> bool {
        matches!(self, Error::UnknownOrder { .. })
    }

    /// Check if this error rejects a malformed event
    pub fn is_invalid_event(&self) -> bool {
        matches!(self, Error::InvalidEvent { .. })
    }

    /// Check if this error comes from record parsing
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::Parse(_))
    }
}

/// Structured record parse failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Record ended before this field
    #[error("missing field `{0}`")]
    MissingField(Field),

    /// Field is present but malformed
    #[error("invalid {field}: {value:?}")]
    InvalidField {
        /// Offending field
        field: Field,
        /// Raw field text
        value: String,
    },

    /// Record carries more than the expected fields
    #[error("unexpected trailing data: {0:?}")]
    TrailingData(String),
}

impl ParseError {
    /// Create an invalid-field error
    pub fn invalid(field: Field, value: impl Into<String>) -> Self {
        ParseError::InvalidField {
            field,
            value: value.into(),
        }
    }

    /// Get the field this error refers to, if any
    pub fn field(&self) -> Option<Field> {
        match self {
            ParseError::MissingField(field) | ParseError::InvalidField { field, .. } => {
                Some(*field)
            }
            ParseError::TrailingData(_) => None,
        }
    }
}
