//! Delimiter-separated event records.
//!
//! Each record carries seven fields, in order:
//!
//! ```text
//! timestamp;symbol;orderId;operation;side;volume;price
//! 09:00:01;AAA;2;I;SELL;3;12.0
//! ```
//!
//! Parsing is all-or-nothing: a record either yields a complete
//! [`OrderEvent`] or a [`ParseError`] naming the first offending field.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

use super::order::{OrderEvent, OrderKind, Side};

/// Default field separator
pub const DEFAULT_DELIMITER: char = ';';

/// A field of an event record, in record order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Event timestamp
    Timestamp,
    /// Instrument symbol
    Symbol,
    /// Order ID
    OrderId,
    /// Operation code (`I`, `A`, `C`)
    Operation,
    /// Side (`BUY`, `SELL`)
    Side,
    /// Volume
    Volume,
    /// Price
    Price,
}

impl Field {
    /// All fields in record order
    pub const ALL: [Field; 7] = [
        Field::Timestamp,
        Field::Symbol,
        Field::OrderId,
        Field::Operation,
        Field::Side,
        Field::Volume,
        Field::Price,
    ];

    /// Field name as used in error messages
    pub fn name(self) -> &'static str {
        match self {
            Field::Timestamp => "timestamp",
            Field::Symbol => "symbol",
            Field::OrderId => "orderId",
            Field::Operation => "operation",
            Field::Side => "side",
            Field::Volume => "volume",
            Field::Price => "price",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse one record using the given field delimiter.
///
/// Surrounding whitespace (including a trailing newline) is ignored, both for
/// the record and for each field.
///
/// # Errors
///
/// Returns a [`ParseError`] if a field is missing, cannot be parsed, or the
/// record carries more than seven fields.
pub fn parse_record(line: &str, delimiter: char) -> Result<OrderEvent, ParseError> {
    let mut parts = line.trim().split(delimiter).map(str::trim);
    let mut next = |field: Field| parts.next().ok_or(ParseError::MissingField(field));

    let timestamp = non_empty(Field::Timestamp, next(Field::Timestamp)?)?;
    let symbol = non_empty(Field::Symbol, next(Field::Symbol)?)?;
    let order_id = number(Field::OrderId, next(Field::OrderId)?)?;

    let raw = next(Field::Operation)?;
    let mut chars = raw.chars();
    let kind = match (chars.next(), chars.next()) {
        (Some(code), None) => OrderKind::from_code(code),
        _ => None,
    }
    .ok_or_else(|| ParseError::invalid(Field::Operation, raw))?;

    let raw = next(Field::Side)?;
    let side = Side::from_feed(raw).ok_or_else(|| ParseError::invalid(Field::Side, raw))?;

    let volume = number(Field::Volume, next(Field::Volume)?)?;

    let raw = next(Field::Price)?;
    let price: f64 = number(Field::Price, raw)?;
    if !price.is_finite() {
        return Err(ParseError::invalid(Field::Price, raw));
    }

    let rest: Vec<&str> = parts.collect();
    if !rest.is_empty() {
        let separator = delimiter.to_string();
        return Err(ParseError::TrailingData(rest.join(separator.as_str())));
    }

    Ok(OrderEvent::new(timestamp, symbol, order_id, kind, side, volume, price))
}

fn non_empty(field: Field, raw: &str) -> Result<&str, ParseError> {
    if raw.is_empty() {
        Err(ParseError::invalid(field, raw))
    } else {
        Ok(raw)
    }
}

fn number<T: FromStr>(field: Field, raw: &str) -> Result<T, ParseError> {
    raw.parse().map_err(|_| ParseError::invalid(field, raw))
}

impl FromStr for OrderEvent {
    type Err = ParseError;

    /// Parse a record separated by [`DEFAULT_DELIMITER`]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_record(s, DEFAULT_DELIMITER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Timestamp;

    #[test]
    fn test_parse_sell_insert() {
        let event: OrderEvent = "09:00:01;AAA;2;I;SELL;3;12.5\n".parse().unwrap();
        assert_eq!(event.timestamp, Timestamp::from("09:00:01"));
        assert_eq!(event.symbol, "AAA");
        assert_eq!(event.order_id, 2);
        assert_eq!(event.kind, OrderKind::Insert);
        assert_eq!(event.side, Side::Sell);
        assert_eq!(event.volume, 3);
        assert_eq!(event.price, 12.5);
    }

    #[test]
    fn test_parse_custom_delimiter() {
        let event = parse_record("09:00:00|BBB|7|C|BUY|0|0", '|').unwrap();
        assert_eq!(event.kind, OrderKind::Cancel);
        assert_eq!(event.side, Side::Buy);
        assert_eq!(event.symbol, "BBB");
    }

    #[test]
    fn test_missing_field_is_named() {
        let err = "09:00:00;AAA;1;I;BUY;10".parse::<OrderEvent>().unwrap_err();
        assert_eq!(err, ParseError::MissingField(Field::Price));
    }

    #[test]
    fn test_invalid_fields_are_named() {
        let cases = [
            ("09:00:00;AAA;x;I;BUY;10;1.0", Field::OrderId),
            ("09:00:00;AAA;-1;I;BUY;10;1.0", Field::OrderId),
            ("09:00:00;AAA;1;X;BUY;10;1.0", Field::Operation),
            ("09:00:00;AAA;1;IA;BUY;10;1.0", Field::Operation),
            ("09:00:00;AAA;1;I;HOLD;10;1.0", Field::Side),
            ("09:00:00;AAA;1;I;BUY;ten;1.0", Field::Volume),
            ("09:00:00;AAA;1;I;BUY;10;abc", Field::Price),
            ("09:00:00;AAA;1;I;BUY;10;NaN", Field::Price),
            ("09:00:00;;1;I;BUY;10;1.0", Field::Symbol),
            (";AAA;1;I;BUY;10;1.0", Field::Timestamp),
        ];

        for (line, field) in cases {
            match line.parse::<OrderEvent>() {
                Err(ParseError::InvalidField { field: got, .. }) => {
                    assert_eq!(got, field, "wrong field for {line}")
                }
                other => panic!("expected invalid {field} for {line}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_trailing_data_rejected() {
        let err = "09:00:00;AAA;1;I;BUY;10;1.0;extra"
            .parse::<OrderEvent>()
            .unwrap_err();
        assert_eq!(err, ParseError::TrailingData("extra".to_string()));
    }

    #[test]
    fn test_field_names() {
        let names: Vec<_> = Field::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(
            names,
            ["timestamp", "symbol", "orderId", "operation", "side", "volume", "price"]
        );
    }
}
