//! Identifiers and small scalars shared by the record types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Exchange timestamp: milliseconds since the Unix epoch.
///
/// Only the integer form is accepted on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeMs(pub i64);

impl TimeMs {
    pub fn new(ms: i64) -> Self {
        TimeMs(ms)
    }

    pub fn as_ms(&self) -> i64 {
        self.0
    }
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                $name(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Account that owns a deposit or withdrawal.
    Address
);

string_id!(
    /// Contract symbol as quoted by the exchange, e.g. `XBTUSD`.
    Symbol
);

/// Aggressor side of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Signed unit for position arithmetic: `1` for buys, `-1` for sells.
    pub fn sign(&self) -> Decimal {
        match self {
            Side::Buy => Decimal::ONE,
            Side::Sell => Decimal::NEGATIVE_ONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_wire_names() {
        assert_eq!(serde_json::to_string(&Side::Buy).unwrap(), "\"Buy\"");
        let sell: Side = serde_json::from_str("\"Sell\"").unwrap();
        assert_eq!(sell.sign(), Decimal::NEGATIVE_ONE);
        assert!(serde_json::from_str::<Side>("\"sell\"").is_err());
    }

    #[test]
    fn test_string_ids_are_transparent() {
        let symbol: Symbol = serde_json::from_str("\"XBTUSD\"").unwrap();
        assert_eq!(symbol, Symbol::new("XBTUSD"));
        assert_eq!(symbol.to_string(), "XBTUSD");
        assert_eq!(serde_json::to_string(&Address::new("0xabc")).unwrap(), "\"0xabc\"");
    }

    #[test]
    fn test_timestamp_rejects_strings() {
        assert_eq!(serde_json::to_string(&TimeMs::new(1000)).unwrap(), "1000");
        assert!(serde_json::from_str::<TimeMs>("\"1000\"").is_err());
        assert!(TimeMs::new(1000) < TimeMs::new(2000));
    }
}
