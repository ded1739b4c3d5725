//! Last-price ticks and kind-directed decoding of wire records.

use crate::domain::{Deposit, Symbol, TimeMs, Trade, Usd};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Latest traded price for a contract.
///
/// The exchange has published this shape with the time both as epoch
/// milliseconds and as a string. Only the millisecond form is accepted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastPrice {
    pub symbol: Symbol,
    pub price: Usd,
    pub timestamp: TimeMs,
}

/// Which record shape a stream carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Trade,
    Deposit,
    LastPrice,
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trade" => Ok(RecordKind::Trade),
            "deposit" => Ok(RecordKind::Deposit),
            "last_price" => Ok(RecordKind::LastPrice),
            other => Err(format!(
                "must be trade, deposit, or last_price, got {}",
                other
            )),
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Trade => write!(f, "trade"),
            RecordKind::Deposit => write!(f, "deposit"),
            RecordKind::LastPrice => write!(f, "last_price"),
        }
    }
}

/// One decoded record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Trade(Trade),
    Deposit(Deposit),
    LastPrice(LastPrice),
}

impl Record {
    /// Decode a JSON document as a record of the given kind.
    ///
    /// Any invalid money field fails the whole record.
    pub fn decode(kind: RecordKind, json: &str) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            RecordKind::Trade => Record::Trade(serde_json::from_str(json)?),
            RecordKind::Deposit => Record::Deposit(serde_json::from_str(json)?),
            RecordKind::LastPrice => Record::LastPrice(serde_json::from_str(json)?),
        })
    }
}
