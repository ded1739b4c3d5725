//! Trade execution record.

use crate::domain::{Sats, Side, Symbol, TimeMs, Usd};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A single trade execution as reported by the exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub trade_id: String,
    pub symbol: Symbol,
    pub side: Side,
    /// Execution price per coin.
    pub price: Usd,
    /// Quantity in coins. Not a money amount, so any precision is allowed.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub size: Decimal,
    /// Fee charged, in satoshis. Negative for rebates.
    pub fee: Sats,
    pub timestamp: TimeMs,
}

impl Trade {
    /// Dollar value of the trade, `price * size`, rounded to the cent.
    /// `None` if the product overflows.
    pub fn notional(&self, strategy: RoundingStrategy) -> Option<Usd> {
        self.price
            .to_raw_decimal()
            .checked_mul(self.size)
            .map(|value| Usd::from_rounded(value, strategy))
    }

    /// Size signed by side (positive for buys).
    pub fn signed_size(&self) -> Decimal {
        self.size * self.side.sign()
    }
}
