//! Domain types for the derivatives API.
//!
//! This module provides:
//! - Fixed-precision money via `Money<U>` with `Dollar` and `Satoshi` units
//! - Domain primitives: TimeMs, Address, Symbol, Side
//! - Wire records that embed money fields: Trade, Deposit, LastPrice

pub mod deposit;
pub mod money;
pub mod primitives;
pub mod record;
pub mod trade;
pub mod unit;

pub use deposit::Deposit;
pub use money::{Money, Sats, Usd};
pub use primitives::{Address, Side, Symbol, TimeMs};
pub use record::{LastPrice, Record, RecordKind};
pub use trade::Trade;
pub use unit::{Dollar, Satoshi, SymbolPosition, Unit};
