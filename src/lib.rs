pub mod audit;
pub mod config;
pub mod domain;
pub mod error;

pub use audit::{AuditReport, Auditor, Rejection};
pub use config::Config;
pub use domain::{
    Address, Deposit, Dollar, LastPrice, Money, Record, RecordKind, Satoshi, Sats, Side, Symbol,
    TimeMs, Trade, Unit, Usd,
};
pub use error::{AppError, MoneyError};
