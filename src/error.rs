use crate::config::ConfigError;
use thiserror::Error;

/// Failure to construct a [`Money`](crate::domain::Money) value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// The magnitude carries more fractional digits than the unit allows.
    #[error("invalid precision: {value} has more than {allowed} decimal places for {unit}")]
    InvalidPrecision {
        value: String,
        unit: &'static str,
        allowed: u32,
    },
    /// The text is not a decimal literal.
    #[error("invalid amount {0}")]
    Parse(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Rejected record on line {line}: {message}")]
    Rejected { line: usize, message: String },
}
