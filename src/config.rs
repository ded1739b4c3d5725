use crate::domain::RecordKind;
use rust_decimal::RoundingStrategy;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub input_path: String,
    pub record_kind: RecordKind,
    pub fail_fast: bool,
    pub rounding: RoundingMode,
}

/// Rounding applied when a scaled amount is turned back into money.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingMode {
    HalfEven,
    HalfUp,
    Down,
}

impl RoundingMode {
    pub fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::Down => RoundingStrategy::ToZero,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let input_path = env_map
            .get("AUDIT_INPUT_PATH")
            .cloned()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnv("AUDIT_INPUT_PATH".to_string()))?;

        let record_kind = env_map
            .get("AUDIT_RECORD_KIND")
            .map(|s| s.as_str())
            .unwrap_or("trade")
            .parse::<RecordKind>()
            .map_err(|e| ConfigError::InvalidValue("AUDIT_RECORD_KIND".to_string(), e))?;

        let fail_fast = match env_map
            .get("AUDIT_FAIL_FAST")
            .map(|s| s.as_str())
            .unwrap_or("false")
        {
            "true" | "1" => true,
            "false" | "0" => false,
            other => {
                return Err(ConfigError::InvalidValue(
                    "AUDIT_FAIL_FAST".to_string(),
                    format!("must be true or false, got {}", other),
                ))
            }
        };

        let rounding = match env_map
            .get("AUDIT_ROUNDING")
            .map(|s| s.as_str())
            .unwrap_or("half_even")
        {
            "half_even" => RoundingMode::HalfEven,
            "half_up" => RoundingMode::HalfUp,
            "down" => RoundingMode::Down,
            other => {
                return Err(ConfigError::InvalidValue(
                    "AUDIT_ROUNDING".to_string(),
                    format!("must be half_even, half_up, or down, got {}", other),
                ))
            }
        };

        Ok(Config {
            input_path,
            record_kind,
            fail_fast,
            rounding,
        })
    }
}
