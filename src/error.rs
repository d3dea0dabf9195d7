//! Recoverable failures at the command boundary
//!
//! Nothing here is fatal. `tick` never fails; configuration problems in
//! row/ball counts are clamped rather than reported.

use thiserror::Error;

/// Rejected round or board commands
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoundError {
    #[error("insufficient funds (stake={stake}, bankroll={bankroll})")]
    InsufficientFunds { stake: u64, bankroll: u64 },
    #[error("ball count out of range (requested={requested}, min={min}, max={max})")]
    InvalidBallCount { requested: u32, min: u32, max: u32 },
    #[error("invalid operation: {0}")]
    InvalidOperation(&'static str),
}

/// Problems loading or validating a [`crate::Config`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
