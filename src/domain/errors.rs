use thiserror::Error;

use crate::domain::refresh::RefreshUnit;

/// Errors raised while turning a raw snapshot body into asset records
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("snapshot payload is not a JSON array: {0}")]
    MalformedDocument(String),

    #[error("record rejected: {0}")]
    MalformedRecord(String),

    #[error("{symbol}: market cap is zero, volume ratio is undefined")]
    ZeroMarketCap { symbol: String },
}

/// Errors raised when committing a new refresh interval
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("refresh interval must be a positive whole number")]
    NonPositive,

    #[error("refresh interval in {unit} must be at most {max}")]
    OutOfRange { unit: RefreshUnit, max: u32 },
}
