//! Error types for slot-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    /// A range was supplied with `start > end`.
    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    /// Weekly mask is zero or does not fit in 7 bits.
    #[error("Invalid weekly availability mask: {0} (expected 1..=127)")]
    InvalidAvailabilityMask(u32),

    #[error("Invalid availability window: {0}")]
    InvalidWindow(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid slot request: {0}")]
    InvalidRequest(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SlotError>;
