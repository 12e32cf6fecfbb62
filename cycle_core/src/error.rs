//! Error types for the cycle_core library.

use chrono::NaiveDate;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for cycle_core operations
///
/// The derivation functions only ever return [`Error::FutureLastPeriod`]
/// or [`Error::DateOutOfRange`]; everything else belongs to the record sources, config loading and the CLI.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Gestational dating requested for a last period that lies after `today`
    #[error("Last period date {last_period} is after {today}; gestational age is undefined")]
    FutureLastPeriod {
        last_period: NaiveDate,
        today: NaiveDate,
    },

    /// A derived date would fall outside the representable calendar
    #[error("Date {0} is too far out to derive a due date from")]
    DateOutOfRange(NaiveDate),

    /// A user-supplied date argument could not be parsed
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
