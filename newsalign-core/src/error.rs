//! Errors raised by the core pipeline stages.
//!
//! Every variant is returned to the caller as-is. The core does not log,
//! retry, or fall back to default values.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("invalid publication date {raw:?} on article '{headline}'")]
    InvalidDate {
        headline: String,
        raw: Option<String>,
    },

    #[error("row {date} has no sentiment; resolve missing rows before evaluation")]
    IncompleteRow { date: NaiveDate },

    #[error("row {date} has a non-finite {field}")]
    NonFiniteValue {
        date: NaiveDate,
        field: &'static str,
    },

    #[error("insufficient data: {reason}")]
    InsufficientData { reason: String },

    #[error("aligned series has {actual} rows but the market index has {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("sentiment score {score} for '{headline}' is outside [-1, 1]")]
    SentimentOutOfRange { headline: String, score: f64 },
}
