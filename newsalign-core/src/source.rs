//! Collaborator traits and their structured error type.
//!
//! Article fetching, text cleaning, sentiment scoring, and market data all sit
//! behind these traits so implementations can be swapped and mocked in tests.
//! The core stages never call them directly; the runner wires them together.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{ArticleRecord, DailyMarketBar};

/// Errors from article and market data sources.
///
/// These are designed to be displayable in CLI output.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no data for '{ticker}' between {start} and {end}")]
    EmptyRange {
        ticker: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("failed to read {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    #[error("source error: {0}")]
    Other(String),
}

/// Where market data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    YahooFinance,
    CsvImport,
    Synthetic,
}

/// Yields raw article records. Records may lack a date or content.
pub trait ArticleSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    fn fetch_articles(&self) -> Result<Vec<ArticleRecord>, SourceError>;
}

/// Normalizes article text before scoring. Must be pure.
pub trait TextCleaner: Send + Sync {
    fn clean(&self, text: &str) -> String;
}

/// Maps cleaned text to a polarity in [-1, 1]. Must be pure.
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> f64;
}

/// Supplies daily bars for a ticker. The returned trading dates are the
/// authoritative axis for alignment.
pub trait MarketDataSource: Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> DataSource;

    /// Fetch daily bars for `ticker` with `start <= date <= end`, ascending.
    fn fetch_daily_bars(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyMarketBar>, SourceError>;
}
