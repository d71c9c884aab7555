//! newsalign core — daily sentiment aggregation, trading-day alignment, regression evaluation.
//!
//! This crate contains the pure part of the pipeline:
//! - Domain types (articles, bars, daily sentiment, aligned series, results)
//! - Explicit pre-validation of raw article records
//! - Scoring through pluggable cleaner/scorer collaborators
//! - Per-day sentiment aggregation
//! - Alignment onto the market's trading-day index with an explicit missing marker
//! - Caller-chosen missing-data resolution
//! - Seeded train/test split, OLS fit, and test-set MSE
//!
//! Every stage is a synchronous function of its inputs. Nothing here performs
//! I/O, logs, or keeps state between calls.

pub mod aggregate;
pub mod align;
pub mod domain;
pub mod error;
pub mod evaluate;
pub mod prefilter;
pub mod resolve;
pub mod score;
pub mod source;
pub mod stats;
pub mod text;

pub use aggregate::{aggregate, parse_calendar_date};
pub use align::{align, market_index};
pub use domain::{
    AlignedRow, AlignedSeries, ArticleRecord, DailyMarketBar, DailySentiment, DayScore,
    LinearModel, RegressionResult, ScoredArticle, ValidArticle,
};
pub use error::CoreError;
pub use evaluate::{fit_and_evaluate, fit_ols, mean_squared_error, train_test_split, Split};
pub use prefilter::{prefilter, Prefiltered, RejectReason, Rejection};
pub use resolve::{resolve_missing, MissingPolicy};
pub use score::score_articles;
pub use source::{
    ArticleSource, DataSource, MarketDataSource, SentimentScorer, SourceError, TextCleaner,
};
pub use stats::pearson_correlation;
pub use text::{BasicCleaner, LexiconScorer, SentimentLabel};
