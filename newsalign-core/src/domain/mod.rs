//! Domain types for the sentiment/price pipeline

pub mod article;
pub mod bar;
pub mod regression;
pub mod series;

pub use article::{ArticleRecord, ScoredArticle, ValidArticle};
pub use bar::DailyMarketBar;
pub use regression::{LinearModel, RegressionResult};
pub use series::{AlignedRow, AlignedSeries, DailySentiment, DayScore};
