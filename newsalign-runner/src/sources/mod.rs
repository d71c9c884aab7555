//! Concrete article and market data sources.

pub mod csv_articles;
pub mod csv_bars;
pub mod newsapi;
pub mod synthetic;
pub mod yahoo;

pub use csv_articles::CsvArticleSource;
pub use csv_bars::CsvBarSource;
pub use newsapi::NewsApiFileSource;
pub use synthetic::SyntheticBarSource;
pub use yahoo::YahooChartSource;
