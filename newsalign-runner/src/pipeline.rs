//! Pipeline orchestration.
//!
//! One run is a fresh composition of the core stages:
//!
//! ```text
//! fetch articles → prefilter → score → aggregate
//!                                          ↓
//! fetch bars ──────────────────────────→ align → resolve → evaluate
//! ```
//!
//! Nothing is cached between runs. `run_batch` fans independent tickers out
//! over rayon; each ticker gets its own sources and its own result.

use chrono::NaiveDate;
use newsalign_core::{
    aggregate, align, fit_and_evaluate, pearson_correlation, prefilter, resolve_missing,
    score_articles, stats, AlignedSeries, ArticleSource, CoreError, DailySentiment, DataSource,
    MarketDataSource, MissingPolicy, RegressionResult, RejectReason, Rejection, SentimentLabel,
    SentimentScorer, SourceError, TextCleaner,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{
    ArticleSourceConfig, ConfigError, MarketSourceConfig, PipelineConfig, RunId,
};
use crate::sources::{
    CsvArticleSource, CsvBarSource, NewsApiFileSource, SyntheticBarSource, YahooChartSource,
};

/// Version of the serialized `PipelineReport` layout.
pub const SCHEMA_VERSION: u32 = 1;

/// Placeholder in source paths replaced by the run's ticker.
pub const TICKER_PLACEHOLDER: &str = "{ticker}";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("source '{source_name}' failed: {source}")]
    Source {
        source_name: String,
        source: SourceError,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

// ─── Request / collaborators ─────────────────────────────────────────

/// Parameters of a single run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRequest {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub test_fraction: f64,
    pub seed: u64,
    pub missing_policy: MissingPolicy,
    pub run_id: RunId,
}

impl PipelineRequest {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            ticker: config.ticker.clone(),
            start: config.start_date,
            end: config.end_date,
            test_fraction: config.evaluation.test_fraction,
            seed: config.evaluation.seed,
            missing_policy: config.evaluation.missing_policy,
            run_id: config.run_id(),
        }
    }
}

/// The four collaborators a run is wired with.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub articles: &'a dyn ArticleSource,
    pub market: &'a dyn MarketDataSource,
    pub cleaner: &'a dyn TextCleaner,
    pub scorer: &'a dyn SentimentScorer,
}

/// Owned article and market sources built from a config.
pub struct SourceSet {
    pub articles: Box<dyn ArticleSource>,
    pub market: Box<dyn MarketDataSource>,
}

impl SourceSet {
    pub fn collaborators<'a>(
        &'a self,
        cleaner: &'a dyn TextCleaner,
        scorer: &'a dyn SentimentScorer,
    ) -> Collaborators<'a> {
        Collaborators {
            articles: self.articles.as_ref(),
            market: self.market.as_ref(),
            cleaner,
            scorer,
        }
    }
}

fn with_ticker(path: &Path, ticker: &str) -> PathBuf {
    PathBuf::from(path.to_string_lossy().replace(TICKER_PLACEHOLDER, ticker))
}

/// Instantiate the sources a config names.
///
/// `{ticker}` in a file path is replaced by the config's ticker, so one
/// config can serve a batch of tickers with per-ticker files.
pub fn build_sources(config: &PipelineConfig) -> Result<SourceSet, PipelineError> {
    let ticker = config.ticker.as_str();

    let articles: Box<dyn ArticleSource> = match &config.articles {
        ArticleSourceConfig::Csv { path } => Box::new(CsvArticleSource::new(with_ticker(path, ticker))),
        ArticleSourceConfig::NewsapiJson { path } => {
            Box::new(NewsApiFileSource::new(with_ticker(path, ticker)))
        }
    };

    let market: Box<dyn MarketDataSource> = match &config.market {
        MarketSourceConfig::Csv { path } => Box::new(CsvBarSource::new(with_ticker(path, ticker))),
        MarketSourceConfig::Yahoo => {
            Box::new(YahooChartSource::new().map_err(|source| PipelineError::Source {
                source_name: "yahoo_finance".into(),
                source,
            })?)
        }
        MarketSourceConfig::Synthetic => Box::new(SyntheticBarSource::new()),
    };

    Ok(SourceSet { articles, market })
}

// ─── Report ──────────────────────────────────────────────────────────

/// Record counts at each stage of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCounts {
    pub fetched: usize,
    pub accepted: usize,
    pub rejected_missing_date: usize,
    pub rejected_missing_content: usize,
    pub sentiment_days: usize,
    pub trading_days: usize,
    pub missing_days: usize,
    pub resolved_rows: usize,
}

/// Everything a completed run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub schema_version: u32,
    pub ticker: String,
    pub run_id: RunId,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub article_source: String,
    pub market_source: String,
    pub market_kind: DataSource,
    /// True when closes came from the synthetic generator.
    pub synthetic: bool,
    pub missing_policy: MissingPolicy,
    pub test_fraction: f64,
    pub seed: u64,
    pub counts: StageCounts,
    pub rejections: Vec<Rejection>,
    pub daily: DailySentiment,
    pub aligned: AlignedSeries,
    pub resolved: AlignedSeries,
    pub regression: RegressionResult,
    /// Pearson r between sentiment and close over the resolved rows.
    pub correlation: Option<f64>,
    /// Mean of the daily sentiment means.
    pub mean_sentiment: Option<f64>,
    pub label: SentimentLabel,
    /// BLAKE3 over the aligned rows.
    pub dataset_hash: String,
}

/// Content hash of an aligned series. Identical inputs hash identically.
pub fn dataset_hash(series: &AlignedSeries) -> String {
    let mut hasher = blake3::Hasher::new();
    for row in series.rows() {
        hasher.update(row.date.to_string().as_bytes());
        hasher.update(&row.close.to_le_bytes());
        match row.sentiment {
            Some(s) => {
                hasher.update(&[1]);
                hasher.update(&s.to_le_bytes());
            }
            None => {
                hasher.update(&[0]);
            }
        }
    }
    hasher.finalize().to_hex().to_string()
}

// ─── Run ─────────────────────────────────────────────────────────────

/// Run the full pipeline for one ticker.
#[tracing::instrument(skip_all, err, fields(ticker = %request.ticker))]
pub fn run_pipeline(
    request: &PipelineRequest,
    collab: &Collaborators<'_>,
) -> Result<PipelineReport, PipelineError> {
    let records = collab
        .articles
        .fetch_articles()
        .map_err(|source| PipelineError::Source {
            source_name: collab.articles.name().to_string(),
            source,
        })?;
    let fetched = records.len();
    tracing::info!(source = collab.articles.name(), fetched, "fetched articles");

    let filtered = prefilter(records);
    let counts_rejected = (
        filtered.rejected_for(RejectReason::MissingDate),
        filtered.rejected_for(RejectReason::MissingContent),
    );
    if !filtered.rejected.is_empty() {
        tracing::warn!(
            missing_date = counts_rejected.0,
            missing_content = counts_rejected.1,
            "dropped articles during pre-validation"
        );
    }
    let accepted = filtered.accepted.len();

    let scored = score_articles(filtered.accepted, collab.cleaner, collab.scorer)?;
    let daily = aggregate(&scored)?;
    tracing::debug!(scored = scored.len(), days = daily.len(), "aggregated daily sentiment");

    let bars = collab
        .market
        .fetch_daily_bars(&request.ticker, request.start, request.end)
        .map_err(|source| PipelineError::Source {
            source_name: collab.market.name().to_string(),
            source,
        })?;
    let market_kind = collab.market.kind();
    let synthetic = market_kind == DataSource::Synthetic;
    if synthetic {
        tracing::warn!("using synthetic market data; results are not meaningful");
    }
    tracing::info!(source = collab.market.name(), bars = bars.len(), "fetched daily bars");

    let aligned = align(&daily, &bars)?;
    let missing_days = aligned.missing_count();
    tracing::debug!(rows = aligned.len(), missing_days, "aligned onto trading days");

    let resolved = resolve_missing(&aligned, request.missing_policy);
    tracing::debug!(
        policy = ?request.missing_policy,
        rows = resolved.len(),
        "resolved missing sentiment"
    );

    let regression = fit_and_evaluate(&resolved, request.test_fraction, request.seed)?;
    tracing::info!(
        mse = regression.mean_squared_error(),
        slope = regression.slope(),
        train = regression.train_size(),
        test = regression.test_size(),
        "evaluated regression"
    );

    let (xs, ys) = resolved.complete_pairs();
    let correlation = pearson_correlation(&xs, &ys);

    let day_means: Vec<f64> = daily.iter().map(|(_, d)| d.mean).collect();
    let mean_sentiment = stats::mean(&day_means);
    let label = SentimentLabel::from_score(mean_sentiment.unwrap_or(0.0));

    Ok(PipelineReport {
        schema_version: SCHEMA_VERSION,
        ticker: request.ticker.clone(),
        run_id: request.run_id.clone(),
        start: request.start,
        end: request.end,
        article_source: collab.articles.name().to_string(),
        market_source: collab.market.name().to_string(),
        market_kind,
        synthetic,
        missing_policy: request.missing_policy,
        test_fraction: request.test_fraction,
        seed: request.seed,
        counts: StageCounts {
            fetched,
            accepted,
            rejected_missing_date: counts_rejected.0,
            rejected_missing_content: counts_rejected.1,
            sentiment_days: daily.len(),
            trading_days: aligned.len(),
            missing_days,
            resolved_rows: resolved.len(),
        },
        rejections: filtered.rejected,
        dataset_hash: dataset_hash(&aligned),
        daily,
        aligned,
        resolved,
        regression,
        correlation,
        mean_sentiment,
        label,
    })
}

/// Build sources from a config and run it.
pub fn run_config(
    config: &PipelineConfig,
    cleaner: &dyn TextCleaner,
    scorer: &dyn SentimentScorer,
) -> Result<PipelineReport, PipelineError> {
    config.validate()?;
    let sources = build_sources(config)?;
    let request = PipelineRequest::from_config(config);
    run_pipeline(&request, &sources.collaborators(cleaner, scorer))
}

/// Outcome of one ticker in a batch.
#[derive(Debug)]
pub struct BatchOutcome {
    pub ticker: String,
    pub result: Result<PipelineReport, PipelineError>,
}

/// Run the same config for several tickers in parallel.
///
/// Outcomes come back in input order. A failing ticker never affects the
/// others.
pub fn run_batch(
    config: &PipelineConfig,
    tickers: &[String],
    cleaner: &dyn TextCleaner,
    scorer: &dyn SentimentScorer,
) -> Vec<BatchOutcome> {
    tracing::info!(tickers = tickers.len(), "starting batch");

    tickers
        .par_iter()
        .map(|ticker| {
            let ticker_config = config.for_ticker(ticker);
            let result = run_config(&ticker_config, cleaner, scorer);
            if let Err(e) = &result {
                tracing::warn!(ticker = %ticker_config.ticker, error = %e, "ticker failed");
            }
            BatchOutcome {
                ticker: ticker_config.ticker,
                result,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsalign_core::{AlignedRow, ArticleRecord, DailyMarketBar};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 3, day).unwrap()
    }

    #[test]
    fn ticker_placeholder_is_substituted() {
        let p = with_ticker(Path::new("data/{ticker}/news.csv"), "AAPL");
        assert_eq!(p, PathBuf::from("data/AAPL/news.csv"));
    }

    #[test]
    fn dataset_hash_distinguishes_missing_from_zero() {
        let with_none = AlignedSeries::from_rows(vec![AlignedRow {
            date: d(1),
            close: 100.0,
            sentiment: None,
        }]);
        let with_zero = AlignedSeries::from_rows(vec![AlignedRow {
            date: d(1),
            close: 100.0,
            sentiment: Some(0.0),
        }]);
        assert_ne!(dataset_hash(&with_none), dataset_hash(&with_zero));
        assert_eq!(dataset_hash(&with_none), dataset_hash(&with_none.clone()));
    }

    struct Fixed(Vec<ArticleRecord>);

    impl ArticleSource for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }
        fn fetch_articles(&self) -> Result<Vec<ArticleRecord>, SourceError> {
            Ok(self.0.clone())
        }
    }

    struct Down;

    impl MarketDataSource for Down {
        fn name(&self) -> &str {
            "down"
        }
        fn kind(&self) -> DataSource {
            DataSource::YahooFinance
        }
        fn fetch_daily_bars(
            &self,
            _: &str,
            _: NaiveDate,
            _: NaiveDate,
        ) -> Result<Vec<DailyMarketBar>, SourceError> {
            Err(SourceError::NetworkUnreachable("offline".into()))
        }
    }

    #[test]
    fn market_failure_names_the_source() {
        let articles = Fixed(vec![ArticleRecord::new("h", Some("2023-03-01"), Some("up"))]);
        let collab = Collaborators {
            articles: &articles,
            market: &Down,
            cleaner: &newsalign_core::BasicCleaner,
            scorer: &newsalign_core::LexiconScorer::new(),
        };
        let request = PipelineRequest {
            ticker: "AAPL".into(),
            start: d(1),
            end: d(31),
            test_fraction: 0.2,
            seed: 42,
            missing_policy: MissingPolicy::Drop,
            run_id: "test".into(),
        };

        let err = run_pipeline(&request, &collab).unwrap_err();
        match err {
            PipelineError::Source { source_name, source } => {
                assert_eq!(source_name, "down");
                assert!(matches!(source, SourceError::NetworkUnreachable(_)));
            }
            other => panic!("expected source error, got {other:?}"),
        }
    }
}
