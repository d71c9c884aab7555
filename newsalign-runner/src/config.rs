//! Serializable pipeline configuration.
//!
//! A run is described by a TOML file:
//!
//! ```toml
//! ticker = "AAPL"
//! start_date = "2023-01-01"
//! end_date = "2023-12-31"
//!
//! [articles]
//! type = "csv"
//! path = "data/articles.csv"
//!
//! [market]
//! type = "synthetic"
//!
//! [evaluation]
//! test_fraction = 0.2
//! seed = 42
//! missing_policy = "drop"
//! ```

use chrono::NaiveDate;
use newsalign_core::MissingPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Content-addressed identifier for a run configuration.
pub type RunId = String;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("failed to parse config TOML: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Full configuration for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    pub ticker: String,

    /// Market data start date (inclusive)
    pub start_date: NaiveDate,

    /// Market data end date (inclusive)
    pub end_date: NaiveDate,

    pub articles: ArticleSourceConfig,

    pub market: MarketSourceConfig,

    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

/// Where articles come from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArticleSourceConfig {
    /// CSV with `headline,date,content` columns.
    Csv { path: PathBuf },

    /// Saved NewsAPI `everything` response.
    NewsapiJson { path: PathBuf },
}

/// Where daily bars come from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarketSourceConfig {
    /// CSV with `date,open,high,low,close,volume` columns.
    Csv { path: PathBuf },

    /// Yahoo Finance v8 chart API.
    Yahoo,

    /// Deterministic random walk, for development without market data.
    Synthetic,
}

/// Regression evaluation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Share of rows held out for testing, in (0, 1).
    pub test_fraction: f64,

    /// Seed for the train/test partition.
    pub seed: u64,

    /// How rows without sentiment are handled before evaluation.
    pub missing_policy: MissingPolicy,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
            missing_policy: MissingPolicy::Drop,
        }
    }
}

impl PipelineConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ticker.trim().is_empty() {
            return Err(ConfigError::Invalid("ticker must not be empty".into()));
        }
        if self.end_date < self.start_date {
            return Err(ConfigError::Invalid(format!(
                "end_date {} is before start_date {}",
                self.end_date, self.start_date
            )));
        }
        let f = self.evaluation.test_fraction;
        if !f.is_finite() || f <= 0.0 || f >= 1.0 {
            return Err(ConfigError::Invalid(format!(
                "evaluation.test_fraction must be in (0, 1), got {f}"
            )));
        }
        Ok(())
    }

    /// Same configuration for a different ticker.
    pub fn for_ticker(&self, ticker: &str) -> Self {
        Self {
            ticker: ticker.to_uppercase(),
            ..self.clone()
        }
    }

    /// Deterministic hash ID for this configuration.
    ///
    /// Two runs with identical configs share a RunId.
    pub fn run_id(&self) -> RunId {
        // Serializing plain data (strings, dates, numbers, enums) cannot fail.
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
ticker = "AAPL"
start_date = "2023-01-01"
end_date = "2023-12-31"

[articles]
type = "csv"
path = "data/articles.csv"

[market]
type = "synthetic"

[evaluation]
test_fraction = 0.25
seed = 7
missing_policy = "forward_fill"
"#;

    #[test]
    fn parses_full_config() {
        let config = PipelineConfig::from_toml(SAMPLE).unwrap();
        assert_eq!(config.ticker, "AAPL");
        assert_eq!(config.start_date, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(
            config.articles,
            ArticleSourceConfig::Csv {
                path: PathBuf::from("data/articles.csv")
            }
        );
        assert_eq!(config.market, MarketSourceConfig::Synthetic);
        assert_eq!(config.evaluation.test_fraction, 0.25);
        assert_eq!(config.evaluation.seed, 7);
        assert_eq!(config.evaluation.missing_policy, MissingPolicy::ForwardFill);
    }

    #[test]
    fn evaluation_section_defaults() {
        let toml = r#"
ticker = "MSFT"
start_date = "2023-01-01"
end_date = "2023-06-30"

[articles]
type = "newsapi_json"
path = "news.json"

[market]
type = "yahoo"
"#;
        let config = PipelineConfig::from_toml(toml).unwrap();
        assert_eq!(config.evaluation, EvaluationConfig::default());
        assert_eq!(config.market, MarketSourceConfig::Yahoo);
    }

    #[test]
    fn rejects_inverted_dates() {
        let toml = SAMPLE.replace("2023-12-31", "2022-12-31");
        assert!(matches!(
            PipelineConfig::from_toml(&toml),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_bad_test_fraction() {
        let toml = SAMPLE.replace("0.25", "1.0");
        assert!(matches!(
            PipelineConfig::from_toml(&toml),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_unknown_source_type() {
        let toml = SAMPLE.replace("type = \"synthetic\"", "type = \"bloomberg\"");
        assert!(matches!(
            PipelineConfig::from_toml(&toml),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn run_id_is_deterministic_and_sensitive_to_seed() {
        let config = PipelineConfig::from_toml(SAMPLE).unwrap();
        assert_eq!(config.run_id(), config.run_id());
        assert_eq!(config.run_id().len(), 64);

        let mut other = config.clone();
        other.evaluation.seed = 8;
        assert_ne!(config.run_id(), other.run_id());
    }

    #[test]
    fn for_ticker_only_changes_ticker() {
        let config = PipelineConfig::from_toml(SAMPLE).unwrap();
        let msft = config.for_ticker("msft");
        assert_eq!(msft.ticker, "MSFT");
        assert_eq!(msft.evaluation, config.evaluation);
        assert_ne!(msft.run_id(), config.run_id());
    }
}
