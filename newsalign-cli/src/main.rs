//! newsalign CLI — run the sentiment/close pipeline from the command line.
//!
//! Commands:
//! - `run` — one ticker, from a TOML config or from flags
//! - `batch` — one config, several tickers in parallel
//! - `score` — clean and score a piece of text with the built-in lexicon

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use newsalign_core::{
    BasicCleaner, LexiconScorer, MissingPolicy, SentimentLabel, SentimentScorer, TextCleaner,
};
use newsalign_runner::{
    export_json, render_markdown, run_batch, run_config, save_artifacts, ArticleSourceConfig,
    EvaluationConfig, MarketSourceConfig, PipelineConfig, PipelineReport,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "newsalign",
    version,
    about = "Align daily news sentiment with closing prices and evaluate a linear fit"
)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline for one ticker.
    Run {
        /// Path to a TOML config file. Other source flags are ignored when set.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Ticker symbol (required without --config).
        #[arg(long)]
        ticker: Option<String>,

        /// Article file: `.json` is read as a NewsAPI response, anything else as CSV.
        #[arg(long)]
        articles: Option<PathBuf>,

        /// CSV file with daily bars.
        #[arg(long, conflicts_with_all = ["yahoo", "synthetic"])]
        bars: Option<PathBuf>,

        /// Fetch bars from Yahoo Finance.
        #[arg(long, default_value_t = false, conflicts_with = "synthetic")]
        yahoo: bool,

        /// Use synthetic bars (results are tagged).
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Start date (YYYY-MM-DD). Defaults to one year before --end.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Share of rows held out for testing.
        #[arg(long)]
        test_fraction: Option<f64>,

        /// Seed for the train/test partition.
        #[arg(long)]
        seed: Option<u64>,

        /// Missing sentiment handling: drop, forward-fill, or keep.
        #[arg(long)]
        missing: Option<MissingPolicy>,

        /// Print the full report as JSON instead of Markdown.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Write report.json, aligned.csv, daily.csv, and report.md here.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Run one config for several tickers in parallel.
    Batch {
        /// Path to a TOML config file. `{ticker}` in source paths is substituted.
        #[arg(long)]
        config: PathBuf,

        /// Tickers to run (e.g., AAPL MSFT NVDA).
        #[arg(long, required = true, num_args = 1..)]
        tickers: Vec<String>,

        /// Write per-ticker artifacts here.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Clean and score text with the built-in lexicon.
    Score {
        #[arg(required = true)]
        text: Vec<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            config,
            ticker,
            articles,
            bars,
            yahoo,
            synthetic,
            start,
            end,
            test_fraction,
            seed,
            missing,
            json,
            output_dir,
        } => {
            let mut config = match config {
                Some(path) => PipelineConfig::from_file(&path)?,
                None => config_from_flags(RunFlags {
                    ticker,
                    articles,
                    bars,
                    yahoo,
                    synthetic,
                    start,
                    end,
                })?,
            };
            apply_evaluation_overrides(&mut config.evaluation, test_fraction, seed, missing);
            config.validate()?;
            run_cmd(&config, json, output_dir.as_deref())
        }
        Commands::Batch {
            config,
            tickers,
            output_dir,
        } => batch_cmd(&config, &tickers, output_dir.as_deref()),
        Commands::Score { text } => {
            score_cmd(&text.join(" "));
            Ok(())
        }
    }
}

struct RunFlags {
    ticker: Option<String>,
    articles: Option<PathBuf>,
    bars: Option<PathBuf>,
    yahoo: bool,
    synthetic: bool,
    start: Option<String>,
    end: Option<String>,
}

fn parse_date(s: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("{flag} must be YYYY-MM-DD, got '{s}'"))
}

fn config_from_flags(flags: RunFlags) -> Result<PipelineConfig> {
    let Some(ticker) = flags.ticker else {
        bail!("--ticker is required without --config");
    };
    let Some(articles) = flags.articles else {
        bail!("--articles is required without --config");
    };

    let articles = match articles.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => {
            ArticleSourceConfig::NewsapiJson { path: articles }
        }
        _ => ArticleSourceConfig::Csv { path: articles },
    };

    let market = match (flags.bars, flags.yahoo, flags.synthetic) {
        (Some(path), _, _) => MarketSourceConfig::Csv { path },
        (None, true, _) => MarketSourceConfig::Yahoo,
        (None, false, true) => MarketSourceConfig::Synthetic,
        (None, false, false) => bail!("one of --bars, --yahoo, or --synthetic is required"),
    };

    let end_date = match flags.end.as_deref() {
        Some(s) => parse_date(s, "--end")?,
        None => chrono::Local::now().date_naive(),
    };
    let start_date = match flags.start.as_deref() {
        Some(s) => parse_date(s, "--start")?,
        None => end_date - chrono::Duration::days(365),
    };

    Ok(PipelineConfig {
        ticker: ticker.to_uppercase(),
        start_date,
        end_date,
        articles,
        market,
        evaluation: EvaluationConfig::default(),
    })
}

fn apply_evaluation_overrides(
    eval: &mut EvaluationConfig,
    test_fraction: Option<f64>,
    seed: Option<u64>,
    missing: Option<MissingPolicy>,
) {
    if let Some(f) = test_fraction {
        eval.test_fraction = f;
    }
    if let Some(s) = seed {
        eval.seed = s;
    }
    if let Some(m) = missing {
        eval.missing_policy = m;
    }
}

fn run_cmd(config: &PipelineConfig, json: bool, output_dir: Option<&Path>) -> Result<()> {
    tracing::debug!(?config, run_id = %config.run_id(), "resolved configuration");
    let report = run_config(config, &BasicCleaner, &LexiconScorer::new())?;

    if json {
        println!("{}", export_json(&report)?);
    } else {
        print!("{}", render_markdown(&report));
    }

    if let Some(dir) = output_dir {
        let run_dir = save_artifacts(&report, dir)?;
        eprintln!("Artifacts saved to: {}", run_dir.display());
    }
    Ok(())
}

fn batch_cmd(config_path: &Path, tickers: &[String], output_dir: Option<&Path>) -> Result<()> {
    let config = PipelineConfig::from_file(config_path)?;
    let outcomes = run_batch(&config, tickers, &BasicCleaner, &LexiconScorer::new());

    println!(
        "{:<8} {:>6} {:>10} {:>10} {:>8}  {}",
        "Ticker", "Rows", "MSE", "Slope", "Corr", "Label"
    );
    let mut failures = 0usize;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(report) => {
                print_batch_row(report);
                if let Some(dir) = output_dir {
                    save_artifacts(report, dir)?;
                }
            }
            Err(e) => {
                failures += 1;
                println!("{:<8} error: {e}", outcome.ticker);
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} tickers failed", outcomes.len());
    }
    Ok(())
}

fn print_batch_row(report: &PipelineReport) {
    let r = &report.regression;
    let corr = report
        .correlation
        .map(|c| format!("{c:.3}"))
        .unwrap_or_else(|| "n/a".into());
    println!(
        "{:<8} {:>6} {:>10.4} {:>10.4} {:>8}  {}{}",
        report.ticker,
        report.counts.resolved_rows,
        r.mean_squared_error(),
        r.slope(),
        corr,
        report.label,
        if report.synthetic { " (synthetic)" } else { "" }
    );
}

fn score_cmd(text: &str) {
    let cleaned = BasicCleaner.clean(text);
    let score = LexiconScorer::new().score(&cleaned);
    println!("cleaned: {cleaned}");
    println!("score:   {score:.3}");
    println!("label:   {}", SentimentLabel::from_score(score));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags() -> RunFlags {
        RunFlags {
            ticker: Some("aapl".into()),
            articles: Some(PathBuf::from("news.json")),
            bars: None,
            yahoo: false,
            synthetic: true,
            start: Some("2023-01-01".into()),
            end: Some("2023-06-30".into()),
        }
    }

    #[test]
    fn flags_build_a_config() {
        let config = config_from_flags(flags()).unwrap();
        assert_eq!(config.ticker, "AAPL");
        assert!(matches!(config.articles, ArticleSourceConfig::NewsapiJson { .. }));
        assert_eq!(config.market, MarketSourceConfig::Synthetic);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn csv_articles_by_default() {
        let mut f = flags();
        f.articles = Some(PathBuf::from("news.csv"));
        let config = config_from_flags(f).unwrap();
        assert!(matches!(config.articles, ArticleSourceConfig::Csv { .. }));
    }

    #[test]
    fn market_source_is_required() {
        let mut f = flags();
        f.synthetic = false;
        assert!(config_from_flags(f).is_err());
    }

    #[test]
    fn bad_date_is_reported() {
        let mut f = flags();
        f.start = Some("01/02/2023".into());
        let err = config_from_flags(f).unwrap_err();
        assert!(err.to_string().contains("--start"));
    }

    #[test]
    fn overrides_apply() {
        let mut eval = EvaluationConfig::default();
        apply_evaluation_overrides(&mut eval, Some(0.3), None, Some(MissingPolicy::Keep));
        assert_eq!(eval.test_fraction, 0.3);
        assert_eq!(eval.seed, 42);
        assert_eq!(eval.missing_policy, MissingPolicy::Keep);
    }

    #[test]
    fn cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
