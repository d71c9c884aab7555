//! Report export: JSON, CSV, and Markdown artifacts.
//!
//! - **JSON**: the full `PipelineReport`, versioned
//! - **CSV**: the aligned series and the daily sentiment table
//! - **Markdown**: a human-readable run summary

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use newsalign_core::{AlignedSeries, DailySentiment};

use crate::pipeline::{PipelineReport, SCHEMA_VERSION};

// ─── JSON ───────────────────────────────────────────────────────────

pub fn export_json(report: &PipelineReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize PipelineReport to JSON")
}

/// Deserialize a report, rejecting newer schema versions.
pub fn import_json(json: &str) -> Result<PipelineReport> {
    let report: PipelineReport =
        serde_json::from_str(json).context("failed to deserialize PipelineReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV ────────────────────────────────────────────────────────────

/// Columns: date, close, sentiment. Missing sentiment is an empty cell.
pub fn export_aligned_csv(series: &AlignedSeries) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "close", "sentiment"])?;
    for row in series.rows() {
        wtr.write_record([
            row.date.to_string(),
            format!("{:.4}", row.close),
            row.sentiment.map(|s| format!("{s:.6}")).unwrap_or_default(),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Columns: date, mean_sentiment, article_count.
pub fn export_daily_csv(daily: &DailySentiment) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "mean_sentiment", "article_count"])?;
    for (date, day) in daily.iter() {
        wtr.write_record([
            date.to_string(),
            format!("{:.6}", day.mean),
            day.article_count.to_string(),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Markdown ───────────────────────────────────────────────────────

fn fmt_opt(v: Option<f64>, places: usize) -> String {
    v.map(|x| format!("{x:.places$}"))
        .unwrap_or_else(|| "n/a".into())
}

pub fn render_markdown(report: &PipelineReport) -> String {
    let mut md = String::with_capacity(2048);
    let c = &report.counts;
    let r = &report.regression;

    // Writing to a String cannot fail.
    let _ = writeln!(md, "# Sentiment vs. Close: {}\n", report.ticker);

    md.push_str("## Run\n\n");
    md.push_str("| Field | Value |\n| --- | --- |\n");
    let _ = writeln!(md, "| Period | {} to {} |", report.start, report.end);
    let _ = writeln!(md, "| Articles | {} |", report.article_source);
    let _ = writeln!(md, "| Market Data | {} |", report.market_source);
    if report.synthetic {
        md.push_str("| Data | **SYNTHETIC** |\n");
    }
    let _ = writeln!(md, "| Missing Policy | {} |", report.missing_policy);
    let _ = writeln!(
        md,
        "| Split | {:.0}% test, seed {} |",
        report.test_fraction * 100.0,
        report.seed
    );
    let _ = writeln!(md, "| Run ID | {} |", short_hash(&report.run_id));
    let _ = writeln!(md, "| Dataset Hash | {} |", short_hash(&report.dataset_hash));
    md.push('\n');

    md.push_str("## Data\n\n");
    md.push_str("| Stage | Count |\n| --- | --- |\n");
    let _ = writeln!(md, "| Articles fetched | {} |", c.fetched);
    let _ = writeln!(md, "| Rejected (no date) | {} |", c.rejected_missing_date);
    let _ = writeln!(md, "| Rejected (no content) | {} |", c.rejected_missing_content);
    let _ = writeln!(md, "| Articles scored | {} |", c.accepted);
    let _ = writeln!(md, "| Days with sentiment | {} |", c.sentiment_days);
    let _ = writeln!(md, "| Trading days | {} |", c.trading_days);
    let _ = writeln!(md, "| Trading days without news | {} |", c.missing_days);
    let _ = writeln!(md, "| Rows evaluated | {} |", c.resolved_rows);
    md.push('\n');

    md.push_str("## Regression\n\n");
    md.push_str("| Metric | Value |\n| --- | --- |\n");
    let _ = writeln!(md, "| Slope | {:.4} |", r.slope());
    let _ = writeln!(md, "| Intercept | {:.4} |", r.intercept());
    let _ = writeln!(md, "| Test MSE | {:.4} |", r.mean_squared_error());
    let _ = writeln!(md, "| Train / Test | {} / {} |", r.train_size(), r.test_size());
    let _ = writeln!(md, "| Correlation | {} |", fmt_opt(report.correlation, 4));
    let _ = writeln!(
        md,
        "| Mean Sentiment | {} ({}) |",
        fmt_opt(report.mean_sentiment, 3),
        report.label
    );

    md
}

fn short_hash(h: &str) -> &str {
    h.get(..12).unwrap_or(h)
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the artifact set for one run.
///
/// Creates `{ticker}_{timestamp}/` under `output_dir` with `report.json`,
/// `aligned.csv`, `daily.csv`, and `report.md`. Returns the directory.
pub fn save_artifacts(report: &PipelineReport, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!(
        "{}_{}",
        report.ticker,
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    std::fs::write(run_dir.join("report.json"), export_json(report)?)?;
    std::fs::write(run_dir.join("aligned.csv"), export_aligned_csv(&report.aligned)?)?;
    std::fs::write(run_dir.join("daily.csv"), export_daily_csv(&report.daily)?)?;
    std::fs::write(run_dir.join("report.md"), render_markdown(report))?;

    Ok(run_dir)
}

/// Load a report from an artifact directory.
pub fn load_artifacts(dir: &Path) -> Result<PipelineReport> {
    let path = dir.join("report.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use newsalign_core::AlignedRow;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 3, day).unwrap()
    }

    #[test]
    fn aligned_csv_leaves_missing_cells_empty() {
        let series = AlignedSeries::from_rows(vec![
            AlignedRow {
                date: d(1),
                close: 100.0,
                sentiment: Some(0.5),
            },
            AlignedRow {
                date: d(2),
                close: 102.0,
                sentiment: None,
            },
        ]);
        let csv = export_aligned_csv(&series).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "date,close,sentiment");
        assert_eq!(lines[1], "2023-03-01,100.0000,0.500000");
        assert_eq!(lines[2], "2023-03-02,102.0000,");
    }

    #[test]
    fn daily_csv_has_counts() {
        let daily = DailySentiment::from_observations([(d(1), 0.2), (d(1), 0.4), (d(3), -0.1)]);
        let csv = export_daily_csv(&daily).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "2023-03-01,0.300000,2");
        assert_eq!(lines[2], "2023-03-03,-0.100000,1");
    }

    #[test]
    fn short_hash_handles_short_input() {
        assert_eq!(short_hash("abc"), "abc");
        assert_eq!(short_hash("0123456789abcdef"), "0123456789ab");
    }
}
