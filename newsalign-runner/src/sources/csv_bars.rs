//! CSV market data source.
//!
//! Columns: `date,open,high,low,close,volume` (case-insensitive headers,
//! `Date`/`Close` style exports work). Rows outside the requested range are
//! ignored; the result is sorted by date with duplicate dates rejected.

use chrono::NaiveDate;
use newsalign_core::{DailyMarketBar, DataSource, MarketDataSource, SourceError};
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct BarRow {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volume: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct CsvBarSource {
    path: PathBuf,
}

impl CsvBarSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse all bars from a reader, sorted ascending by date.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<DailyMarketBar>, SourceError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| SourceError::MalformedRecord {
                line: 1,
                reason: e.to_string(),
            })?
            .iter()
            .map(|h| h.to_lowercase())
            .collect::<csv::StringRecord>();
        rdr.set_headers(headers);

        let mut bars = Vec::new();
        for (i, row) in rdr.deserialize::<BarRow>().enumerate() {
            let line = i as u64 + 2;
            let row = row.map_err(|e| SourceError::MalformedRecord {
                line: e.position().map(|p| p.line()).unwrap_or(line),
                reason: e.to_string(),
            })?;
            let bar = DailyMarketBar {
                date: row.date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume.map(|v| v.max(0.0) as u64).unwrap_or(0),
            };
            if !bar.has_finite_prices() {
                return Err(SourceError::MalformedRecord {
                    line,
                    reason: format!("non-finite price for {}", bar.date),
                });
            }
            bars.push(bar);
        }

        bars.sort_by_key(|b| b.date);
        if let Some(pair) = bars.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(SourceError::MalformedRecord {
                line: 0,
                reason: format!("duplicate bar for {}", pair[0].date),
            });
        }
        Ok(bars)
    }
}

impl MarketDataSource for CsvBarSource {
    fn name(&self) -> &str {
        "csv_bars"
    }

    fn kind(&self) -> DataSource {
        DataSource::CsvImport
    }

    fn fetch_daily_bars(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyMarketBar>, SourceError> {
        let file = std::fs::File::open(&self.path).map_err(|e| SourceError::Io {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;

        let bars: Vec<DailyMarketBar> = Self::parse(file)?
            .into_iter()
            .filter(|b| b.date >= start && b.date <= end)
            .collect();

        if bars.is_empty() {
            return Err(SourceError::EmptyRange {
                ticker: ticker.to_string(),
                start,
                end,
            });
        }
        Ok(bars)
    }
}
