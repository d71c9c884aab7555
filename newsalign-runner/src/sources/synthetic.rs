//! Synthetic market data for development and tests.
//!
//! A random walk from 100.0 on weekdays, seeded from the ticker so the same
//! ticker always yields the same bars. Reports carry a synthetic flag.

use chrono::{Datelike, NaiveDate, Weekday};
use newsalign_core::{DailyMarketBar, DataSource, MarketDataSource, SourceError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticBarSource;

impl SyntheticBarSource {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(ticker: &str, start: NaiveDate, end: NaiveDate) -> Vec<DailyMarketBar> {
        let seed: [u8; 32] = *blake3::hash(ticker.as_bytes()).as_bytes();
        let mut rng = StdRng::from_seed(seed);

        let mut bars = Vec::new();
        let mut price = 100.0_f64;
        let mut current = start;

        while current <= end {
            if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
                current += chrono::Duration::days(1);
                continue;
            }

            let daily_return: f64 = rng.gen_range(-0.03..0.03);
            let open = price;
            let close = price * (1.0 + daily_return);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
            let volume = rng.gen_range(500_000..5_000_000u64);

            bars.push(DailyMarketBar {
                date: current,
                open,
                high,
                low,
                close,
                volume,
            });

            price = close;
            current += chrono::Duration::days(1);
        }

        bars
    }
}

impl MarketDataSource for SyntheticBarSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn kind(&self) -> DataSource {
        DataSource::Synthetic
    }

    fn fetch_daily_bars(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyMarketBar>, SourceError> {
        let bars = Self::generate(ticker, start, end);
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
