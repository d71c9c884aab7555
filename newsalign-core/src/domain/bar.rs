//! DailyMarketBar — one trading day of market data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// OHLCV bar for a single trading day.
///
/// Only `close` feeds the regression; the other columns are carried so
/// reports and exports keep the full bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMarketBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl DailyMarketBar {
    /// False when any price is NaN or infinite.
    pub fn has_finite_prices(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|p| p.is_finite())
    }
}
