//! Trading-day alignment.
//!
//! The market's trading dates are the authoritative axis. Every trading day
//! produces exactly one row carrying its close; days with no scored news get
//! the missing marker (`None`). No sentiment is ever invented here, and no
//! calendar day outside the market index appears in the output.

use chrono::NaiveDate;

use crate::domain::{AlignedRow, AlignedSeries, DailyMarketBar, DailySentiment};
use crate::error::CoreError;

/// The trading-day index of a bar series, in the order given.
pub fn market_index(bars: &[DailyMarketBar]) -> Vec<NaiveDate> {
    bars.iter().map(|b| b.date).collect()
}

/// Reindex daily sentiment onto the trading days of `bars`.
///
/// Output length and dates equal the market index, in the same order.
/// Sentiment days that are not trading days (weekends, holidays) are not
/// carried over to a neighbouring session.
pub fn align(daily: &DailySentiment, bars: &[DailyMarketBar]) -> Result<AlignedSeries, CoreError> {
    let rows: Vec<AlignedRow> = bars
        .iter()
        .map(|bar| AlignedRow {
            date: bar.date,
            close: bar.close,
            sentiment: daily.get(&bar.date),
        })
        .collect();

    if rows.len() != bars.len() {
        return Err(CoreError::DimensionMismatch {
            expected: bars.len(),
            actual: rows.len(),
        });
    }

    Ok(AlignedSeries::from_rows(rows))
}
