//! Caller-chosen handling of rows with missing sentiment.
//!
//! The aligner never fills gaps. Before evaluation the caller picks one of
//! these policies, and the choice is explicit in configuration and reports.

use serde::{Deserialize, Serialize};

use crate::domain::{AlignedRow, AlignedSeries};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPolicy {
    /// Remove rows with no sentiment.
    #[default]
    Drop,
    /// Carry the last observed sentiment forward. Leading rows with no
    /// earlier observation are removed.
    ForwardFill,
    /// Leave the series untouched. Evaluation fails if any row is missing.
    Keep,
}

impl std::str::FromStr for MissingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "drop" => Ok(Self::Drop),
            "forward-fill" | "forward_fill" | "ffill" => Ok(Self::ForwardFill),
            "keep" => Ok(Self::Keep),
            other => Err(format!(
                "unknown missing-data policy '{other}' (expected drop, forward-fill, or keep)"
            )),
        }
    }
}

impl std::fmt::Display for MissingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Drop => "drop",
            Self::ForwardFill => "forward-fill",
            Self::Keep => "keep",
        };
        write!(f, "{s}")
    }
}

/// Apply `policy` to an aligned series, returning a new series.
pub fn resolve_missing(series: &AlignedSeries, policy: MissingPolicy) -> AlignedSeries {
    match policy {
        MissingPolicy::Keep => series.clone(),
        MissingPolicy::Drop => AlignedSeries::from_rows(
            series
                .rows()
                .iter()
                .filter(|r| r.is_complete())
                .copied()
                .collect(),
        ),
        MissingPolicy::ForwardFill => {
            let mut last: Option<f64> = None;
            let rows = series
                .rows()
                .iter()
                .filter_map(|row| {
                    if row.sentiment.is_some() {
                        last = row.sentiment;
                    }
                    last.map(|s| AlignedRow {
                        sentiment: Some(s),
                        ..*row
                    })
                })
                .collect();
            AlignedSeries::from_rows(rows)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(day: u32, close: f64, sentiment: Option<f64>) -> AlignedRow {
        AlignedRow {
            date: NaiveDate::from_ymd_opt(2023, 3, day).unwrap(),
            close,
            sentiment,
        }
    }

    fn series() -> AlignedSeries {
        AlignedSeries::from_rows(vec![
            row(1, 99.0, None),
            row(2, 100.0, Some(0.5)),
            row(3, 102.0, None),
            row(6, 101.0, Some(-0.2)),
            row(7, 103.0, None),
        ])
    }

    #[test]
    fn drop_removes_missing_rows() {
        let out = resolve_missing(&series(), MissingPolicy::Drop);
        assert_eq!(out.len(), 2);
        assert_eq!(out.missing_count(), 0);
        assert_eq!(out.rows()[1].close, 101.0);
    }

    #[test]
    fn forward_fill_carries_last_value_and_drops_leading_gap() {
        let out = resolve_missing(&series(), MissingPolicy::ForwardFill);
        let sentiments: Vec<_> = out.rows().iter().map(|r| r.sentiment).collect();
        assert_eq!(
            sentiments,
            vec![Some(0.5), Some(0.5), Some(-0.2), Some(-0.2)]
        );
        assert_eq!(out.rows()[1].close, 102.0);
    }

    #[test]
    fn keep_leaves_series_unchanged() {
        let s = series();
        assert_eq!(resolve_missing(&s, MissingPolicy::Keep), s);
    }

    #[test]
    fn policy_parses_from_cli_spelling() {
        assert_eq!("drop".parse::<MissingPolicy>().unwrap(), MissingPolicy::Drop);
        assert_eq!(
            "forward-fill".parse::<MissingPolicy>().unwrap(),
            MissingPolicy::ForwardFill
        );
        assert_eq!("KEEP".parse::<MissingPolicy>().unwrap(), MissingPolicy::Keep);
        assert!("zero".parse::<MissingPolicy>().is_err());
    }
}
