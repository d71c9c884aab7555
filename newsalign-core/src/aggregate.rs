//! Sentiment aggregation: per-article scores → one mean score per calendar day.
//!
//! Only the `sentiment` field is averaged. Time-of-day is discarded; for
//! timestamps with a UTC offset the calendar date is taken in that offset,
//! so "2023-03-01T23:30:00-05:00" counts toward March 1st.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::domain::{DailySentiment, ScoredArticle};
use crate::error::CoreError;

// `%.f` also matches an absent fraction.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a publication timestamp into its calendar date.
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DD`, and naive
/// `YYYY-MM-DD[T ]HH:MM[:SS[.fff]]`.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

/// Group scored articles by calendar date and average their sentiment.
///
/// Input order is irrelevant. An empty slice yields an empty result. The
/// first article whose date cannot be parsed fails the whole call with
/// `CoreError::InvalidDate`; callers that want to skip such records must
/// filter them out beforehand.
pub fn aggregate(scored: &[ScoredArticle]) -> Result<DailySentiment, CoreError> {
    let observations = scored
        .iter()
        .map(|article| {
            parse_calendar_date(&article.published_at)
                .map(|date| (date, article.sentiment))
                .ok_or_else(|| CoreError::InvalidDate {
                    headline: article.headline.clone(),
                    raw: Some(article.published_at.clone()),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DailySentiment::from_observations(observations))
}
