//! Daily sentiment and the aligned (date, close, sentiment) series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mean sentiment for one calendar day and how many articles contributed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayScore {
    pub mean: f64,
    pub article_count: usize,
}

/// One mean sentiment per calendar day that had at least one scored article.
///
/// Days without articles are absent, never stored as zero. The only way to
/// build one is from observations, so every entry is a real mean.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySentiment {
    days: BTreeMap<NaiveDate, DayScore>,
}

impl DailySentiment {
    /// Group `(date, score)` observations by date and average each group.
    pub fn from_observations<I>(observations: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let mut sums: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
        for (date, score) in observations {
            let entry = sums.entry(date).or_insert((0.0, 0));
            entry.0 += score;
            entry.1 += 1;
        }

        let days = sums
            .into_iter()
            .map(|(date, (sum, count))| {
                (
                    date,
                    DayScore {
                        mean: sum / count as f64,
                        article_count: count,
                    },
                )
            })
            .collect();

        Self { days }
    }

    /// Mean sentiment on `date`, or `None` when no article was scored that day.
    pub fn get(&self, date: &NaiveDate) -> Option<f64> {
        self.days.get(date).map(|d| d.mean)
    }

    pub fn day(&self, date: &NaiveDate) -> Option<&DayScore> {
        self.days.get(date)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Entries in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &DayScore)> {
        self.days.iter()
    }

    pub fn dates(&self) -> impl Iterator<Item = &NaiveDate> {
        self.days.keys()
    }
}

/// One trading day after alignment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignedRow {
    pub date: NaiveDate,
    pub close: f64,
    /// `None` is the missing marker: no article was scored for this day.
    pub sentiment: Option<f64>,
}

impl AlignedRow {
    pub fn is_complete(&self) -> bool {
        self.sentiment.is_some()
    }
}

/// Close prices paired with (possibly missing) daily sentiment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignedSeries {
    rows: Vec<AlignedRow>,
}

impl AlignedSeries {
    pub fn from_rows(rows: Vec<AlignedRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[AlignedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    pub fn missing_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.is_complete()).count()
    }

    /// First row whose sentiment is missing.
    pub fn first_missing(&self) -> Option<&AlignedRow> {
        self.rows.iter().find(|r| !r.is_complete())
    }

    /// `(sentiment, close)` pairs for rows that have a sentiment.
    pub fn complete_pairs(&self) -> (Vec<f64>, Vec<f64>) {
        self.rows
            .iter()
            .filter_map(|r| r.sentiment.map(|s| (s, r.close)))
            .unzip()
    }
}
