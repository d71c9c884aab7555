//! Pre-validation of raw article records.
//!
//! A record is accepted only when it has a publication date and non-blank
//! content. Everything else is returned in `rejected` with the reason, so
//! callers can report what was dropped instead of losing it silently.

use serde::{Deserialize, Serialize};

use crate::domain::{ArticleRecord, ValidArticle};

/// Why a record was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// No publication date, or the date field was blank.
    MissingDate,
    /// No content, or content was only whitespace.
    MissingContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    pub headline: String,
    pub reason: RejectReason,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prefiltered {
    pub accepted: Vec<ValidArticle>,
    pub rejected: Vec<Rejection>,
}

impl Prefiltered {
    pub fn rejected_for(&self, reason: RejectReason) -> usize {
        self.rejected.iter().filter(|r| r.reason == reason).count()
    }
}

/// Split records into valid articles and rejections, preserving input order.
///
/// The date check runs first: a record missing both fields is reported as
/// `MissingDate`.
pub fn prefilter(records: Vec<ArticleRecord>) -> Prefiltered {
    let mut out = Prefiltered::default();

    for record in records {
        let date = record
            .published_at
            .filter(|d| !d.trim().is_empty());
        let Some(published_at) = date else {
            out.rejected.push(Rejection {
                headline: record.headline,
                reason: RejectReason::MissingDate,
            });
            continue;
        };

        let content = record.raw_content.filter(|c| !c.trim().is_empty());
        let Some(raw_content) = content else {
            out.rejected.push(Rejection {
                headline: record.headline,
                reason: RejectReason::MissingContent,
            });
            continue;
        };

        out.accepted.push(ValidArticle {
            headline: record.headline,
            published_at,
            raw_content,
        });
    }

    out
}
