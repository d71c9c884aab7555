//! Article records as they move through pre-validation and scoring.

use serde::{Deserialize, Serialize};

/// Raw article as produced by an article source.
///
/// Date and content are optional: a source reports what it found and the
/// pre-validation step decides whether the record is usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub headline: String,
    /// Publication timestamp exactly as the source reported it.
    pub published_at: Option<String>,
    pub raw_content: Option<String>,
}

impl ArticleRecord {
    pub fn new(
        headline: impl Into<String>,
        published_at: Option<&str>,
        raw_content: Option<&str>,
    ) -> Self {
        Self {
            headline: headline.into(),
            published_at: published_at.map(str::to_string),
            raw_content: raw_content.map(str::to_string),
        }
    }
}

/// An article that passed pre-validation: it has a date and non-blank content.
///
/// The date is still the raw string; parsing happens in the aggregator so an
/// unparsable value surfaces as an error instead of a silent drop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidArticle {
    pub headline: String,
    pub published_at: String,
    pub raw_content: String,
}

/// A valid article with its cleaned text and polarity score in [-1, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredArticle {
    pub headline: String,
    pub published_at: String,
    pub raw_content: String,
    pub cleaned_content: String,
    pub sentiment: f64,
}

impl ScoredArticle {
    pub fn from_valid(article: ValidArticle, cleaned_content: String, sentiment: f64) -> Self {
        Self {
            headline: article.headline,
            published_at: article.published_at,
            raw_content: article.raw_content,
            cleaned_content,
            sentiment,
        }
    }
}
