//! Apply the cleaner and scorer collaborators to pre-validated articles.

use crate::domain::{ScoredArticle, ValidArticle};
use crate::error::CoreError;
use crate::source::{SentimentScorer, TextCleaner};

/// Clean and score every article, in input order.
///
/// A score that is NaN or outside [-1, 1] means the scorer broke its
/// contract; the whole batch fails rather than clamping or skipping.
pub fn score_articles(
    articles: Vec<ValidArticle>,
    cleaner: &dyn TextCleaner,
    scorer: &dyn SentimentScorer,
) -> Result<Vec<ScoredArticle>, CoreError> {
    articles
        .into_iter()
        .map(|article| {
            let cleaned = cleaner.clean(&article.raw_content);
            let score = scorer.score(&cleaned);
            if !(-1.0..=1.0).contains(&score) {
                return Err(CoreError::SentimentOutOfRange {
                    headline: article.headline,
                    score,
                });
            }
            Ok(ScoredArticle::from_valid(article, cleaned, score))
        })
        .collect()
}
