//! Built-in text cleaner and lexicon scorer.
//!
//! These are simple defaults for the `TextCleaner` and `SentimentScorer`
//! collaborator traits. Anything smarter (a lemmatizer, a trained model)
//! plugs in behind the same traits.

use serde::{Deserialize, Serialize};

use crate::source::{SentimentScorer, TextCleaner};

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from",
    "further", "had", "has", "have", "having", "he", "her", "here", "hers", "him", "his", "how",
    "i", "if", "in", "into", "is", "it", "its", "itself", "just", "me", "more", "most", "my",
    "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours",
    "out", "over", "own", "same", "she", "should", "so", "some", "such", "than", "that", "the",
    "their", "theirs", "them", "then", "there", "these", "they", "this", "those", "through", "to",
    "too", "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "you", "your", "yours",
];

/// Strips markup and punctuation, lowercases, and drops English stopwords.
///
/// Negations ("not", "no", "nor") are stopwords here too, so the lexicon
/// scorer never sees them.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicCleaner;

impl BasicCleaner {
    /// Removes complete `<...>` spans. An unterminated `<` is kept as text.
    fn strip_tags(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(open) = rest.find('<') {
            out.push_str(&rest[..open]);
            match rest[open..].find('>') {
                Some(close) => rest = &rest[open + close + 1..],
                None => {
                    rest = &rest[open..];
                    break;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

impl TextCleaner for BasicCleaner {
    fn clean(&self, text: &str) -> String {
        let stripped = Self::strip_tags(text);
        let normalized: String = stripped
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
            .flat_map(char::to_lowercase)
            .collect();

        normalized
            .split_whitespace()
            .filter(|w| !STOPWORDS.contains(w))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

const BULLISH_WORDS: &[(&str, f64)] = &[
    ("beat", 0.5),
    ("beats", 0.5),
    ("bullish", 0.7),
    ("boost", 0.4),
    ("gain", 0.4),
    ("gains", 0.4),
    ("growth", 0.4),
    ("good", 0.5),
    ("great", 0.7),
    ("high", 0.2),
    ("jump", 0.5),
    ("jumps", 0.5),
    ("optimistic", 0.6),
    ("outperform", 0.6),
    ("positive", 0.5),
    ("profit", 0.4),
    ("rally", 0.6),
    ("rallies", 0.6),
    ("record", 0.3),
    ("rise", 0.4),
    ("rises", 0.4),
    ("soar", 0.7),
    ("soars", 0.7),
    ("strong", 0.5),
    ("surge", 0.6),
    ("surges", 0.6),
    ("upgrade", 0.5),
];

const BEARISH_WORDS: &[(&str, f64)] = &[
    ("bad", -0.6),
    ("bearish", -0.7),
    ("collapse", -0.8),
    ("crash", -0.8),
    ("decline", -0.4),
    ("declines", -0.4),
    ("downgrade", -0.5),
    ("drop", -0.4),
    ("drops", -0.4),
    ("fall", -0.4),
    ("falls", -0.4),
    ("fear", -0.5),
    ("fraud", -0.8),
    ("lawsuit", -0.5),
    ("loss", -0.5),
    ("losses", -0.5),
    ("miss", -0.5),
    ("misses", -0.5),
    ("negative", -0.5),
    ("plunge", -0.7),
    ("plunges", -0.7),
    ("recession", -0.6),
    ("selloff", -0.6),
    ("slump", -0.6),
    ("weak", -0.5),
    ("worst", -0.8),
];

/// Keyword polarity scorer for financial news.
///
/// The score is the mean weight of matched words, clamped to [-1, 1].
/// Text with no matching word scores 0.0.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    lexicon: Vec<(String, f64)>,
}

impl LexiconScorer {
    pub fn new() -> Self {
        let lexicon = BULLISH_WORDS
            .iter()
            .chain(BEARISH_WORDS)
            .map(|(w, s)| (w.to_string(), *s))
            .collect();
        Self { lexicon }
    }

    /// Add or override a word weight. Weights are clamped to [-1, 1].
    pub fn with_word(mut self, word: &str, weight: f64) -> Self {
        let word = word.to_lowercase();
        let weight = weight.clamp(-1.0, 1.0);
        match self.lexicon.iter_mut().find(|(w, _)| *w == word) {
            Some(entry) => entry.1 = weight,
            None => self.lexicon.push((word, weight)),
        }
        self
    }

    fn weight(&self, word: &str) -> Option<f64> {
        self.lexicon
            .iter()
            .find(|(w, _)| w == word)
            .map(|(_, s)| *s)
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> f64 {
        let weights: Vec<f64> = text
            .split_whitespace()
            .filter_map(|w| self.weight(&w.to_lowercase()))
            .collect();

        if weights.is_empty() {
            return 0.0;
        }
        let mean = weights.iter().sum::<f64>() / weights.len() as f64;
        mean.clamp(-1.0, 1.0)
    }
}

/// Coarse reading of a polarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Bullish,
    Bearish,
    Neutral,
}

impl SentimentLabel {
    pub const THRESHOLD: f64 = 0.3;

    /// Above +0.3 is bullish, below -0.3 bearish, anything between neutral.
    pub fn from_score(score: f64) -> Self {
        if score > Self::THRESHOLD {
            Self::Bullish
        } else if score < -Self::THRESHOLD {
            Self::Bearish
        } else {
            Self::Neutral
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Bullish => "Bullish",
            Self::Bearish => "Bearish",
            Self::Neutral => "Neutral",
        };
        write!(f, "{s}")
    }
}
