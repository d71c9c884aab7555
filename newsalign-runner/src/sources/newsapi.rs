//! Article source backed by a saved NewsAPI `everything` response.
//!
//! Body text is taken from `content`, falling back to `description` when
//! `content` is absent or blank.
//! Entries NewsAPI has redacted ("[Removed]") are skipped entirely; they
//! carry no usable headline or text.

use newsalign_core::{ArticleRecord, ArticleSource, SourceError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiResponse {
    status: String,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
}

impl NewsApiArticle {
    fn is_removed(&self) -> bool {
        self.title
            .as_deref()
            .map(|t| t.to_lowercase().contains("[removed]"))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone)]
pub struct NewsApiFileSource {
    path: PathBuf,
}

impl NewsApiFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse a NewsAPI JSON response body into article records.
    pub fn parse(json: &str) -> Result<Vec<ArticleRecord>, SourceError> {
        let resp: NewsApiResponse = serde_json::from_str(json)
            .map_err(|e| SourceError::ResponseFormatChanged(format!("NewsAPI JSON: {e}")))?;

        if resp.status != "ok" {
            return Err(SourceError::Other(format!(
                "NewsAPI status '{}': {}",
                resp.status,
                resp.message.unwrap_or_default()
            )));
        }

        Ok(resp
            .articles
            .into_iter()
            .filter(|a| !a.is_removed())
            .map(|a| ArticleRecord {
                headline: a.title.unwrap_or_default(),
                published_at: a.published_at,
                raw_content: a
                    .content
                    .filter(|c| !c.trim().is_empty())
                    .or(a.description),
            })
            .collect())
    }
}

impl ArticleSource for NewsApiFileSource {
    fn name(&self) -> &str {
        "newsapi_file"
    }

    fn fetch_articles(&self) -> Result<Vec<ArticleRecord>, SourceError> {
        let json = std::fs::read_to_string(&self.path).map_err(|e| SourceError::Io {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(&json)
    }
}
