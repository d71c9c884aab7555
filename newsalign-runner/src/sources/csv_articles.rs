//! CSV article source.
//!
//! Expects a header row with `headline`, `date`, and `content` columns
//! (`published_at` and `raw_content` are accepted as aliases). Empty cells
//! become missing values; the pre-validation step decides what to drop.

use newsalign_core::{ArticleRecord, ArticleSource, SourceError};
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct ArticleRow {
    #[serde(default)]
    headline: Option<String>,
    #[serde(default, alias = "published_at")]
    date: Option<String>,
    #[serde(default, alias = "raw_content")]
    content: Option<String>,
}

impl From<ArticleRow> for ArticleRecord {
    fn from(row: ArticleRow) -> Self {
        Self {
            headline: row.headline.unwrap_or_default(),
            published_at: row.date,
            raw_content: row.content,
        }
    }
}

/// Reads article records from a CSV file.
#[derive(Debug, Clone)]
pub struct CsvArticleSource {
    path: PathBuf,
}

impl CsvArticleSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse article records from any reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<ArticleRecord>, SourceError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::Fields)
            .flexible(true)
            .from_reader(reader);

        let mut records = Vec::new();
        for (i, row) in rdr.deserialize::<ArticleRow>().enumerate() {
            let row = row.map_err(|e| SourceError::MalformedRecord {
                line: e
                    .position()
                    .map(|p| p.line())
                    .unwrap_or(i as u64 + 2),
                reason: e.to_string(),
            })?;
            records.push(row.into());
        }
        Ok(records)
    }
}

impl ArticleSource for CsvArticleSource {
    fn name(&self) -> &str {
        "csv_articles"
    }

    fn fetch_articles(&self) -> Result<Vec<ArticleRecord>, SourceError> {
        let file = std::fs::File::open(&self.path).map_err(|e| SourceError::Io {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(file)
    }
}
