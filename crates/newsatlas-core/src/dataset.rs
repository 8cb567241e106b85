use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::Document;
use crate::normalize::MentionRow;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Dataset not found: {0}")]
    NotFound(String),
    #[error("Malformed dataset: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DatasetResult<T> = Result<T, DatasetError>;

#[derive(Debug, Deserialize)]
struct ArticleRow {
    title: String,
    description: String,
}

/// One row of the secondary input produced by the external classifier.
/// Extra columns in the file are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRow {
    #[serde(default)]
    pub text: String,
    #[serde(rename = "countries")]
    pub country: String,
    #[serde(rename = "nationalities")]
    pub nationality: String,
    #[serde(rename = "cities")]
    pub city: String,
    pub predicted_label: String,
}

/// Read the article corpus (`title,description`), deduplicating by title
/// (first occurrence wins) and dropping rows whose combined text is empty.
pub fn read_articles(path: &Path) -> DatasetResult<Vec<Document>> {
    let mut reader = open(path)?;

    let mut seen_titles = HashSet::new();
    let mut documents = Vec::new();

    for row in reader.deserialize() {
        let row: ArticleRow = row?;
        let document = Document::new(row.title, row.description);

        if document.is_empty() || !seen_titles.insert(document.title.clone()) {
            continue;
        }
        documents.push(document);
    }

    tracing::debug!(documents = documents.len(), "read article corpus");
    Ok(documents)
}

/// Write the exploded mention table (`text,countries,nationalities,cities`).
/// Empty values are written as empty strings, never as a null marker.
pub fn write_mentions(path: &Path, rows: &[MentionRow]) -> DatasetResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a previously written mention table.
pub fn read_mentions(path: &Path) -> DatasetResult<Vec<MentionRow>> {
    let mut reader = open(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Read the prediction table for the classification dashboard.
pub fn read_predictions(path: &Path) -> DatasetResult<Vec<PredictionRow>> {
    let mut reader = open(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

fn open(path: &Path) -> DatasetResult<csv::Reader<std::fs::File>> {
    if !path.exists() {
        return Err(DatasetError::NotFound(path.display().to_string()));
    }
    Ok(csv::Reader::from_path(path)?)
}
