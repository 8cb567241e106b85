use std::path::Path;
use std::time::Instant;

use thiserror::Error;

use crate::dataset::{self, DatasetError};
use crate::document::Document;
use crate::gazetteer::{GazetteerError, GazetteerIndex};
use crate::normalize::{MentionRow, Normalizer};
use crate::recognize::Recognizer;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Gazetteer error: {0}")]
    Gazetteer(#[from] GazetteerError),
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Clone, Default)]
pub struct BatchStats {
    pub documents: usize,
    pub skipped: usize,
    pub rows: usize,
    pub duration_ms: u64,
}

impl BatchStats {
    #[must_use]
    pub const fn total_documents(&self) -> usize {
        self.documents + self.skipped
    }
}

pub struct BatchOutput {
    pub rows: Vec<MentionRow>,
    pub stats: BatchStats,
}

/// Single-pass batch normalization over a corpus.
///
/// Fail-soft at document granularity: a recognizer failure skips that
/// document and continues. Fail-fast at initialization: without a gazetteer
/// there is nothing to run.
pub struct NormalizePipeline<'g> {
    normalizer: Normalizer<'g>,
}

impl<'g> NormalizePipeline<'g> {
    #[must_use]
    pub fn new(gazetteer: &'g GazetteerIndex, recognizer: Box<dyn Recognizer>) -> Self {
        Self {
            normalizer: Normalizer::new(gazetteer, recognizer),
        }
    }

    #[must_use]
    pub fn run(&self, documents: &[Document]) -> BatchOutput {
        let start = Instant::now();
        let mut rows = Vec::new();
        let mut stats = BatchStats::default();

        for document in documents {
            match self.normalizer.normalize(document) {
                Ok(result) => {
                    rows.extend(result.rows(&document.text()));
                    stats.documents += 1;
                }
                Err(e) => {
                    tracing::warn!("Skipping document '{}': {}", document.title, e);
                    stats.skipped += 1;
                }
            }
        }

        stats.rows = rows.len();
        stats.duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        tracing::info!(
            documents = stats.documents,
            skipped = stats.skipped,
            rows = stats.rows,
            duration_ms = stats.duration_ms,
            "batch normalization finished"
        );

        BatchOutput { rows, stats }
    }

    /// Read an article corpus, normalize it, and write the mention table.
    pub fn run_file(&self, input: &Path, output: &Path) -> PipelineResult<BatchOutput> {
        let documents = dataset::read_articles(input)?;
        let batch = self.run(&documents);
        dataset::write_mentions(output, &batch.rows)?;
        Ok(batch)
    }
}
