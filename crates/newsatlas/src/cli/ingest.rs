use std::path::Path;

use anyhow::Result;
use newsatlas_core::{LexiconRecognizer, NormalizePipeline};

pub fn run(input: &Path, output: &Path, gazetteer_dir: Option<&Path>) -> Result<()> {
    let gazetteer = super::load_gazetteer(gazetteer_dir)?;
    let recognizer = Box::new(LexiconRecognizer::new(&gazetteer));
    let pipeline = NormalizePipeline::new(&gazetteer, recognizer);

    let batch = pipeline.run_file(input, output)?;
    let stats = &batch.stats;

    eprintln!(
        "Normalized {} documents ({} skipped), wrote {} rows to {} in {} ms",
        stats.documents,
        stats.skipped,
        stats.rows,
        output.display(),
        stats.duration_ms
    );

    Ok(())
}
