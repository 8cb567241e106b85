#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod dataset;
pub mod document;
pub mod error;
pub mod gazetteer;
pub mod normalize;
pub mod pipeline;
pub mod recognize;
pub mod report;

pub use dataset::{DatasetError, PredictionRow};
pub use document::Document;
pub use error::{Error, Result};
pub use gazetteer::{CityRecord, CountryRecord, GazetteerError, GazetteerIndex};
pub use normalize::{ExtractionResult, MentionRow, Normalizer};
pub use pipeline::{BatchOutput, BatchStats, NormalizePipeline, PipelineError};
pub use recognize::{
    EntitySpan, LexiconRecognizer, RecognizeError, Recognizer, SpanLabel,
};
pub use report::{CityMention, CountryCoverage, PairCount, Selection, ValueCount};
