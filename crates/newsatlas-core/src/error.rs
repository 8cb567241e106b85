use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Gazetteer error: {0}")]
    Gazetteer(#[from] crate::gazetteer::GazetteerError),

    #[error("Recognition error: {0}")]
    Recognize(#[from] crate::recognize::RecognizeError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] crate::dataset::DatasetError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] crate::pipeline::PipelineError),
}

pub type Result<T> = std::result::Result<T, Error>;
