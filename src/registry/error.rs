use std::path::PathBuf;
use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::regression::PredictionError;

/// An artifact was missing or malformed.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("failed to load encoder: {0}")]
    Encoder(#[source] EmbeddingError),

    #[error("failed to load regression model: {0}")]
    Regressor(#[source] PredictionError),

    #[error("failed to load lexicon from {path}: {source}")]
    Lexicon {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Models were requested before a successful [`ensure_loaded`](super::ModelRegistry::ensure_loaded).
#[derive(Debug, Error)]
#[error("models not initialized: {component} is not loaded")]
pub struct NotInitializedError {
    pub component: &'static str,
}
