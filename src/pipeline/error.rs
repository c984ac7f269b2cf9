use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::regression::PredictionError;
use crate::registry::{ModelLoadError, NotInitializedError};

/// Every way a scoring request can fail.
#[derive(Debug, Error)]
pub enum GradeError {
    #[error("invalid event: {reason}")]
    InvalidEvent { reason: String },

    #[error("missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("field '{field}' must be a string")]
    InvalidField { field: &'static str },

    #[error(transparent)]
    ModelLoad(#[from] ModelLoadError),

    #[error(transparent)]
    NotInitialized(#[from] NotInitializedError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Prediction(#[from] PredictionError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl GradeError {
    /// Stable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            GradeError::InvalidEvent { .. } => "invalid_event",
            GradeError::MissingField { .. } => "missing_field",
            GradeError::InvalidField { .. } => "invalid_field",
            GradeError::ModelLoad(_) => "model_load",
            GradeError::NotInitialized(_) => "not_initialized",
            GradeError::Embedding(_) => "embedding",
            GradeError::Prediction(_) => "prediction",
            GradeError::Internal(_) => "internal",
        }
    }
}
