use std::path::PathBuf;
use thiserror::Error;

use crate::constants::DimValidationError;

#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("regression model not found at path: {path}")]
    ModelNotFound { path: PathBuf },

    #[error("failed to load regression model: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("invalid regression model configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("input shape mismatch: model expects {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("regression inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("regression model produced a non-finite score: {value}")]
    NonFiniteOutput { value: f32 },
}

impl From<candle_core::Error> for PredictionError {
    fn from(err: candle_core::Error) -> Self {
        PredictionError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}

impl From<DimValidationError> for PredictionError {
    fn from(err: DimValidationError) -> Self {
        match err {
            DimValidationError::DimensionMismatch { expected, actual } => {
                PredictionError::ShapeMismatch { expected, actual }
            }
            DimValidationError::ZeroDimension => PredictionError::InvalidConfig {
                reason: err.to_string(),
            },
        }
    }
}
