//! Cross-cutting, shared constants.
//!
//! # Dimension Invariants
//!
//! The regression network was trained on inputs of exactly
//! [`REGRESSOR_INPUT_DIM`] features, while the encoder produces
//! [`ENCODER_HIDDEN_DIM`]-wide vectors. The adapter in
//! [`crate::regression::resize_embedding`] bridges the two by truncation or
//! zero-padding; both widths are fixed by the trained artifacts, not by this
//! crate, so treat them as invariants.

/// Hidden size of the BERT-base encoder.
pub const ENCODER_HIDDEN_DIM: usize = 768;

/// Feature width the regression network expects.
pub const REGRESSOR_INPUT_DIM: usize = 300;

/// Maximum number of tokens fed to the encoder (including special tokens).
pub const MAX_SEQ_LEN: usize = 512;

/// Token id used for padding by BERT vocabularies.
pub const PAD_TOKEN_ID: u32 = 0;

/// Env var naming the artifact root (set by the hosting runtime).
pub const ENV_TASK_ROOT: &str = "LAMBDA_TASK_ROOT";

/// Runtime dimension check used at module boundaries.
///
/// # Example
///
/// ```
/// use grader::constants::{REGRESSOR_INPUT_DIM, validate_dim};
///
/// validate_dim(300, REGRESSOR_INPUT_DIM).unwrap();
/// assert!(validate_dim(768, REGRESSOR_INPUT_DIM).is_err());
/// ```
pub fn validate_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    if expected == 0 {
        return Err(DimValidationError::ZeroDimension);
    }
    if actual != expected {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

/// Error returned when dimension validation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimValidationError {
    /// Dimension cannot be zero.
    ZeroDimension,
    /// Runtime dimension does not match expected dimension.
    DimensionMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for DimValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDimension => write!(f, "dimension cannot be zero"),
            Self::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "dimension mismatch: expected {}, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for DimValidationError {}
