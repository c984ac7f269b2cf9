use tracing::debug;

use crate::constants::{REGRESSOR_INPUT_DIM, validate_dim};

use super::Regressor;
use super::error::PredictionError;

/// Integer essay score.
pub type Score = i64;

/// Runs `regressor` on an adapted vector and rounds the result.
pub fn predict_score(regressor: &dyn Regressor, adapted: &[f32]) -> Result<Score, PredictionError> {
    validate_dim(adapted.len(), regressor.input_dim())?;

    let raw = regressor.predict(adapted)?;
    let score = round_score(raw)?;

    debug!(raw_score = raw, score, "Essay scored");
    Ok(score)
}

/// Rounds half to even (`2.5 -> 2`, `3.5 -> 4`); non-finite values are errors.
pub fn round_score(raw: f32) -> Result<Score, PredictionError> {
    if !raw.is_finite() {
        return Err(PredictionError::NonFiniteOutput { value: raw });
    }
    Ok(raw.round_ties_even() as Score)
}

/// Baseline returned by [`StubRegressor`] for an all-zero input.
pub const STUB_BASELINE: f32 = 6.0;

/// Deterministic stand-in used when no regression artifact is deployed.
#[derive(Debug, Clone)]
pub struct StubRegressor {
    input_dim: usize,
}

impl Default for StubRegressor {
    fn default() -> Self {
        Self {
            input_dim: REGRESSOR_INPUT_DIM,
        }
    }
}

impl StubRegressor {
    pub fn new(input_dim: usize) -> Self {
        Self { input_dim }
    }
}

impl Regressor for StubRegressor {
    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn predict(&self, features: &[f32]) -> Result<f32, PredictionError> {
        validate_dim(features.len(), self.input_dim)?;
        let mean = features.iter().sum::<f32>() / self.input_dim as f32;
        Ok(STUB_BASELINE + 4.0 * mean)
    }
}
