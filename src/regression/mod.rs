//! From embedding to score.
//!
//! 1. [`resize_embedding`] fits the encoder output to the network's input width.
//! 2. [`predict_score`] runs a [`Regressor`] and rounds its scalar output.
//!
//! [`RecurrentRegressor`] is the production network; [`StubRegressor`] keeps
//! the pipeline runnable without artifacts.

pub mod error;
pub mod network;
pub mod predictor;
pub mod resize;


pub use error::PredictionError;
pub use network::{NetworkConfig, OutputActivation, RecurrentRegressor};
pub use predictor::{STUB_BASELINE, Score, StubRegressor, predict_score, round_score};
pub use resize::resize_embedding;

/// Feature vector to continuous score.
pub trait Regressor: Send + Sync {
    /// Number of features `predict` accepts.
    fn input_dim(&self) -> usize;

    /// Raw (unrounded) model output for one essay.
    fn predict(&self, features: &[f32]) -> Result<f32, PredictionError>;
}
