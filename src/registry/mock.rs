//! Test doubles for the registry and the two model seams.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::constants::{ENCODER_HIDDEN_DIM, REGRESSOR_INPUT_DIM};
use crate::embedding::{EmbeddingError, TextEncoder};
use crate::regression::{PredictionError, Regressor};
use crate::text::TextNormalizer;

use super::error::ModelLoadError;
use super::loader::{ModelLoader, ModelSet};

/// Encoder that returns a constant vector, or fails on demand.
#[derive(Debug, Clone)]
pub struct MockEncoder {
    pub hidden_size: usize,
    pub value: f32,
    pub fail: bool,
}

impl Default for MockEncoder {
    fn default() -> Self {
        Self {
            hidden_size: ENCODER_HIDDEN_DIM,
            value: 0.1,
            fail: false,
        }
    }
}

impl MockEncoder {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

impl TextEncoder for MockEncoder {
    fn tokenize(&self, text: &str) -> Result<Vec<u32>, EmbeddingError> {
        Ok(text.split_whitespace().map(|w| w.len() as u32 + 1000).collect())
    }

    fn encode(&self, _token_ids: &[u32]) -> Result<Vec<f32>, EmbeddingError> {
        if self.fail {
            return Err(EmbeddingError::InferenceFailed {
                reason: "mock encoder failure".to_string(),
            });
        }
        Ok(vec![self.value; self.hidden_size])
    }

    fn hidden_size(&self) -> usize {
        self.hidden_size
    }
}

/// How [`MockRegressor::predict`] behaves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockOutput {
    Value(f32),
    Fail,
    Panic,
}

/// Regressor returning a fixed output and recording what it was given.
#[derive(Debug, Clone)]
pub struct MockRegressor {
    pub input_dim: usize,
    pub output: MockOutput,
    calls: Arc<AtomicUsize>,
}

impl MockRegressor {
    pub fn returning(value: f32) -> Self {
        Self::with_output(MockOutput::Value(value))
    }

    pub fn with_output(output: MockOutput) -> Self {
        Self {
            input_dim: REGRESSOR_INPUT_DIM,
            output,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_input_dim(mut self, input_dim: usize) -> Self {
        self.input_dim = input_dim;
        self
    }

    /// Shared call counter (clones observe the same count).
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl Regressor for MockRegressor {
    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn predict(&self, features: &[f32]) -> Result<f32, PredictionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if features.len() != self.input_dim {
            return Err(PredictionError::ShapeMismatch {
                expected: self.input_dim,
                actual: features.len(),
            });
        }
        match self.output {
            MockOutput::Value(v) => Ok(v),
            MockOutput::Fail => Err(PredictionError::InferenceFailed {
                reason: "mock regressor failure".to_string(),
            }),
            MockOutput::Panic => panic!("mock regressor panicked"),
        }
    }
}

type ModelFactory = Box<dyn Fn() -> ModelSet + Send + Sync>;

/// Loader that builds models from a closure and can fail its first attempts.
pub struct MockLoader {
    factory: ModelFactory,
    failures_remaining: AtomicUsize,
}

impl MockLoader {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> ModelSet + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            failures_remaining: AtomicUsize::new(0),
        }
    }

    /// Mock encoder + a regressor returning `score`.
    pub fn scoring(score: f32) -> Self {
        Self::new(move || {
            ModelSet::new(
                Box::new(MockEncoder::default()),
                Box::new(MockRegressor::returning(score)),
                TextNormalizer::default(),
            )
        })
    }

    /// The first `n` loads fail with a missing-artifact error.
    pub fn failing_first(self, n: usize) -> Self {
        self.failures_remaining.store(n, Ordering::SeqCst);
        self
    }
}

impl ModelLoader for MockLoader {
    fn load(&self) -> Result<ModelSet, ModelLoadError> {
        let remaining = self.failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_remaining
                .store(remaining - 1, Ordering::SeqCst);
            return Err(ModelLoadError::Encoder(EmbeddingError::ModelNotFound {
                path: "mock/bert-model".into(),
            }));
        }
        Ok((self.factory)())
    }
}
