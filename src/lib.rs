//! Essay grader library crate (used by the server binary and integration tests).
//!
//! # Public API Surface
//!
//! One request flows through these stages:
//!
//! 1. [`TextNormalizer`] - strip non-letters, lowercase, drop stopwords, lemmatize
//! 2. [`TextEncoder`] - BERT token states mean-pooled into one vector
//! 3. [`resize_embedding`] - truncate or zero-pad to the regressor's width
//! 4. [`Regressor`] + [`predict_score`] - one forward pass, rounded to an integer
//!
//! [`ModelRegistry`] loads the models once per process and [`EssayGrader`]
//! ties the stages together, returning an [`Envelope`] for every invocation.
//! The [`gateway`] module serves it over HTTP.
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod pipeline;
pub mod registry;
pub mod regression;
pub mod text;

pub use config::{Config, ConfigError};
pub use constants::{
    DimValidationError, ENCODER_HIDDEN_DIM, MAX_SEQ_LEN, REGRESSOR_INPUT_DIM, validate_dim,
};
pub use embedding::{BertEncoder, EmbeddingError, EncoderConfig, TextEncoder};
pub use gateway::{HandlerState, create_router_with_state};
pub use pipeline::{Envelope, EnvelopeBody, EssayGrader, GradeError, STATUS_ERROR, STATUS_OK};
pub use registry::{
    ArtifactLoader, ArtifactPaths, ModelLoadError, ModelLoader, ModelRegistry, ModelSet,
    NotInitializedError, RegistryConfig,
};
#[cfg(any(test, feature = "mock"))]
pub use registry::mock::{MockEncoder, MockLoader, MockOutput, MockRegressor};
pub use regression::{
    PredictionError, RecurrentRegressor, Regressor, Score, StubRegressor, predict_score,
    resize_embedding, round_score,
};
pub use text::{Lemmatizer, StopwordSet, TextNormalizer, load_normalizer};
