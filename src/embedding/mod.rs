//! Embedding extraction.
//!
//! - [`encoder`] turns normalized text into one mean-pooled vector.
//! - [`bert`] wraps the candle BERT implementation used by the encoder.

/// Bare BERT encoder wrapper.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
/// Text encoder trait + BERT implementation.
pub mod encoder;
mod error;
/// Tokenizer loading helpers.
pub mod utils;

pub use encoder::{BertEncoder, EncoderConfig, TextEncoder};
pub use error::EmbeddingError;
