//! Document embeddings by mean-pooling BERT token states.
//!
//! Use [`EncoderConfig::stub`] for tests/examples without model files.

/// Encoder configuration.
pub mod config;

#[cfg(test)]
mod tests;

pub use config::EncoderConfig;

use std::hash::{DefaultHasher, Hash, Hasher};

use candle_core::{DType, Device, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::constants::PAD_TOKEN_ID;
use crate::embedding::bert::BertEncoderModel;
use crate::embedding::device::select_device;
use crate::embedding::error::EmbeddingError;
use crate::embedding::utils::load_tokenizer_with_truncation;

/// Text to fixed-width vector.
///
/// `embed` must return exactly [`hidden_size`](TextEncoder::hidden_size)
/// values, including for text that tokenizes to nothing.
pub trait TextEncoder: Send + Sync {
    /// Token ids, truncated to the encoder's maximum sequence length.
    fn tokenize(&self, text: &str) -> Result<Vec<u32>, EmbeddingError>;

    /// Mean of the per-token representations for `token_ids`.
    fn encode(&self, token_ids: &[u32]) -> Result<Vec<f32>, EmbeddingError>;

    fn hidden_size(&self) -> usize;

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let token_ids = self.tokenize(text)?;
        if token_ids.is_empty() {
            debug!("No tokens to encode, returning zero embedding");
            return Ok(vec![0.0; self.hidden_size()]);
        }
        self.encode(&token_ids)
    }
}

enum EncoderBackend {
    Model {
        model: BertEncoderModel,
        tokenizer: Box<Tokenizer>,
        device: Device,
    },
    Stub,
}

/// BERT-backed [`TextEncoder`] (supports stub mode).
pub struct BertEncoder {
    backend: EncoderBackend,
    config: EncoderConfig,
    hidden_size: usize,
}

impl std::fmt::Debug for BertEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BertEncoder")
            .field(
                "backend",
                &match &self.backend {
                    EncoderBackend::Model { device, .. } => format!("Model({:?})", device),
                    EncoderBackend::Stub => "Stub".to_string(),
                },
            )
            .field("hidden_size", &self.hidden_size)
            .field("max_seq_len", &self.config.max_seq_len)
            .finish()
    }
}

impl BertEncoder {
    /// Loads the encoder and its tokenizer from a config (stub mode is supported).
    pub fn load(config: EncoderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        if config.testing_stub {
            warn!("Encoder running in STUB mode (testing only)");
            return Ok(Self {
                backend: EncoderBackend::Stub,
                hidden_size: config.hidden_size,
                config,
            });
        }

        let device = select_device();

        let tokenizer =
            load_tokenizer_with_truncation(&config.tokenizer_path, config.max_seq_len).map_err(
                |e| EmbeddingError::ModelLoadFailed {
                    reason: format!("Failed to load tokenizer: {}", e),
                },
            )?;

        let model = BertEncoderModel::load(&config.model_dir, &device).map_err(|e| {
            EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to load BERT model: {}", e),
            }
        })?;

        info!(
            model_dir = %config.model_dir.display(),
            tokenizer = %config.tokenizer_file().display(),
            hidden_size = model.hidden_size(),
            max_seq_len = config.max_seq_len,
            "BERT encoder loaded"
        );

        Ok(Self {
            hidden_size: model.hidden_size(),
            backend: EncoderBackend::Model {
                model,
                tokenizer: Box::new(tokenizer),
                device,
            },
            config,
        })
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EncoderBackend::Stub)
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    fn encode_with_model(
        &self,
        token_ids: &[u32],
        model: &BertEncoderModel,
        device: &Device,
    ) -> Result<Vec<f32>, EmbeddingError> {
        debug!(
            token_count = token_ids.len(),
            "Generating embedding (encoder forward pass)"
        );

        let input_ids = Tensor::new(token_ids, device)?.unsqueeze(0)?;
        let token_type_ids = input_ids.zeros_like()?;

        let mask: Vec<u32> = token_ids
            .iter()
            .map(|&id| u32::from(id != PAD_TOKEN_ID))
            .collect();
        let attention_mask = Tensor::new(mask.as_slice(), device)?.unsqueeze(0)?;

        // hidden_states: [1, seq_len, hidden_size]
        let hidden_states = model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("Encoder forward pass failed: {}", e),
            })?;

        // Plain mean over every position, special tokens included.
        let pooled = hidden_states
            .mean(1)?
            .squeeze(0)?
            .to_dtype(DType::F32)?
            .to_vec1::<f32>()?;

        Ok(pooled)
    }

    fn tokenize_stub(&self, text: &str) -> Vec<u32> {
        text.split_whitespace()
            .take(self.config.max_seq_len)
            .map(|word| {
                let mut hasher = DefaultHasher::new();
                word.hash(&mut hasher);
                // Keep clear of the reserved low ids ([PAD], [CLS], ...).
                1000 + (hasher.finish() % 29_000) as u32
            })
            .collect()
    }

    fn encode_stub(&self, token_ids: &[u32]) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        token_ids.hash(&mut hasher);
        let mut state = hasher.finish();

        (0..self.hidden_size)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
                ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0
            })
            .collect()
    }
}

impl TextEncoder for BertEncoder {
    fn tokenize(&self, text: &str) -> Result<Vec<u32>, EmbeddingError> {
        match &self.backend {
            EncoderBackend::Model { tokenizer, .. } => {
                let encoding = tokenizer.encode(text, true).map_err(|e| {
                    EmbeddingError::TokenizationFailed {
                        reason: e.to_string(),
                    }
                })?;
                let mut ids = encoding.get_ids().to_vec();
                ids.truncate(self.config.max_seq_len);
                Ok(ids)
            }
            EncoderBackend::Stub => Ok(self.tokenize_stub(text)),
        }
    }

    fn encode(&self, token_ids: &[u32]) -> Result<Vec<f32>, EmbeddingError> {
        match &self.backend {
            EncoderBackend::Model { model, device, .. } => {
                self.encode_with_model(token_ids, model, device)
            }
            EncoderBackend::Stub => Ok(self.encode_stub(token_ids)),
        }
    }

    fn hidden_size(&self) -> usize {
        self.hidden_size
    }
}
