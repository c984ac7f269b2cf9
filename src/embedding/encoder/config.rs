use std::path::PathBuf;

use crate::constants::{ENCODER_HIDDEN_DIM, MAX_SEQ_LEN};
use crate::embedding::bert::{CONFIG_FILE, WEIGHTS_FILE};
use crate::embedding::error::EmbeddingError;
use crate::embedding::utils::TOKENIZER_FILE;

#[derive(Debug, Clone)]
/// Configuration for [`BertEncoder`](super::BertEncoder).
pub struct EncoderConfig {
    /// Directory with `config.json` + `model.safetensors`.
    pub model_dir: PathBuf,
    /// Directory with `tokenizer.json` (or the file itself).
    pub tokenizer_path: PathBuf,
    /// Max tokens fed to the encoder, special tokens included.
    pub max_seq_len: usize,
    /// Output width in stub mode (the real model reports its own).
    pub hidden_size: usize,
    /// If true, run in deterministic stub mode (no model files required).
    pub testing_stub: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::new(),
            tokenizer_path: PathBuf::new(),
            max_seq_len: MAX_SEQ_LEN,
            hidden_size: ENCODER_HIDDEN_DIM,
            testing_stub: false,
        }
    }
}

impl EncoderConfig {
    pub fn new<M: Into<PathBuf>, T: Into<PathBuf>>(model_dir: M, tokenizer_path: T) -> Self {
        Self {
            model_dir: model_dir.into(),
            tokenizer_path: tokenizer_path.into(),
            ..Default::default()
        }
    }

    /// Creates a stub config (no model files; produces deterministic embeddings).
    pub fn stub() -> Self {
        Self {
            testing_stub: true,
            ..Default::default()
        }
    }

    /// Checks that every artifact the real backend needs is present.
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.max_seq_len == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "max_seq_len must be positive".to_string(),
            });
        }

        if self.testing_stub {
            if self.hidden_size == 0 {
                return Err(EmbeddingError::InvalidConfig {
                    reason: "hidden_size must be positive".to_string(),
                });
            }
            return Ok(());
        }

        for path in [
            self.model_dir.join(CONFIG_FILE),
            self.model_dir.join(WEIGHTS_FILE),
            self.tokenizer_file(),
        ] {
            if !path.is_file() {
                return Err(EmbeddingError::ModelNotFound { path });
            }
        }

        Ok(())
    }

    /// Resolved path of `tokenizer.json`.
    pub fn tokenizer_file(&self) -> PathBuf {
        if self.tokenizer_path.is_dir() {
            self.tokenizer_path.join(TOKENIZER_FILE)
        } else {
            self.tokenizer_path.clone()
        }
    }
}
