use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, warn};

use crate::constants::REGRESSOR_INPUT_DIM;
use crate::embedding::device::select_device;
use crate::embedding::{BertEncoder, EncoderConfig, TextEncoder};
use crate::regression::{RecurrentRegressor, Regressor, StubRegressor};
use crate::text::{TextNormalizer, load_normalizer};

use super::error::ModelLoadError;

/// On-disk layout of the deployed artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub tokenizer_dir: PathBuf,
    pub encoder_dir: PathBuf,
    pub regressor_dir: PathBuf,
    /// NLTK data directory (`corpora/stopwords`, `corpora/wordnet`).
    pub lexicon_dir: PathBuf,
}

impl ArtifactPaths {
    pub fn from_root(root: &Path) -> Self {
        let models = root.join("models");
        Self {
            tokenizer_dir: models.join("bert-tokenizer"),
            encoder_dir: models.join("bert-model"),
            regressor_dir: models.join("regressor"),
            lexicon_dir: root.join("nltk_data"),
        }
    }

    pub fn with_regressor_dir(mut self, dir: PathBuf) -> Self {
        self.regressor_dir = dir;
        self
    }
}

#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub paths: ArtifactPaths,
    /// If true, load deterministic stub models instead of reading artifacts.
    pub testing_stub: bool,
}

impl RegistryConfig {
    pub fn new(paths: ArtifactPaths) -> Self {
        Self {
            paths,
            testing_stub: false,
        }
    }

    pub fn stub() -> Self {
        Self {
            paths: ArtifactPaths::from_root(Path::new(".")),
            testing_stub: true,
        }
    }
}

/// Everything a request needs, loaded together.
pub struct ModelSet {
    encoder: Box<dyn TextEncoder>,
    regressor: Box<dyn Regressor>,
    normalizer: TextNormalizer,
}

impl std::fmt::Debug for ModelSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelSet")
            .field("encoder_hidden_size", &self.encoder.hidden_size())
            .field("regressor_input_dim", &self.regressor.input_dim())
            .field("stopwords", &self.normalizer.stopwords().len())
            .finish()
    }
}

impl ModelSet {
    pub fn new(
        encoder: Box<dyn TextEncoder>,
        regressor: Box<dyn Regressor>,
        normalizer: TextNormalizer,
    ) -> Self {
        Self {
            encoder,
            regressor,
            normalizer,
        }
    }

    pub fn encoder(&self) -> &dyn TextEncoder {
        self.encoder.as_ref()
    }

    pub fn regressor(&self) -> &dyn Regressor {
        self.regressor.as_ref()
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }
}

/// The expensive part of [`ModelRegistry::ensure_loaded`](super::ModelRegistry::ensure_loaded).
pub trait ModelLoader: Send + Sync {
    fn load(&self) -> Result<ModelSet, ModelLoadError>;
}

/// Loads the production artifacts described by a [`RegistryConfig`].
#[derive(Debug, Clone)]
pub struct ArtifactLoader {
    config: RegistryConfig,
}

impl ArtifactLoader {
    pub fn new(config: RegistryConfig) -> Self {
        Self { config }
    }

    fn load_stub(&self) -> Result<ModelSet, ModelLoadError> {
        warn!("Registry running in STUB mode (testing only)");
        let encoder = BertEncoder::load(EncoderConfig::stub()).map_err(ModelLoadError::Encoder)?;
        Ok(ModelSet::new(
            Box::new(encoder),
            Box::new(StubRegressor::default()),
            TextNormalizer::default(),
        ))
    }
}

impl ModelLoader for ArtifactLoader {
    fn load(&self) -> Result<ModelSet, ModelLoadError> {
        if self.config.testing_stub {
            return self.load_stub();
        }

        let started = Instant::now();
        let paths = &self.config.paths;

        let normalizer =
            load_normalizer(&paths.lexicon_dir).map_err(|source| ModelLoadError::Lexicon {
                path: paths.lexicon_dir.clone(),
                source,
            })?;

        let encoder = BertEncoder::load(EncoderConfig::new(
            &paths.encoder_dir,
            &paths.tokenizer_dir,
        ))
        .map_err(ModelLoadError::Encoder)?;

        let regressor = RecurrentRegressor::load(&paths.regressor_dir, &select_device())
            .map_err(ModelLoadError::Regressor)?;

        if regressor.input_dim() != REGRESSOR_INPUT_DIM {
            warn!(
                input_dim = regressor.input_dim(),
                expected = REGRESSOR_INPUT_DIM,
                "Regression model input width differs from the adapter target"
            );
        }

        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            encoder_hidden_size = encoder.hidden_size(),
            regressor_input_dim = regressor.input_dim(),
            "All models loaded"
        );

        Ok(ModelSet::new(
            Box::new(encoder),
            Box::new(regressor),
            normalizer,
        ))
    }
}
