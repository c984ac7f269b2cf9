//! On-disk artifact trees for integration tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use candle_core::{DType, Device, Tensor};
use tempfile::TempDir;

use grader::regression::network::{self, NetworkConfig, OutputActivation};
use grader::registry::ArtifactPaths;

pub const STOPWORDS: &[&str] = &["this", "is", "a", "the", "and", "of"];

pub const NOUN_INDEX: &[&str] = &["essay", "child", "box", "city", "idea", "great"];

pub const NOUN_EXCEPTIONS: &[(&str, &str)] = &[("children", "child")];

/// A temporary artifact root laid out like the deployment image.
pub struct ArtifactTree {
    dir: TempDir,
}

impl ArtifactTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn paths(&self) -> ArtifactPaths {
        ArtifactPaths::from_root(self.root())
    }

    pub fn regressor_dir(&self) -> PathBuf {
        self.paths().regressor_dir
    }

    /// Writes a regressor whose LSTM weights are all zero, so every input
    /// scores exactly `dense_bias` (before activation).
    pub fn with_regressor(self, input_dim: usize, dense_bias: f32) -> Self {
        self.with_regressor_config(
            NetworkConfig {
                input_dim,
                lstm_units: vec![16, 8],
                output_activation: OutputActivation::Linear,
            },
            dense_bias,
        )
    }

    pub fn with_regressor_config(self, config: NetworkConfig, dense_bias: f32) -> Self {
        let dir = self.regressor_dir();
        std::fs::create_dir_all(&dir).unwrap();
        write_zero_network(&dir, &config, dense_bias);
        self
    }

    /// Writes the NLTK stopword list and a small WordNet noun dictionary.
    pub fn with_lexicon(self) -> Self {
        let corpora = self.paths().lexicon_dir.join("corpora");

        let stopwords_dir = corpora.join("stopwords");
        std::fs::create_dir_all(&stopwords_dir).unwrap();
        std::fs::write(stopwords_dir.join("english"), STOPWORDS.join("\n")).unwrap();

        let wordnet = corpora.join("wordnet");
        std::fs::create_dir_all(&wordnet).unwrap();
        let index: String = NOUN_INDEX
            .iter()
            .map(|lemma| format!("{} n 1 0 1 0 00000000\n", lemma))
            .collect();
        std::fs::write(wordnet.join("index.noun"), index).unwrap();
        let exceptions: String = NOUN_EXCEPTIONS
            .iter()
            .map(|(inflected, base)| format!("{} {}\n", inflected, base))
            .collect();
        std::fs::write(wordnet.join("noun.exc"), exceptions).unwrap();

        self
    }
}

fn write_zero_network(dir: &Path, config: &NetworkConfig, dense_bias: f32) {
    let dev = Device::Cpu;
    let zeros = |shape: (usize, usize)| Tensor::zeros(shape, DType::F32, &dev).unwrap();
    let mut tensors: HashMap<String, Tensor> = HashMap::new();

    let mut in_dim = config.input_dim;
    for (idx, &units) in config.lstm_units.iter().enumerate() {
        tensors.insert(format!("lstm.{idx}.weight_ih_l0"), zeros((4 * units, in_dim)));
        tensors.insert(format!("lstm.{idx}.weight_hh_l0"), zeros((4 * units, units)));
        tensors.insert(
            format!("lstm.{idx}.bias_ih_l0"),
            Tensor::zeros(4 * units, DType::F32, &dev).unwrap(),
        );
        tensors.insert(
            format!("lstm.{idx}.bias_hh_l0"),
            Tensor::zeros(4 * units, DType::F32, &dev).unwrap(),
        );
        in_dim = units;
    }

    tensors.insert("dense.weight".to_string(), zeros((1, in_dim)));
    tensors.insert(
        "dense.bias".to_string(),
        Tensor::new(&[dense_bias], &dev).unwrap(),
    );

    candle_core::safetensors::save(&tensors, dir.join(network::WEIGHTS_FILE)).unwrap();
    std::fs::write(
        dir.join(network::CONFIG_FILE),
        serde_json::to_string(config).unwrap(),
    )
    .unwrap();
}
