//! Recurrent regression network: stacked LSTM layers over a single timestep,
//! then a one-unit dense head.
//!
//! Artifact layout (`<dir>/config.json` + `<dir>/model.safetensors`):
//!
//! ```json
//! { "input_dim": 300, "lstm_units": [300, 64], "output_activation": "relu" }
//! ```
//!
//! Layer `i` reads `lstm.{i}.weight_ih_l0`, `lstm.{i}.weight_hh_l0`,
//! `lstm.{i}.bias_ih_l0`, `lstm.{i}.bias_hh_l0` (gate order i, f, g, o);
//! the head reads `dense.weight` (`[1, units]`) and `dense.bias` (`[1]`).

use std::path::Path;

use candle_core::{DType, Device, IndexOp, Tensor};
use candle_nn::rnn::{LSTM, LSTMConfig, RNN};
use candle_nn::{Linear, Module, VarBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::constants::validate_dim;

use super::Regressor;
use super::error::PredictionError;

pub const CONFIG_FILE: &str = "config.json";
pub const WEIGHTS_FILE: &str = "model.safetensors";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputActivation {
    #[default]
    Linear,
    Relu,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub input_dim: usize,
    #[serde(default)]
    pub lstm_units: Vec<usize>,
    #[serde(default)]
    pub output_activation: OutputActivation,
}

impl NetworkConfig {
    pub fn validate(&self) -> Result<(), PredictionError> {
        if self.input_dim == 0 {
            return Err(PredictionError::InvalidConfig {
                reason: "input_dim must be positive".to_string(),
            });
        }
        if let Some(pos) = self.lstm_units.iter().position(|&u| u == 0) {
            return Err(PredictionError::InvalidConfig {
                reason: format!("lstm layer {} has zero units", pos),
            });
        }
        Ok(())
    }
}

pub struct RecurrentRegressor {
    layers: Vec<LSTM>,
    head: Linear,
    config: NetworkConfig,
    device: Device,
}

impl std::fmt::Debug for RecurrentRegressor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecurrentRegressor")
            .field("config", &self.config)
            .field("device", &format!("{:?}", self.device))
            .finish()
    }
}

impl RecurrentRegressor {
    /// Loads `config.json` and `model.safetensors` from `model_dir`.
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self, PredictionError> {
        let model_dir = model_dir.as_ref();
        let config_path = model_dir.join(CONFIG_FILE);
        let weights_path = model_dir.join(WEIGHTS_FILE);

        for path in [&config_path, &weights_path] {
            if !path.is_file() {
                return Err(PredictionError::ModelNotFound { path: path.clone() });
            }
        }

        let config_content = std::fs::read_to_string(&config_path).map_err(|e| {
            PredictionError::ModelLoadFailed {
                reason: format!("Failed to read {}: {}", config_path.display(), e),
            }
        })?;
        let config: NetworkConfig = serde_json::from_str(&config_content).map_err(|e| {
            PredictionError::ModelLoadFailed {
                reason: format!("Failed to parse config: {}", e),
            }
        })?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[&weights_path], DType::F32, device)
        }
        .map_err(|e| PredictionError::ModelLoadFailed {
            reason: format!("Failed to map weights: {}", e),
        })?;

        let model = Self::from_var_builder(config, vb, device.clone())?;

        info!(
            model_dir = %model_dir.display(),
            input_dim = model.config.input_dim,
            lstm_units = ?model.config.lstm_units,
            activation = ?model.config.output_activation,
            "Regression network loaded"
        );

        Ok(model)
    }

    pub fn from_var_builder(
        config: NetworkConfig,
        vb: VarBuilder,
        device: Device,
    ) -> Result<Self, PredictionError> {
        config.validate()?;

        let mut in_dim = config.input_dim;
        let mut layers = Vec::with_capacity(config.lstm_units.len());
        for (idx, &units) in config.lstm_units.iter().enumerate() {
            let layer = candle_nn::lstm(
                in_dim,
                units,
                LSTMConfig::default(),
                vb.pp(format!("lstm.{idx}")),
            )
            .map_err(|e| PredictionError::ModelLoadFailed {
                reason: format!("Failed to load lstm layer {}: {}", idx, e),
            })?;
            layers.push(layer);
            in_dim = units;
        }

        let head = candle_nn::linear(in_dim, 1, vb.pp("dense")).map_err(|e| {
            PredictionError::ModelLoadFailed {
                reason: format!("Failed to load dense head: {}", e),
            }
        })?;

        Ok(Self {
            layers,
            head,
            config,
            device,
        })
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// `input`: `[batch, timesteps, input_dim]`, output: `[batch, 1]`.
    fn forward(&self, input: &Tensor) -> candle_core::Result<Tensor> {
        let mut x = input.clone();
        for layer in &self.layers {
            let states = layer.seq(&x)?;
            x = layer.states_to_tensor(&states)?;
        }

        let last_step = x.dim(1)? - 1;
        let features = x.i((.., last_step, ..))?;
        let out = self.head.forward(&features)?;

        match self.config.output_activation {
            OutputActivation::Linear => Ok(out),
            OutputActivation::Relu => out.relu(),
        }
    }
}

impl Regressor for RecurrentRegressor {
    fn input_dim(&self) -> usize {
        self.config.input_dim
    }

    fn predict(&self, features: &[f32]) -> Result<f32, PredictionError> {
        validate_dim(features.len(), self.config.input_dim)?;

        // batch of one essay, one timestep
        let input = Tensor::from_slice(features, (1, 1, self.config.input_dim), &self.device)?;
        let output = self.forward(&input)?.flatten_all()?.to_vec1::<f32>()?;

        let raw = output
            .first()
            .copied()
            .ok_or_else(|| PredictionError::InferenceFailed {
                reason: "regression model returned no output".to_string(),
            })?;

        debug!(raw_score = raw, "Regression forward pass complete");
        Ok(raw)
    }
}
