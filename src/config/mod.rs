//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `GRADER_*` environment variables.
//! The artifact root falls back to `LAMBDA_TASK_ROOT`, which the hosting
//! runtime sets to the directory the deployment image was unpacked into.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::constants::ENV_TASK_ROOT;
use crate::registry::{ArtifactPaths, RegistryConfig};

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `GRADER_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Root of the artifact tree (models + lexicon data). Default: `.`.
    pub artifact_root: PathBuf,

    /// Overrides `<artifact_root>/models/regressor`.
    pub regressor_path: Option<PathBuf>,

    /// Load models at start-up instead of on the first request.
    pub preload: bool,

    /// Run with deterministic stub models (no artifacts needed).
    pub stub_models: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            artifact_root: PathBuf::from("."),
            regressor_path: None,
            preload: false,
            stub_models: false,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "GRADER_PORT";
    const ENV_BIND_ADDR: &'static str = "GRADER_BIND_ADDR";
    const ENV_ARTIFACT_ROOT: &'static str = "GRADER_ARTIFACT_ROOT";
    const ENV_REGRESSOR_PATH: &'static str = "GRADER_REGRESSOR_PATH";
    const ENV_PRELOAD: &'static str = "GRADER_PRELOAD";
    const ENV_STUB_MODELS: &'static str = "GRADER_STUB_MODELS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let artifact_root = Self::parse_optional_path_from_env(Self::ENV_ARTIFACT_ROOT)
            .or_else(|| Self::parse_optional_path_from_env(ENV_TASK_ROOT))
            .unwrap_or(defaults.artifact_root);
        let regressor_path = Self::parse_optional_path_from_env(Self::ENV_REGRESSOR_PATH);
        let preload = Self::parse_bool_from_env(Self::ENV_PRELOAD, defaults.preload)?;
        let stub_models = Self::parse_bool_from_env(Self::ENV_STUB_MODELS, defaults.stub_models)?;

        Ok(Self {
            port,
            bind_addr,
            artifact_root,
            regressor_path,
            preload,
            stub_models,
        })
    }

    /// Validates paths and basic invariants (does not touch model files).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stub_models {
            return Ok(());
        }

        if !self.artifact_root.exists() {
            return Err(ConfigError::PathNotFound {
                path: self.artifact_root.clone(),
            });
        }
        if !self.artifact_root.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.artifact_root.clone(),
            });
        }

        if let Some(ref path) = self.regressor_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        Ok(())
    }

    /// Listen address for the HTTP server.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    /// Resolves the artifact layout, applying the regressor override.
    pub fn artifact_paths(&self) -> ArtifactPaths {
        let paths = ArtifactPaths::from_root(&self.artifact_root);
        match &self.regressor_path {
            Some(dir) => paths.with_regressor_dir(dir.clone()),
            None => paths,
        }
    }

    /// Builds the registry configuration for this process.
    pub fn registry_config(&self) -> RegistryConfig {
        if self.stub_models {
            RegistryConfig::stub()
        } else {
            RegistryConfig::new(self.artifact_paths())
        }
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_bool_from_env(name: &'static str, default: bool) -> Result<bool, ConfigError> {
        let Ok(value) = env::var(name) else {
            return Ok(default);
        };

        match value.trim().to_ascii_lowercase().as_str() {
            "" => Ok(default),
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidBool { name, value }),
        }
    }
}
