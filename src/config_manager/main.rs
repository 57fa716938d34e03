use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config_manager::stateless_llm::{BackendConfig, BackendSettings};
use crate::config_manager::system::SystemConfig;
use crate::config_manager::utils::{file_format, read_config_file};
use crate::config_manager::ConfigError;

/// Prefix for environment overrides, e.g. `TRANSLATOR__BACKEND__MODEL`.
pub const ENV_PREFIX: &str = "TRANSLATOR";

const DEFAULT_CONFIG_FILES: [&str; 3] = ["translator.yaml", "translator.json", "translator.toml"];

/// Main configuration for the application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: SystemConfig,

    #[serde(default)]
    pub backend: BackendSettings,
}

impl Config {
    /// Find the configuration file: `CONFIG_PATH` first, then the default names
    /// in the working directory. A missing file is fine, everything has defaults.
    pub fn discover() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("CONFIG_PATH") {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        DEFAULT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Layer defaults, the optional file and `TRANSLATOR__*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            debug!("Reading configuration from {}", path.display());
            let content = read_config_file(path)?;
            builder = builder.add_source(config::File::from_str(&content, file_format(path)));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate the backend section against the process environment.
    pub fn backend_config(&self) -> Result<BackendConfig, ConfigError> {
        self.backend.resolve(|var| std::env::var(var).ok())
    }
}
