pub mod main;
pub mod stateless_llm;
pub mod system;
pub mod utils;

pub use main::*;
pub use stateless_llm::*;
pub use system::*;

use thiserror::Error;

/// Errors raised while loading or validating configuration.
///
/// Anything in here blocks the translation feature; it is never a per-request failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Load(#[from] config::ConfigError),

    #[error("unsupported LLM provider: {0}")]
    UnknownProvider(String),

    #[error("missing credential for {provider}; set backend.api_key or one of {vars}")]
    MissingCredential { provider: &'static str, vars: String },

    #[error("model identifier must not be empty")]
    MissingModel,

    #[error("provider {0} has no default endpoint; set backend.base_url")]
    MissingBaseUrl(&'static str),

    #[error("temperature {0} is outside the supported range 0.0..=2.0")]
    InvalidTemperature(f32),

    #[error("request timeout must be greater than zero")]
    InvalidTimeout,

    #[error("invalid listen address {0}")]
    InvalidAddress(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}
