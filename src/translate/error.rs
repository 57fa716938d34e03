use thiserror::Error;

use crate::agent::LlmError;

/// Why a request was rejected before reaching the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("please provide text to translate")]
    EmptyText,

    #[error("target language cannot be auto-detect; choose a concrete language")]
    AutoDetectTarget,
}

/// Failure of a single translation call. There is no partial success.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("translation service is not configured: {0}")]
    Configuration(String),

    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),

    #[error("translation service error: {0}")]
    Backend(#[from] LlmError),
}

impl TranslateError {
    /// Stable machine-readable tag, one per taxonomy member.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::InvalidInput(_) => "invalid_input",
            Self::Backend(LlmError::Timeout(_)) => "backend_timeout",
            Self::Backend(_) => "backend",
        }
    }
}
