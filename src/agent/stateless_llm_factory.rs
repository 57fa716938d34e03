use std::sync::Arc;
use tracing::info;

use crate::agent::stateless_llm::claude_llm::ClaudeLLM;
use crate::agent::stateless_llm::openai_compatible_llm::OpenAICompatibleLLM;
use crate::agent::stateless_llm::StatelessLLMInterface;
use crate::config_manager::{BackendConfig, ConfigError, LlmProvider};

/// Factory for creating stateless LLM instances
pub struct StatelessLLMFactory;

impl StatelessLLMFactory {
    /// Create an LLM for the validated backend configuration.
    ///
    /// The HTTP client carries the configured timeout so a hung backend
    /// surfaces as [`LlmError::Timeout`](crate::agent::LlmError::Timeout).
    pub fn create_llm(config: &BackendConfig) -> Result<Arc<dyn StatelessLLMInterface>, ConfigError> {
        info!("Initializing LLM: {}", config.provider);

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        match config.provider {
            LlmProvider::Claude => Ok(Arc::new(ClaudeLLM::new(client, config))),
            LlmProvider::OpenAICompatible
            | LlmProvider::OpenAI
            | LlmProvider::Groq
            | LlmProvider::Gemini
            | LlmProvider::Deepseek
            | LlmProvider::Mistral
            | LlmProvider::Ollama => Ok(Arc::new(OpenAICompatibleLLM::new(client, config))),
        }
    }
}
