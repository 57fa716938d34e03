use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::agent::{LlmError, StatelessLLMFactory, StatelessLLMInterface};
use crate::config_manager::{BackendConfig, ConfigError};

use super::error::TranslateError;
use super::interface::{TranslationRequest, TranslationResult};
use super::prompt::{build_messages, SYSTEM_PROMPT};

/// The translation invoker: one request in, one backend call, one string out.
///
/// Holds no mutable state, so a single instance is shared by every HTTP
/// handler without locking.
#[derive(Clone)]
pub struct Translator {
    llm: Arc<dyn StatelessLLMInterface>,
    timeout: Duration,
}

impl Translator {
    pub fn new(llm: Arc<dyn StatelessLLMInterface>, timeout: Duration) -> Self {
        Self { llm, timeout }
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, ConfigError> {
        let llm = StatelessLLMFactory::create_llm(config)?;
        Ok(Self::new(llm, config.timeout))
    }

    /// Validate the raw inputs and translate.
    pub async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
        domain: Option<&str>,
    ) -> Result<TranslationResult, TranslateError> {
        let request = TranslationRequest::new(text, source_lang, target_lang, domain)?;
        self.translate_request(&request).await
    }

    pub async fn translate_request(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationResult, TranslateError> {
        info!(
            "Translating {} chars: {} -> {} (domain: {})",
            request.text().chars().count(),
            request.source_lang(),
            request.target_lang(),
            request.domain()
        );

        let call = self
            .llm
            .chat_completion(build_messages(request), Some(SYSTEM_PROMPT));

        // Dropping the call future on expiry aborts the in-flight HTTP request
        let output = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result?,
            Err(_) => return Err(LlmError::Timeout(self.timeout).into()),
        };

        if output.is_empty() {
            warn!("Backend returned an empty translation");
        }
        debug!("Translation finished ({} chars)", output.chars().count());

        Ok(TranslationResult::new(output))
    }
}
