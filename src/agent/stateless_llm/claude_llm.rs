use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::stateless_llm_interface::{read_body, ChatMessage, ChatRole, LlmError, StatelessLLMInterface};
use crate::config_manager::BackendConfig;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Claude LLM implementation over the Anthropic messages API
pub struct ClaudeLLM {
    client: Client,
    model: String,
    base_url: String,
    api_key: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl ClaudeLLM {
    pub fn new(client: Client, config: &BackendConfig) -> Self {
        info!("Initialized ClaudeLLM: model={}, base_url={}", config.model, config.base_url);
        Self {
            client,
            model: config.model.clone(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone().unwrap_or_default(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: config.timeout,
        }
    }
}

#[async_trait]
impl StatelessLLMInterface for ClaudeLLM {
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        system: Option<&str>,
    ) -> Result<String, LlmError> {
        // The messages API takes system text as a top-level field, not as a turn
        let mut system_parts: Vec<String> = system.map(str::to_string).into_iter().collect();
        let mut turns = Vec::with_capacity(messages.len());
        for msg in messages {
            if msg.role == ChatRole::System {
                system_parts.push(msg.content);
            } else {
                turns.push(msg);
            }
        }

        let body = MessagesRequest {
            model: &self.model,
            system: (!system_parts.is_empty()).then(|| system_parts.join("\n\n")),
            messages: turns,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let url = format!("{}/v1/messages", self.base_url);
        debug!("POST {} (model={})", url, self.model);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest(e, self.timeout))?;
        let body = read_body(response, self.timeout).await?;

        let parsed: MessagesResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::Malformed(e.to_string()))?;

        let texts: Vec<String> = parsed
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();

        if texts.is_empty() {
            return Err(LlmError::Malformed("response contained no text blocks".to_string()));
        }

        Ok(texts.concat())
    }
}
