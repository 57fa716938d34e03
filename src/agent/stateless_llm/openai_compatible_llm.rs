use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::stateless_llm_interface::{read_body, ChatMessage, ChatRole, LlmError, StatelessLLMInterface};
use crate::config_manager::BackendConfig;

/// OpenAI compatible LLM implementation.
/// Covers OpenAI itself plus Groq, Gemini, DeepSeek, Mistral and Ollama,
/// which all expose `/chat/completions`.
pub struct OpenAICompatibleLLM {
    client: Client,
    model: String,
    base_url: String,
    api_key: Option<String>,
    organization_id: Option<String>,
    project_id: Option<String>,
    temperature: f32,
    timeout: Duration,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAICompatibleLLM {
    pub fn new(client: Client, config: &BackendConfig) -> Self {
        info!(
            "Initialized OpenAICompatibleLLM: provider={}, model={}, base_url={}",
            config.provider, config.model, config.base_url
        );
        Self {
            client,
            model: config.model.clone(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            organization_id: config.organization_id.clone(),
            project_id: config.project_id.clone(),
            temperature: config.temperature,
            timeout: config.timeout,
        }
    }
}

#[async_trait]
impl StatelessLLMInterface for OpenAICompatibleLLM {
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        system: Option<&str>,
    ) -> Result<String, LlmError> {
        let mut wire_messages = Vec::with_capacity(messages.len() + 1);
        if let Some(sys) = system {
            wire_messages.push(ChatMessage {
                role: ChatRole::System,
                content: sys.to_string(),
            });
        }
        wire_messages.extend(messages);

        let body = ChatCompletionRequest {
            model: &self.model,
            messages: wire_messages,
            temperature: self.temperature,
            stream: false,
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!("POST {} (model={})", url, self.model);

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        if let Some(org) = &self.organization_id {
            request = request.header("OpenAI-Organization", org);
        }
        if let Some(project) = &self.project_id {
            request = request.header("OpenAI-Project", project);
        }

        let response = request
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest(e, self.timeout))?;
        let body = read_body(response, self.timeout).await?;

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::Malformed(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Malformed("response contained no choices".to_string()))?
            .message
            .content
            .ok_or_else(|| LlmError::Malformed("choice has no message content".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_manager::LlmProvider;
    use mockito::Matcher;
    use serde_json::json;

    fn config(base_url: &str) -> BackendConfig {
        BackendConfig {
            provider: LlmProvider::Groq,
            base_url: base_url.to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            api_key: Some("gsk-test".to_string()),
            organization_id: None,
            project_id: None,
            temperature: 0.2,
            timeout: Duration::from_secs(5),
            max_tokens: 4096,
        }
    }

    fn llm(config: &BackendConfig) -> OpenAICompatibleLLM {
        OpenAICompatibleLLM::new(Client::new(), config)
    }

    #[tokio::test]
    async fn sends_system_and_user_turns_and_returns_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer gsk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "llama-3.3-70b-versatile",
                "temperature": 0.2,
                "stream": false,
                "messages": [
                    {"role": "system", "content": "be a translator"},
                    {"role": "user", "content": "Bonjour"}
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"  Hello \n"}}]}"#)
            .create_async()
            .await;

        let out = llm(&config(&server.url()))
            .chat_completion(vec![ChatMessage::user("Bonjour")], Some("be a translator"))
            .await
            .unwrap();

        assert_eq!(out, "  Hello \n");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn optional_headers_are_forwarded() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("OpenAI-Organization", "org-1")
            .match_header("OpenAI-Project", "proj-1")
            .with_body(r#"{"choices":[{"message":{"content":"ok"}}]}"#)
            .create_async()
            .await;

        let mut cfg = config(&server.url());
        cfg.organization_id = Some("org-1".to_string());
        cfg.project_id = Some("proj-1".to_string());

        let out = llm(&cfg)
            .chat_completion(vec![ChatMessage::user("x")], None)
            .await
            .unwrap();
        assert_eq!(out, "ok");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn no_key_means_no_authorization_header() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", Matcher::Missing)
            .with_body(r#"{"choices":[{"message":{"content":"ok"}}]}"#)
            .create_async()
            .await;

        let mut cfg = config(&server.url());
        cfg.api_key = None;
        llm(&cfg)
            .chat_completion(vec![ChatMessage::user("x")], None)
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_keeps_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":{"message":"Invalid API Key"}}"#)
            .create_async()
            .await;

        let err = llm(&config(&server.url()))
            .chat_completion(vec![ChatMessage::user("x")], None)
            .await
            .unwrap_err();

        match err {
            LlmError::Status { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("Invalid API Key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_choices_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let err = llm(&config(&server.url()))
            .chat_completion(vec![ChatMessage::user("x")], None)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Malformed(_)));
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_body("<html>gateway</html>")
            .create_async()
            .await;

        let err = llm(&config(&server.url()))
            .chat_completion(vec![ChatMessage::user("x")], None)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Malformed(_)));
    }

    #[tokio::test]
    async fn unreachable_backend_is_transport_error() {
        // Port 9 (discard) on localhost is not expected to be listening
        let err = llm(&config("http://127.0.0.1:9"))
            .chat_completion(vec![ChatMessage::user("x")], None)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Transport(_)));
    }
}
