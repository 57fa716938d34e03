use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::ConfigError;

/// Hosted completion backends the translator can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAICompatible,
    OpenAI,
    Groq,
    Gemini,
    Deepseek,
    Mistral,
    Ollama,
    Claude,
}

impl LlmProvider {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "openai_compatible_llm" => Some(Self::OpenAICompatible),
            "openai_llm" => Some(Self::OpenAI),
            "groq_llm" => Some(Self::Groq),
            "gemini_llm" => Some(Self::Gemini),
            "deepseek_llm" => Some(Self::Deepseek),
            "mistral_llm" => Some(Self::Mistral),
            "ollama_llm" => Some(Self::Ollama),
            "claude_llm" => Some(Self::Claude),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenAICompatible => "openai_compatible_llm",
            Self::OpenAI => "openai_llm",
            Self::Groq => "groq_llm",
            Self::Gemini => "gemini_llm",
            Self::Deepseek => "deepseek_llm",
            Self::Mistral => "mistral_llm",
            Self::Ollama => "ollama_llm",
            Self::Claude => "claude_llm",
        }
    }

    pub fn default_base_url(&self) -> Option<&'static str> {
        match self {
            Self::OpenAICompatible => None,
            Self::OpenAI => Some("https://api.openai.com/v1"),
            Self::Groq => Some("https://api.groq.com/openai/v1"),
            Self::Gemini => Some("https://generativelanguage.googleapis.com/v1beta/openai"),
            Self::Deepseek => Some("https://api.deepseek.com/v1"),
            Self::Mistral => Some("https://api.mistral.ai/v1"),
            Self::Ollama => Some("http://localhost:11434/v1"),
            Self::Claude => Some("https://api.anthropic.com"),
        }
    }

    /// Environment variables consulted, in order, when no key is configured explicitly.
    pub fn api_key_vars(&self) -> &'static [&'static str] {
        match self {
            Self::OpenAICompatible => &["LLM_API_KEY"],
            Self::OpenAI => &["OPENAI_API_KEY", "LLM_API_KEY"],
            Self::Groq => &["GROQ_API_KEY", "LLM_API_KEY"],
            Self::Gemini => &["GEMINI_API_KEY", "GOOGLE_API_KEY", "LLM_API_KEY"],
            Self::Deepseek => &["DEEPSEEK_API_KEY", "LLM_API_KEY"],
            Self::Mistral => &["MISTRAL_API_KEY", "LLM_API_KEY"],
            Self::Ollama => &["OLLAMA_API_KEY"],
            Self::Claude => &["ANTHROPIC_API_KEY", "LLM_API_KEY"],
        }
    }

    /// A local Ollama server is the only backend that runs without a credential.
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Self::Ollama)
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Backend settings as they appear in the config file / environment.
#[derive(Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    #[serde(default = "default_provider")]
    pub llm_provider: String,

    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub organization_id: Option<String>,

    #[serde(default)]
    pub project_id: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Only used by the Anthropic messages API, which requires an explicit cap.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_provider() -> String {
    "groq_llm".to_string()
}

fn default_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_tokens() -> u32 {
    4096
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            llm_provider: default_provider(),
            base_url: None,
            model: default_model(),
            api_key: None,
            organization_id: None,
            project_id: None,
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            max_tokens: default_max_tokens(),
        }
    }
}

// The credential must never end up in logs.
impl fmt::Debug for BackendSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendSettings")
            .field("llm_provider", &self.llm_provider)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("organization_id", &self.organization_id)
            .field("project_id", &self.project_id)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl BackendSettings {
    /// Validate the settings and resolve defaults, looking up fallback
    /// credentials through `lookup` (normally `std::env::var`).
    pub fn resolve<F>(&self, lookup: F) -> Result<BackendConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = LlmProvider::from_name(&self.llm_provider)
            .ok_or_else(|| ConfigError::UnknownProvider(self.llm_provider.clone()))?;

        let model = self.model.trim();
        if model.is_empty() {
            return Err(ConfigError::MissingModel);
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidTemperature(self.temperature));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        let base_url = non_blank(self.base_url.as_deref())
            .or_else(|| provider.default_base_url().map(str::to_string))
            .ok_or(ConfigError::MissingBaseUrl(provider.name()))?;

        let api_key = non_blank(self.api_key.as_deref()).or_else(|| {
            provider
                .api_key_vars()
                .iter()
                .find_map(|&var| non_blank(lookup(var).as_deref()))
        });

        if api_key.is_none() && provider.requires_api_key() {
            return Err(ConfigError::MissingCredential {
                provider: provider.name(),
                vars: provider.api_key_vars().join(", "),
            });
        }

        Ok(BackendConfig {
            provider,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
            organization_id: non_blank(self.organization_id.as_deref()),
            project_id: non_blank(self.project_id.as_deref()),
            temperature: self.temperature,
            timeout: Duration::from_secs(self.timeout_secs),
            max_tokens: self.max_tokens,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Validated, immutable backend configuration.
#[derive(Clone)]
pub struct BackendConfig {
    pub provider: LlmProvider,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub organization_id: Option<String>,
    pub project_id: Option<String>,
    pub temperature: f32,
    pub timeout: Duration,
    pub max_tokens: u32,
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_target_groq_with_low_temperature() {
        let settings = BackendSettings {
            api_key: Some("gsk-test".to_string()),
            ..BackendSettings::default()
        };
        let config = settings.resolve(no_env).unwrap();

        assert_eq!(config.provider, LlmProvider::Groq);
        assert_eq!(config.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(config.model, "llama-3.3-70b-versatile");
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn missing_credential_is_a_configuration_error() {
        let err = BackendSettings::default().resolve(no_env).unwrap_err();
        match err {
            ConfigError::MissingCredential { provider, vars } => {
                assert_eq!(provider, "groq_llm");
                assert!(vars.contains("GROQ_API_KEY"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn blank_credential_counts_as_missing() {
        let settings = BackendSettings {
            api_key: Some("   ".to_string()),
            ..BackendSettings::default()
        };
        assert!(matches!(
            settings.resolve(no_env),
            Err(ConfigError::MissingCredential { .. })
        ));
    }

    #[test]
    fn credential_falls_back_to_provider_variable() {
        let settings = BackendSettings {
            llm_provider: "gemini_llm".to_string(),
            model: "gemini-1.5-flash".to_string(),
            ..BackendSettings::default()
        };
        let config = settings
            .resolve(|var| (var == "GOOGLE_API_KEY").then(|| "g-key".to_string()))
            .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("g-key"));
    }

    #[test]
    fn explicit_key_wins_over_environment() {
        let settings = BackendSettings {
            api_key: Some("explicit".to_string()),
            ..BackendSettings::default()
        };
        let config = settings
            .resolve(|_| Some("from-env".to_string()))
            .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("explicit"));
    }

    #[test]
    fn ollama_runs_without_credential() {
        let settings = BackendSettings {
            llm_provider: "ollama_llm".to_string(),
            model: "qwen2.5:7b".to_string(),
            ..BackendSettings::default()
        };
        let config = settings.resolve(no_env).unwrap();
        assert!(config.api_key.is_none());
        assert_eq!(config.base_url, "http://localhost:11434/v1");
    }

    #[test]
    fn blank_model_is_rejected() {
        let settings = BackendSettings {
            model: "  ".to_string(),
            api_key: Some("k".to_string()),
            ..BackendSettings::default()
        };
        assert!(matches!(settings.resolve(no_env), Err(ConfigError::MissingModel)));
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let settings = BackendSettings {
            llm_provider: "llama_cpp_llm".to_string(),
            api_key: Some("k".to_string()),
            ..BackendSettings::default()
        };
        assert!(matches!(
            settings.resolve(no_env),
            Err(ConfigError::UnknownProvider(name)) if name == "llama_cpp_llm"
        ));
    }

    #[test]
    fn generic_provider_needs_base_url() {
        let settings = BackendSettings {
            llm_provider: "openai_compatible_llm".to_string(),
            api_key: Some("k".to_string()),
            ..BackendSettings::default()
        };
        assert!(matches!(
            settings.resolve(no_env),
            Err(ConfigError::MissingBaseUrl("openai_compatible_llm"))
        ));

        let settings = BackendSettings {
            base_url: Some("http://llm.internal:8080/v1/".to_string()),
            ..settings
        };
        let config = settings.resolve(no_env).unwrap();
        assert_eq!(config.base_url, "http://llm.internal:8080/v1");
    }

    #[test]
    fn out_of_range_temperature_and_zero_timeout_are_rejected() {
        let hot = BackendSettings {
            temperature: 3.5,
            api_key: Some("k".to_string()),
            ..BackendSettings::default()
        };
        assert!(matches!(hot.resolve(no_env), Err(ConfigError::InvalidTemperature(_))));

        let no_timeout = BackendSettings {
            timeout_secs: 0,
            api_key: Some("k".to_string()),
            ..BackendSettings::default()
        };
        assert!(matches!(no_timeout.resolve(no_env), Err(ConfigError::InvalidTimeout)));
    }

    #[test]
    fn debug_output_redacts_credential() {
        let settings = BackendSettings {
            api_key: Some("super-secret".to_string()),
            ..BackendSettings::default()
        };
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));

        let config = settings.resolve(no_env).unwrap();
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
