use serde::{Deserialize, Deserializer, Serialize};

use super::error::InvalidInput;

/// Source-language value that asks the model to detect the language itself.
pub const AUTO_DETECT: &str = "auto";

/// Domain used when the caller gives none.
pub const DEFAULT_DOMAIN: &str = "general";

/// One validated translation request. Built fresh per call, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    text: String,
    source_lang: String,
    target_lang: String,
    domain: String,
}

impl TranslationRequest {
    /// Validate the four inputs. `text` is kept verbatim (only checked for
    /// blankness); a blank or absent `domain` becomes [`DEFAULT_DOMAIN`].
    pub fn new(
        text: impl Into<String>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
        domain: Option<&str>,
    ) -> Result<Self, InvalidInput> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(InvalidInput::EmptyText);
        }

        let target_lang = target_lang.into();
        if is_auto_detect(&target_lang) {
            return Err(InvalidInput::AutoDetectTarget);
        }

        let domain = match domain {
            Some(d) if !d.trim().is_empty() => d.to_string(),
            _ => DEFAULT_DOMAIN.to_string(),
        };

        Ok(Self {
            text,
            source_lang: source_lang.into(),
            target_lang,
            domain,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source_lang(&self) -> &str {
        &self.source_lang
    }

    pub fn target_lang(&self) -> &str {
        &self.target_lang
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }
}

fn is_auto_detect(lang: &str) -> bool {
    lang.trim().eq_ignore_ascii_case(AUTO_DETECT)
}

/// The backend's output, untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TranslationResult(String);

impl TranslationResult {
    pub fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// `POST /api/translate` body
#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    pub target_lang: String,
    #[serde(default)]
    pub domain: Option<String>,
}

fn default_source_lang() -> String {
    AUTO_DETECT.to_string()
}

/// Read an absent or `null` string as empty so it fails validation as blank text.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translation: String,
    pub elapsed_ms: u64,
}
