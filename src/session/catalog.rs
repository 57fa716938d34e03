use serde::{Deserialize, Serialize};
use std::fmt;

use crate::translate::AUTO_DETECT;

/// A selectable option as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub label: &'static str,
    pub value: &'static str,
}

const fn entry(label: &'static str, value: &'static str) -> CatalogEntry {
    CatalogEntry { label, value }
}

/// Language table offered by the UI. Values go to the model as-is, no ISO mapping.
pub const LANGUAGES: &[CatalogEntry] = &[
    entry("Auto-detect", AUTO_DETECT),
    entry("English", "English"),
    entry("Hindi", "Hindi"),
    entry("French", "French"),
    entry("German", "German"),
    entry("Spanish", "Spanish"),
    entry("Chinese", "Chinese"),
    entry("Japanese", "Japanese"),
    entry("Arabic", "Arabic"),
    entry("Italian", "Italian"),
    entry("Russian", "Russian"),
    entry("Korean", "Korean"),
    entry("Portuguese", "Portuguese"),
    entry("Other", "Other"),
];

pub const DEFAULT_SOURCE_IDX: usize = 0;
pub const DEFAULT_TARGET_IDX: usize = 1;

pub const DOMAIN_PRESETS: &[CatalogEntry] = &[
    entry("General", "general conversation"),
    entry("Legal", "legal documents and contracts"),
    entry("Medical", "medical and healthcare"),
    entry("Technical", "software and technology"),
    entry("Marketing", "marketing and advertising"),
    entry("Academic", "academic and research"),
    entry("Entertainment", "movies and entertainment"),
    entry("News", "news and journalism"),
    entry("Business", "business communication"),
    entry("Creative", "creative writing and arts"),
];

pub fn language(idx: usize) -> Option<&'static CatalogEntry> {
    LANGUAGES.get(idx)
}

/// Look a preset up by label, case-insensitively.
pub fn domain_preset(label: &str) -> Option<&'static CatalogEntry> {
    DOMAIN_PRESETS
        .iter()
        .find(|preset| preset.label.eq_ignore_ascii_case(label.trim()))
}

/// Tone applied on top of the domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TranslationMode {
    #[default]
    Standard,
    Formal,
    Casual,
    Technical,
    Creative,
}

impl TranslationMode {
    pub const ALL: [TranslationMode; 5] = [
        Self::Standard,
        Self::Formal,
        Self::Casual,
        Self::Technical,
        Self::Creative,
    ];

    /// Sentence appended to the domain; `Standard` adds nothing.
    pub fn instruction(&self) -> Option<&'static str> {
        match self {
            Self::Standard => None,
            Self::Formal => Some("Use formal and professional language."),
            Self::Casual => Some("Use casual and conversational language."),
            Self::Technical => Some("Maintain technical terminology and precision."),
            Self::Creative => Some("Be creative and expressive in translation."),
        }
    }
}

impl fmt::Display for TranslationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Build the domain string handed to the translator: a non-blank custom
/// context beats the preset, then the mode's instruction is appended.
pub fn compose_domain(preset: Option<&CatalogEntry>, custom: Option<&str>, mode: TranslationMode) -> String {
    let base = match custom.filter(|c| !c.trim().is_empty()) {
        Some(custom) => custom.to_string(),
        None => preset.unwrap_or(&DOMAIN_PRESETS[0]).value.to_string(),
    };

    match mode.instruction() {
        Some(instruction) => format!("{base} {instruction}"),
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_selection_is_auto_to_english() {
        assert_eq!(language(DEFAULT_SOURCE_IDX).unwrap().value, "auto");
        assert_eq!(language(DEFAULT_TARGET_IDX).unwrap().value, "English");
        assert!(language(LANGUAGES.len()).is_none());
    }

    #[test]
    fn preset_lookup_ignores_case() {
        assert_eq!(domain_preset("legal").unwrap().value, "legal documents and contracts");
        assert_eq!(domain_preset(" Medical ").unwrap().value, "medical and healthcare");
        assert!(domain_preset("astrology").is_none());
    }

    #[test]
    fn custom_context_overrides_preset() {
        let legal = domain_preset("Legal");
        assert_eq!(
            compose_domain(legal, Some("poetry"), TranslationMode::Standard),
            "poetry"
        );
        assert_eq!(
            compose_domain(legal, Some("  "), TranslationMode::Standard),
            "legal documents and contracts"
        );
    }

    #[test]
    fn mode_instruction_is_appended() {
        assert_eq!(
            compose_domain(None, None, TranslationMode::Formal),
            "general conversation Use formal and professional language."
        );
        assert_eq!(
            compose_domain(domain_preset("Technical"), None, TranslationMode::Technical),
            "software and technology Maintain technical terminology and precision."
        );
    }

    #[test]
    fn modes_round_trip_by_name() {
        let mode: TranslationMode = serde_json::from_str("\"Casual\"").unwrap();
        assert_eq!(mode, TranslationMode::Casual);
        assert_eq!(TranslationMode::Casual.to_string(), "Casual");
    }
}
