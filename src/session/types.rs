use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalog::TranslationMode;

/// Who produced a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One line of the display-only history. Never sent to the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
    pub id: Uuid,
    pub input: String,
    pub output: String,
    pub from: String,
    pub to: String,
    pub mode: TranslationMode,
    pub timestamp: DateTime<Utc>,
}

/// The most recent successful translation, kept so it can be saved as a favorite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastTranslation {
    pub input: String,
    pub output: String,
    pub from: String,
    pub to: String,
    pub mode: TranslationMode,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSelection {
    pub source_idx: usize,
    pub target_idx: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    pub translation_count: u64,
    pub favorites: usize,
    pub history_len: usize,
}

/// History line as displayed: content clipped for the list view.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryPreview {
    pub role: Role,
    pub preview: String,
    pub timestamp: DateTime<Utc>,
}

/// Everything the UI needs to redraw a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: String,
    pub stats: SessionStats,
    pub selection: LanguageSelection,
    pub source_lang: &'static str,
    pub target_lang: &'static str,
    pub mode: TranslationMode,
    pub last_translation: Option<LastTranslation>,
    /// Newest first
    pub recent_history: Vec<HistoryPreview>,
    /// Newest first
    pub favorites: Vec<Favorite>,
}
