//! Per-user presentation bookkeeping: language selection, tone, history,
//! favorites and counters.
//!
//! Owned by the HTTP layer. The translator never sees any of it; a session
//! only turns its selection into the four plain inputs of a stateless call and
//! records the outcome afterwards.

pub mod catalog;
pub mod types;

pub use catalog::*;
pub use types::*;

use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use uuid::Uuid;

/// How many history entries a snapshot shows.
pub const HISTORY_DISPLAY_LIMIT: usize = 20;

/// Older history entries are dropped beyond this many.
pub const HISTORY_RETENTION_LIMIT: usize = 5 * HISTORY_DISPLAY_LIMIT;

/// History previews are clipped to this many characters.
pub const PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no language at index {0}")]
    UnknownLanguage(usize),

    #[error("unknown domain preset: {0}")]
    UnknownDomainPreset(String),

    #[error("nothing to save yet; translate something first")]
    NothingToSave,

    #[error("no favorite with id {0}")]
    UnknownFavorite(Uuid),
}

/// The plain inputs for one translator call, captured from the session
/// before the call so later selection changes don't leak into the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTranslation {
    pub text: String,
    pub source_lang: &'static str,
    pub target_lang: &'static str,
    pub domain: String,
    pub mode: TranslationMode,
}

#[derive(Debug, Clone)]
pub struct TranslationSession {
    id: String,
    selection: LanguageSelection,
    mode: TranslationMode,
    history: Vec<HistoryEntry>,
    favorites: Vec<Favorite>,
    translation_count: u64,
    last: Option<LastTranslation>,
    last_active: Instant,
}

impl TranslationSession {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            selection: LanguageSelection {
                source_idx: DEFAULT_SOURCE_IDX,
                target_idx: DEFAULT_TARGET_IDX,
            },
            mode: TranslationMode::default(),
            history: Vec::new(),
            favorites: Vec::new(),
            translation_count: 0,
            last: None,
            last_active: Instant::now(),
        }
    }

    /// Mark the session as used now.
    pub fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    pub fn last_active(&self) -> Instant {
        self.last_active
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source_lang(&self) -> &'static str {
        LANGUAGES[self.selection.source_idx].value
    }

    pub fn target_lang(&self) -> &'static str {
        LANGUAGES[self.selection.target_idx].value
    }

    pub fn select_languages(&mut self, source_idx: usize, target_idx: usize) -> Result<(), SessionError> {
        for idx in [source_idx, target_idx] {
            if language(idx).is_none() {
                return Err(SessionError::UnknownLanguage(idx));
            }
        }
        self.selection = LanguageSelection {
            source_idx,
            target_idx,
        };
        Ok(())
    }

    pub fn swap_languages(&mut self) {
        let LanguageSelection {
            source_idx,
            target_idx,
        } = self.selection;
        self.selection = LanguageSelection {
            source_idx: target_idx,
            target_idx: source_idx,
        };
    }

    pub fn mode(&self) -> TranslationMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: TranslationMode) {
        self.mode = mode;
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn favorites(&self) -> &[Favorite] {
        &self.favorites
    }

    pub fn translation_count(&self) -> u64 {
        self.translation_count
    }

    /// Resolve the current selection, preset and mode into translator inputs.
    /// Text is not validated here; that is the translator's job.
    pub fn prepare(
        &self,
        text: &str,
        domain_preset_label: Option<&str>,
        custom_context: Option<&str>,
    ) -> Result<PendingTranslation, SessionError> {
        let preset = match domain_preset_label.filter(|label| !label.trim().is_empty()) {
            Some(label) => Some(
                domain_preset(label)
                    .ok_or_else(|| SessionError::UnknownDomainPreset(label.to_string()))?,
            ),
            None => None,
        };

        Ok(PendingTranslation {
            text: text.to_string(),
            source_lang: self.source_lang(),
            target_lang: self.target_lang(),
            domain: compose_domain(preset, custom_context, self.mode),
            mode: self.mode,
        })
    }

    /// Record a successful translation. Failed calls are never recorded.
    pub fn record(&mut self, pending: PendingTranslation, output: String, elapsed: Duration) {
        self.translation_count += 1;
        self.history.push(HistoryEntry::new(
            Role::User,
            format!(
                "[{}] {} → {}: {}",
                pending.mode, pending.source_lang, pending.target_lang, pending.text
            ),
        ));
        self.history.push(HistoryEntry::new(Role::Model, output.clone()));
        if self.history.len() > HISTORY_RETENTION_LIMIT {
            let excess = self.history.len() - HISTORY_RETENTION_LIMIT;
            self.history.drain(..excess);
        }
        self.last = Some(LastTranslation {
            input: pending.text,
            output,
            from: pending.source_lang.to_string(),
            to: pending.target_lang.to_string(),
            mode: pending.mode,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        });
    }

    pub fn save_favorite(&mut self) -> Result<Favorite, SessionError> {
        let last = self.last.as_ref().ok_or(SessionError::NothingToSave)?;
        let favorite = Favorite {
            id: Uuid::new_v4(),
            input: last.input.clone(),
            output: last.output.clone(),
            from: last.from.clone(),
            to: last.to.clone(),
            mode: last.mode,
            timestamp: chrono::Utc::now(),
        };
        self.favorites.push(favorite.clone());
        Ok(favorite)
    }

    pub fn remove_favorite(&mut self, id: Uuid) -> Result<(), SessionError> {
        let pos = self
            .favorites
            .iter()
            .position(|fav| fav.id == id)
            .ok_or(SessionError::UnknownFavorite(id))?;
        self.favorites.remove(pos);
        Ok(())
    }

    /// Drop history and the last translation; favorites and the counter stay.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.last = None;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id.clone(),
            stats: SessionStats {
                translation_count: self.translation_count,
                favorites: self.favorites.len(),
                history_len: self.history.len(),
            },
            selection: self.selection,
            source_lang: self.source_lang(),
            target_lang: self.target_lang(),
            mode: self.mode,
            last_translation: self.last.clone(),
            recent_history: self
                .history
                .iter()
                .rev()
                .take(HISTORY_DISPLAY_LIMIT)
                .map(|entry| HistoryPreview {
                    role: entry.role,
                    preview: clip(&entry.content, PREVIEW_CHARS),
                    timestamp: entry.timestamp,
                })
                .collect(),
            favorites: self.favorites.iter().rev().cloned().collect(),
        }
    }
}

fn clip(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}
