use std::sync::Arc;
use std::time::Duration;
use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::config_manager::{BackendConfig, Config, ConfigError};
use crate::session::TranslationSession;
use crate::translate::{TranslateError, Translator};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    translator: TranslatorSlot,
    pub sessions: Arc<DashMap<String, TranslationSession>>,
}

/// Either a ready translator or the reason it could not be built.
/// Decided once at start-up and never changed.
#[derive(Clone)]
enum TranslatorSlot {
    Ready(Translator),
    Unconfigured(Arc<str>),
}

impl AppState {
    /// Validate the backend configuration and build the translator.
    ///
    /// A configuration problem does not abort start-up: the server comes up
    /// so the UI can show the error, but every translation is refused with
    /// a configuration error before any other processing.
    pub fn new(config: Config) -> Self {
        let backend = config.backend_config();
        Self::from_backend(config, backend)
    }

    /// Same as [`AppState::new`] but with backend settings already resolved.
    pub fn from_backend(config: Config, backend: Result<BackendConfig, ConfigError>) -> Self {
        let slot = match backend.and_then(|backend| Translator::from_config(&backend)) {
            Ok(translator) => {
                info!(
                    "Translator ready: provider={}, model={}",
                    config.backend.llm_provider, config.backend.model
                );
                TranslatorSlot::Ready(translator)
            }
            Err(e) => {
                error!("Translation is disabled: {}", e);
                TranslatorSlot::Unconfigured(e.to_string().into())
            }
        };

        Self::with_slot(config, slot)
    }

    /// Use a prebuilt translator, e.g. one wrapping a fake backend.
    pub fn with_translator(config: Config, translator: Translator) -> Self {
        Self::with_slot(config, TranslatorSlot::Ready(translator))
    }

    pub fn unconfigured(config: Config, reason: impl Into<String>) -> Self {
        let reason: String = reason.into();
        Self::with_slot(config, TranslatorSlot::Unconfigured(Arc::from(reason)))
    }

    fn with_slot(config: Config, translator: TranslatorSlot) -> Self {
        Self {
            config: Arc::new(config),
            translator,
            sessions: Arc::new(DashMap::new()),
        }
    }

    pub fn translator(&self) -> Result<&Translator, TranslateError> {
        match &self.translator {
            TranslatorSlot::Ready(translator) => Ok(translator),
            TranslatorSlot::Unconfigured(reason) => {
                Err(TranslateError::Configuration(reason.to_string()))
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.translator, TranslatorSlot::Ready(_))
    }

    pub fn generate_session_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    /// Store a new session, first dropping idle ones and, at capacity, the
    /// least recently used.
    pub fn insert_session(&self, session: TranslationSession) {
        self.evict_idle_sessions();

        let max = self.config.server.max_sessions.max(1);
        while self.sessions.len() >= max {
            let oldest = self
                .sessions
                .iter()
                .min_by_key(|entry| entry.value().last_active())
                .map(|entry| entry.key().clone());
            match oldest {
                Some(id) => {
                    self.sessions.remove(&id);
                    debug!("Evicted least recently used session {}", id);
                }
                None => break,
            }
        }

        self.sessions.insert(session.id().to_string(), session);
    }

    /// Drop sessions idle for at least the configured timeout.
    /// Returns how many were removed.
    pub fn evict_idle_sessions(&self) -> usize {
        let idle_timeout = self.config.server.session_idle_timeout();
        let now = Instant::now();
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| now.saturating_duration_since(session.last_active()) < idle_timeout);
        let evicted = before.saturating_sub(self.sessions.len());
        if evicted > 0 {
            debug!("Evicted {} idle sessions", evicted);
        }
        evicted
    }

    /// Periodically drop idle sessions for as long as the runtime lives.
    pub fn spawn_session_sweeper(&self) -> JoinHandle<()> {
        let state = self.clone();
        let period = state
            .config
            .server
            .session_idle_timeout()
            .max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                state.evict_idle_sessions();
            }
        })
    }

    /// Run `f` against a session while holding its map entry and mark it used.
    /// `f` must not await; the entry lock is held for the whole call.
    pub fn with_session<R>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut TranslationSession) -> R,
    ) -> Option<R> {
        self.sessions.get_mut(session_id).map(|mut entry| {
            let session = entry.value_mut();
            session.touch();
            f(session)
        })
    }
}
