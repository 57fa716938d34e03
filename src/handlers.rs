use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use uuid::Uuid;

use crate::agent::LlmError;
use crate::session::{
    CatalogEntry, Favorite, LanguageSelection, SessionError, SessionSnapshot, TranslationMode,
    TranslationSession, DOMAIN_PRESETS, LANGUAGES,
};
use crate::state::AppState;
use crate::translate::{null_as_empty, TranslateError, TranslateRequest, TranslateResponse};

/// Error returned by every JSON endpoint, rendered as `{"error", "kind"}`.
#[derive(Debug)]
pub enum ApiError {
    Translate(TranslateError),
    Session(SessionError),
    SessionNotFound(String),
    InvalidBody(JsonRejection),
}

impl From<TranslateError> for ApiError {
    fn from(err: TranslateError) -> Self {
        Self::Translate(err)
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        Self::Session(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Translate(TranslateError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            Self::Translate(TranslateError::Configuration(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Translate(TranslateError::Backend(LlmError::Timeout(_))) => StatusCode::GATEWAY_TIMEOUT,
            Self::Translate(TranslateError::Backend(_)) => StatusCode::BAD_GATEWAY,
            Self::Session(SessionError::UnknownLanguage(_))
            | Self::Session(SessionError::UnknownDomainPreset(_)) => StatusCode::BAD_REQUEST,
            Self::Session(SessionError::NothingToSave) => StatusCode::CONFLICT,
            Self::Session(SessionError::UnknownFavorite(_)) | Self::SessionNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::InvalidBody(rejection) => rejection.status(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Translate(err) => err.kind(),
            Self::Session(_) => "session",
            Self::SessionNotFound(_) => "session_not_found",
            Self::InvalidBody(_) => "invalid_body",
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Translate(err) => err.to_string(),
            Self::Session(err) => err.to_string(),
            Self::SessionNotFound(id) => format!("session {id} not found"),
            Self::InvalidBody(rejection) => rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!("{}", self.message());
        }
        (
            status,
            Json(json!({
                "error": self.message(),
                "kind": self.kind(),
            })),
        )
            .into_response()
    }
}

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let status = if state.is_configured() { "ok" } else { "unconfigured" };
    Json(json!({
        "status": status,
        "provider": state.config.backend.llm_provider,
        "model": state.config.backend.model,
    }))
}

pub async fn list_languages() -> Json<&'static [CatalogEntry]> {
    Json(LANGUAGES)
}

pub async fn list_domains() -> Json<&'static [CatalogEntry]> {
    Json(DOMAIN_PRESETS)
}

pub async fn list_modes() -> Json<[TranslationMode; 5]> {
    Json(TranslationMode::ALL)
}

/// Stateless translation: nothing about the caller is stored.
///
/// Body rejections are taken as a value so an unconfigured backend is
/// reported ahead of them.
pub async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let translator = state.translator()?;
    let Json(payload) = payload?;

    let started = Instant::now();
    let result = translator
        .translate(
            &payload.text,
            &payload.source_lang,
            &payload.target_lang,
            payload.domain.as_deref(),
        )
        .await?;

    Ok(Json(TranslateResponse {
        translation: result.into_inner(),
        elapsed_ms: millis(started.elapsed()),
    }))
}

fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionSnapshot>) {
    let id = state.generate_session_id();
    let session = TranslationSession::new(id.clone());
    let snapshot = session.snapshot();
    state.insert_session(session);
    info!("Created session {}", id);
    (StatusCode::CREATED, Json(snapshot))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    state
        .with_session(&session_id, |session| session.snapshot())
        .map(Json)
        .ok_or(ApiError::SessionNotFound(session_id))
}

/// "Reset all": the session and everything in it is dropped.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    match state.sessions.remove(&session_id) {
        Some(_) => {
            info!("Reset session {}", session_id);
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(ApiError::SessionNotFound(session_id)),
    }
}

#[derive(Debug, Deserialize)]
pub struct SessionTranslateRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
    #[serde(default)]
    pub domain_preset: Option<String>,
    #[serde(default)]
    pub custom_context: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionTranslateResponse {
    pub translation: String,
    pub elapsed_ms: u64,
    pub session: SessionSnapshot,
}

/// Translate with the session's language selection and mode, then record
/// the outcome. Only the four plain inputs reach the translator.
pub async fn session_translate(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    payload: Result<Json<SessionTranslateRequest>, JsonRejection>,
) -> Result<Json<SessionTranslateResponse>, ApiError> {
    let translator = state.translator()?;
    let Json(payload) = payload?;

    let pending = state
        .with_session(&session_id, |session| {
            session.prepare(
                &payload.text,
                payload.domain_preset.as_deref(),
                payload.custom_context.as_deref(),
            )
        })
        .ok_or_else(|| ApiError::SessionNotFound(session_id.clone()))??;

    // The session entry is released here; nothing is locked across the call
    let started = Instant::now();
    let result = translator
        .translate(
            &pending.text,
            pending.source_lang,
            pending.target_lang,
            Some(pending.domain.as_str()),
        )
        .await?;
    let elapsed = started.elapsed();

    let translation = result.into_inner();
    let snapshot = state
        .with_session(&session_id, |session| {
            session.record(pending, translation.clone(), elapsed);
            session.snapshot()
        })
        .ok_or(ApiError::SessionNotFound(session_id))?;

    Ok(Json(SessionTranslateResponse {
        translation,
        elapsed_ms: millis(elapsed),
        session: snapshot,
    }))
}

pub async fn set_languages(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    selection: Result<Json<LanguageSelection>, JsonRejection>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let Json(selection) = selection?;
    let snapshot = state
        .with_session(&session_id, |session| {
            session
                .select_languages(selection.source_idx, selection.target_idx)
                .map(|_| session.snapshot())
        })
        .ok_or_else(|| ApiError::SessionNotFound(session_id.clone()))??;
    Ok(Json(snapshot))
}

pub async fn swap_languages(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    state
        .with_session(&session_id, |session| {
            session.swap_languages();
            session.snapshot()
        })
        .map(Json)
        .ok_or(ApiError::SessionNotFound(session_id))
}

#[derive(Debug, Deserialize)]
pub struct ModeRequest {
    pub mode: TranslationMode,
}

pub async fn set_mode(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    payload: Result<Json<ModeRequest>, JsonRejection>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let Json(payload) = payload?;
    state
        .with_session(&session_id, |session| {
            session.set_mode(payload.mode);
            session.snapshot()
        })
        .map(Json)
        .ok_or(ApiError::SessionNotFound(session_id))
}

pub async fn save_favorite(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<(StatusCode, Json<Favorite>), ApiError> {
    let favorite = state
        .with_session(&session_id, |session| session.save_favorite())
        .ok_or_else(|| ApiError::SessionNotFound(session_id.clone()))??;
    Ok((StatusCode::CREATED, Json(favorite)))
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    Path((session_id, favorite_id)): Path<(String, Uuid)>,
) -> Result<StatusCode, ApiError> {
    state
        .with_session(&session_id, |session| session.remove_favorite(favorite_id))
        .ok_or_else(|| ApiError::SessionNotFound(session_id.clone()))??;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn clear_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    state
        .with_session(&session_id, |session| {
            session.clear_history();
            session.snapshot()
        })
        .map(Json)
        .ok_or(ApiError::SessionNotFound(session_id))
}
