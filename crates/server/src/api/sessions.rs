//! Session lifecycle: initialize, view, settings, delete, conversation.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use docchat_core::CoreError;
use docchat_session::{RenderOrder, SessionId, SessionView, SettingsUpdate, Turn};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::state::AppState;

use super::{error, find_session, session_error, ApiError, ErrorResponse};

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct CreateSessionRequest {
    /// Reuse a known session id; a fresh one is generated when omitted.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub id: Option<SessionId>,
}

/// Settings change. Omitted fields are left as they are.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct SettingsRequest {
    /// openai, cohere, huggingface, extractive or ollama
    pub provider: Option<String>,
    /// Key for the provider selected after this update.
    pub api_key: Option<String>,
    /// general assistant, academic or witty
    pub personality: Option<String>,
    pub temperature: Option<f32>,
    pub analytics_enabled: Option<bool>,
    pub display_char_count: Option<bool>,
    pub display_word_count: Option<bool>,
    pub display_sentiment: Option<bool>,
}

impl SettingsRequest {
    fn into_update(self) -> Result<SettingsUpdate, CoreError> {
        Ok(SettingsUpdate {
            provider: self.provider.as_deref().map(str::parse).transpose()?,
            api_key: self.api_key,
            personality: self.personality.as_deref().map(str::parse).transpose()?,
            temperature: self.temperature,
            analytics_enabled: self.analytics_enabled,
            display_char_count: self.display_char_count,
            display_word_count: self.display_word_count,
            display_sentiment: self.display_sentiment,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ConversationQuery {
    #[serde(default)]
    pub order: RenderOrder,
}

#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub order: RenderOrder,
    pub turns: Vec<Turn>,
}

/// Initialize a session
///
/// Idempotent: an existing session is returned unchanged with 200.
#[utoipa::path(
    post,
    path = "/sessions",
    tag = "Sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session created", body = Object),
        (status = 200, description = "Session already existed", body = Object)
    )
)]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSessionRequest>,
) -> (StatusCode, Json<SessionView>) {
    let id = req.id.unwrap_or_else(SessionId::new_v4);
    let (session, created) = state.sessions.initialize(id).await;
    let view = session.lock().await.view();
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    (status, Json(view))
}

/// Get a session
///
/// Settings, toggles and processing status. API keys are reported only as set or unset.
#[utoipa::path(
    get,
    path = "/sessions/{id}",
    tag = "Sessions",
    params(("id" = String, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session view", body = Object),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionView>, ApiError> {
    let session = find_session(&state, id).await?;
    let view = session.lock().await.view();
    Ok(Json(view))
}

/// Delete a session
///
/// Blanks the session's API keys and drops it.
#[utoipa::path(
    delete,
    path = "/sessions/{id}",
    tag = "Sessions",
    params(("id" = String, Path, description = "Session ID")),
    responses(
        (status = 204, description = "Session deleted"),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_error(docchat_session::SessionError::NotFound(id)))
    }
}

/// Update session settings
///
/// Provider, API key, personality and temperature take effect at the next
/// document upload. Analytics toggles apply to the next upload too.
#[utoipa::path(
    put,
    path = "/sessions/{id}/settings",
    tag = "Sessions",
    params(("id" = String, Path, description = "Session ID")),
    request_body = SettingsRequest,
    responses(
        (status = 200, description = "Updated session view", body = Object),
        (status = 400, description = "Unknown provider or personality", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
    Json(req): Json<SettingsRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let update = req
        .into_update()
        .map_err(|e| error(StatusCode::BAD_REQUEST, e.to_string()))?;
    let session = find_session(&state, id).await?;
    let mut guard = session.lock().await;
    guard.apply(update);
    info!(session = %id, provider = %guard.provider, "session settings updated");
    Ok(Json(guard.view()))
}

/// Conversation history
///
/// Turns newest first by default; `order=oldest` gives chronological order.
#[utoipa::path(
    get,
    path = "/sessions/{id}/conversation",
    tag = "Conversation",
    params(
        ("id" = String, Path, description = "Session ID"),
        ("order" = Option<String>, Query, description = "newest (default) or oldest")
    ),
    responses(
        (status = 200, description = "Rendered turns", body = Object),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn conversation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
    Query(query): Query<ConversationQuery>,
) -> Result<Json<ConversationResponse>, ApiError> {
    let session = find_session(&state, id).await?;
    let turns = session.lock().await.chat_history.render(query.order);
    Ok(Json(ConversationResponse {
        order: query.order,
        turns,
    }))
}
