use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use docchat_core::Provider;
use docchat_session::{complete_ask, prepare_ask, RenderOrder, SessionId, Turn};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

use super::{find_session, session_error, ApiError, ErrorResponse};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub provider: Provider,
    /// Full history, newest first.
    pub conversation: Vec<Turn>,
}

/// Ask a question
///
/// Answers from the session's processed documents and appends the exchange
/// to the conversation. On failure the conversation is left unchanged.
#[utoipa::path(
    post,
    path = "/sessions/{id}/ask",
    tag = "Conversation",
    params(("id" = String, Path, description = "Session ID")),
    request_body = AskRequest,
    responses(
        (status = 200, description = "Answer and updated conversation", body = Object),
        (status = 400, description = "Empty question", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 409, description = "No documents processed yet, or documents replaced mid-question", body = ErrorResponse),
        (status = 422, description = "No answer found in the documents", body = ErrorResponse),
        (status = 502, description = "Answer backend failed", body = ErrorResponse)
    )
)]
pub async fn ask(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let session = find_session(&state, id).await?;
    let pending = prepare_ask(&mut *session.lock().await, &req.question).map_err(session_error)?;

    // The session stays readable while the backend works.
    let result = pending.run().await;

    let mut guard = session.lock().await;
    let outcome = complete_ask(&mut guard, pending, result).map_err(session_error)?;

    Ok(Json(AskResponse {
        answer: outcome.answer,
        provider: outcome.provider,
        conversation: guard.chat_history.render(RenderOrder::Newest),
    }))
}
