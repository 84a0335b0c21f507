//! API endpoint modules. Shared error type and session lookup live here.

pub mod ask;
pub mod doc;
pub mod documents;
pub mod health;
pub mod sessions;

use axum::http::StatusCode;
use axum::Json;
use docchat_llm::AnswerError;
use docchat_session::{SessionError, SessionId, SharedSession};
use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

pub(crate) fn status_for(e: &SessionError) -> StatusCode {
    match e {
        SessionError::NotFound(_) => StatusCode::NOT_FOUND,
        SessionError::NoDocuments
        | SessionError::MissingCredential(_)
        | SessionError::EmptyQuestion => StatusCode::BAD_REQUEST,
        SessionError::EmptyCorpus | SessionError::Backend(AnswerError::NoAnswerFound) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        SessionError::NoContent | SessionError::Superseded => StatusCode::CONFLICT,
        SessionError::Backend(_) => StatusCode::BAD_GATEWAY,
    }
}

/// Convert a session error at the handler boundary.
pub(crate) fn session_error(e: SessionError) -> ApiError {
    let status = status_for(&e);
    if status.is_server_error() {
        warn!(status = status.as_u16(), error = %e, "request failed");
    }
    error(status, e.to_string())
}

pub(crate) async fn find_session(state: &AppState, id: SessionId) -> Result<SharedSession, ApiError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| session_error(SessionError::NotFound(id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docchat_core::Provider;
    use docchat_llm::LlmError;

    #[test]
    fn error_statuses() {
        let cases = [
            (SessionError::NotFound(SessionId::nil()), StatusCode::NOT_FOUND),
            (SessionError::EmptyCorpus, StatusCode::UNPROCESSABLE_ENTITY),
            (SessionError::MissingCredential(Provider::Cohere), StatusCode::BAD_REQUEST),
            (SessionError::NoContent, StatusCode::CONFLICT),
            (SessionError::Superseded, StatusCode::CONFLICT),
            (SessionError::EmptyQuestion, StatusCode::BAD_REQUEST),
            (
                SessionError::Backend(AnswerError::NoAnswerFound),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                SessionError::Backend(AnswerError::Backend(LlmError::ParseError("x".into()))),
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (e, status) in cases {
            assert_eq!(status_for(&e), status, "{e}");
        }
    }
}
