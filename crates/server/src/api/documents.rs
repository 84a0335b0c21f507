use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use docchat_core::UploadedDocument;
use docchat_ingest::CorpusBuilder;
use docchat_session::{begin_ingest, finish_ingest, IngestOutcome, SessionId};
use tracing::{info, warn};

use crate::state::AppState;

use super::{error, find_session, session_error, ApiError, ErrorResponse};

/// Upload and process documents
///
/// Accepts multipart/form-data with one or more file fields. Resets the
/// session's conversation, extracts text from every file, builds the corpus
/// and answer engine, and returns per-document analytics when enabled.
#[utoipa::path(
    post,
    path = "/sessions/{id}/documents",
    tag = "Documents",
    params(("id" = String, Path, description = "Session ID")),
    request_body(content_type = "multipart/form-data", description = "PDF, text or markdown files"),
    responses(
        (status = 200, description = "Documents processed", body = Object),
        (status = 400, description = "No files or missing API key", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 422, description = "No text could be extracted", body = ErrorResponse)
    )
)]
pub async fn upload(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
    mut multipart: Multipart,
) -> Result<Json<IngestOutcome>, ApiError> {
    let session = find_session(&state, id).await?;

    let mut documents = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| error(StatusCode::BAD_REQUEST, format!("Multipart error: {e}")))?
    {
        // Plain form fields carry no file name.
        let Some(raw_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| error(StatusCode::BAD_REQUEST, format!("Failed to read file: {e}")))?;
        documents.push(UploadedDocument::new(&raw_name, bytes.to_vec()));
    }

    let mut guard = session.lock().await;
    let settings = begin_ingest(&mut guard, documents.len(), &state.config).map_err(session_error)?;

    let names: Vec<String> = documents.iter().map(|d| d.name.clone()).collect();
    info!(session = %id, files = ?names, provider = %settings.provider, "processing documents");

    let build = tokio::task::spawn_blocking(move || CorpusBuilder::default().build(&documents))
        .await
        .map_err(|e| {
            warn!(session = %id, error = %e, "extraction task failed");
            error(StatusCode::INTERNAL_SERVER_ERROR, format!("Extraction task failed: {e}"))
        })?;

    let outcome = finish_ingest(&mut guard, build, &settings, &state.config).map_err(session_error)?;
    Ok(Json(outcome))
}
