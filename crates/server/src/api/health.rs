use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions: usize,
    pub uptime_secs: i64,
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Server is up", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        sessions: state.sessions.len().await,
        uptime_secs: (chrono::Utc::now() - state.started_at).num_seconds(),
    })
}

/// Redacted configuration
///
/// Models, limits and defaults in effect. API keys are reported only as
/// configured or not.
#[utoipa::path(
    get,
    path = "/config",
    tag = "Health",
    responses(
        (status = 200, description = "Configuration summary", body = Object)
    )
)]
pub async fn config(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(state.config.redacted_summary())
}
