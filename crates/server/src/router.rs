//! HTTP router construction.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::api;
use crate::state::AppState;

/// Build the complete application router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.server.max_upload_bytes();
    let cors = cors_layer(&state.config.server.cors_origin);

    Router::new()
        .route("/health", get(api::health::health))
        .route("/config", get(api::health::config))
        .route("/sessions", post(api::sessions::create))
        .route(
            "/sessions/{id}",
            get(api::sessions::get).delete(api::sessions::delete),
        )
        .route("/sessions/{id}/settings", put(api::sessions::update_settings))
        .route(
            "/sessions/{id}/documents",
            post(api::documents::upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/sessions/{id}/ask", post(api::ask::ask))
        .route("/sessions/{id}/conversation", get(api::sessions::conversation))
        .layer(cors)
        .with_state(state)
        .merge(Scalar::with_url("/docs", api::doc::ApiDoc::openapi()))
}

fn cors_layer(origin: &str) -> CorsLayer {
    if origin == "*" {
        return CorsLayer::permissive();
    }
    match origin.parse::<HeaderValue>() {
        Ok(value) => CorsLayer::new()
            .allow_origin(value)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(e) => {
            warn!(origin, error = %e, "invalid CORS origin, allowing any");
            CorsLayer::permissive()
        }
    }
}
