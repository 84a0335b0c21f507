//! OpenAPI documentation aggregator, served via Scalar UI at `/docs`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "docchat API",
        version = "0.1.0",
        description = "Upload documents, ask questions about them, and review per-document analytics.",
    ),
    tags(
        (name = "Health", description = "Liveness and configuration summary"),
        (name = "Sessions", description = "Per-user session lifecycle and settings"),
        (name = "Documents", description = "Document upload, text extraction and analytics"),
        (name = "Conversation", description = "Questions, answers and conversation history"),
    ),
    paths(
        crate::api::health::health,
        crate::api::health::config,
        crate::api::sessions::create,
        crate::api::sessions::get,
        crate::api::sessions::delete,
        crate::api::sessions::update_settings,
        crate::api::sessions::conversation,
        crate::api::documents::upload,
        crate::api::ask::ask,
    ),
    components(schemas(
        crate::api::ErrorResponse,
        crate::api::health::HealthResponse,
        crate::api::sessions::CreateSessionRequest,
        crate::api::sessions::SettingsRequest,
        crate::api::ask::AskRequest,
    ))
)]
pub struct ApiDoc;
