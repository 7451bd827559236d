pub mod health;
pub mod messages;
pub mod status;

use axum::Router;
use utoipa::OpenApi;

use crate::error::ApiError;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(status::router())
        .merge(health::router())
        .merge(messages::router())
        .merge(crate::gateway::server::router())
        .fallback(not_found)
}

async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health,
        status::status,
        // Messages
        messages::list_messages,
    ),
    components(
        schemas(
            // Error types
            crate::error::ApiErrorBody,
            crate::error::ApiErrorDetail,
            // Models
            crate::models::ChatMessage,
            // Route response types
            health::HealthResponse,
            status::StatusResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and status"),
        (name = "Messages", description = "Message history"),
    )
)]
pub struct ApiDoc;
