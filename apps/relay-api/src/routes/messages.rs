//! Recent message history for clients that are not connected to the gateway.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::models::ChatMessage;
use crate::AppState;

/// Number of messages returned by `GET /api/messages`.
pub const RECENT_MESSAGES_LIMIT: usize = 50;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/messages", get(list_messages))
}

// ---------------------------------------------------------------------------
// GET /api/messages
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/messages",
    tag = "Messages",
    responses(
        (status = 200, description = "Most recent messages, oldest first", body = [ChatMessage]),
    ),
)]
pub async fn list_messages(State(state): State<AppState>) -> Json<Vec<ChatMessage>> {
    if let Some(store) = &state.store {
        match store.recent(RECENT_MESSAGES_LIMIT).await {
            Ok(messages) => return Json(messages),
            Err(err) => {
                tracing::warn!(?err, "message store unavailable, serving in-memory history");
            }
        }
    }

    Json(state.coordinator.recent_messages(RECENT_MESSAGES_LIMIT))
}
