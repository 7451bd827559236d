use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(status))
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub service: String,
    pub status: String,
    /// Participants currently joined.
    pub connected_users: usize,
    /// Messages currently retained in memory.
    pub total_messages: usize,
    pub persistence: bool,
    pub timestamp: DateTime<Utc>,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses(
        (status = 200, description = "Relay status summary", body = StatusResponse),
    ),
)]
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        service: env!("CARGO_PKG_NAME").to_string(),
        status: "running".to_string(),
        connected_users: state.coordinator.participant_count(),
        total_messages: state.coordinator.total_messages(),
        persistence: state.store.is_some(),
        timestamp: Utc::now(),
    })
}
