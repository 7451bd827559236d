mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;

use relay_api::db::store::{MemoryStore, MessageStore};
use relay_api::error::StoreError;
use relay_api::gateway::events::{InboundEvent, JoinPayload, SendMessagePayload};
use relay_api::models::{ChatMessage, ConnectionId};

struct OfflineStore;

#[async_trait]
impl MessageStore for OfflineStore {
    async fn append(&self, _message: &ChatMessage) -> Result<(), StoreError> {
        Err(StoreError::PoolBuild("offline".into()))
    }

    async fn recent(&self, _limit: usize) -> Result<Vec<ChatMessage>, StoreError> {
        Err(StoreError::PoolBuild("offline".into()))
    }
}

fn chat(state: &relay_api::AppState, connection: &str, username: &str, messages: usize) {
    let id = ConnectionId::from(connection);
    state.coordinator.handle(
        &id,
        InboundEvent::Join(JoinPayload {
            username: username.into(),
        }),
    );
    for i in 1..=messages {
        state.coordinator.handle(
            &id,
            InboundEvent::SendMessage(SendMessagePayload {
                message: format!("message {i}"),
            }),
        );
    }
}

#[tokio::test]
async fn health_reports_ok() {
    let state = common::test_state(None);
    let server = TestServer::new(common::test_app(state)).unwrap();

    let resp = server.get("/health").await;
    resp.assert_status_ok();
    let body: serde_json::Value = resp.json();
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
    assert!(body["uptimeSeconds"].is_u64());
}

#[tokio::test]
async fn status_reports_live_counts() {
    let state = common::test_state(None);
    chat(&state, "conn_a", "alice", 3);
    chat(&state, "conn_b", "bob", 0);
    let server = TestServer::new(common::test_app(state)).unwrap();

    let resp = server.get("/").await;
    resp.assert_status_ok();
    let body: serde_json::Value = resp.json();
    assert_eq!(body["status"], "running");
    assert_eq!(body["service"], "relay-api");
    assert_eq!(body["connectedUsers"], 2);
    assert_eq!(body["totalMessages"], 3);
    assert_eq!(body["persistence"], false);
}

#[tokio::test]
async fn status_reports_persistence_when_store_configured() {
    let store: Arc<dyn MessageStore> = Arc::new(MemoryStore::new());
    let state = common::test_state(Some(store));
    let server = TestServer::new(common::test_app(state)).unwrap();

    let body: serde_json::Value = server.get("/").await.json();
    assert_eq!(body["persistence"], true);
    assert_eq!(body["connectedUsers"], 0);
}

#[tokio::test]
async fn messages_without_store_come_from_memory() {
    let state = common::test_state(None);
    chat(&state, "conn_a", "alice", 60);
    let server = TestServer::new(common::test_app(state)).unwrap();

    let resp = server.get("/api/messages").await;
    resp.assert_status_ok();
    let body: Vec<serde_json::Value> = resp.json();
    assert_eq!(body.len(), 50);
    assert_eq!(body[0]["message"], "message 11");
    assert_eq!(body[49]["message"], "message 60");
    assert_eq!(body[0]["username"], "alice");
}

#[tokio::test]
async fn messages_are_read_from_store_when_configured() {
    let store = Arc::new(MemoryStore::new());
    store
        .append(&ChatMessage::new("archived".into(), "from before restart".into()))
        .await
        .unwrap();
    let state = common::test_state(Some(store));
    let server = TestServer::new(common::test_app(state)).unwrap();

    let body: Vec<serde_json::Value> = server.get("/api/messages").await.json();
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["username"], "archived");
    assert_eq!(body[0]["message"], "from before restart");
}

#[tokio::test]
async fn messages_fall_back_to_memory_when_store_fails() {
    let state = common::test_state(Some(Arc::new(OfflineStore)));
    chat(&state, "conn_a", "alice", 2);
    let server = TestServer::new(common::test_app(state)).unwrap();

    let resp = server.get("/api/messages").await;
    resp.assert_status_ok();
    let body: Vec<serde_json::Value> = resp.json();
    assert_eq!(body.len(), 2);
    assert_eq!(body[1]["message"], "message 2");
}

#[tokio::test]
async fn unknown_routes_return_structured_404() {
    let state = common::test_state(None);
    let server = TestServer::new(common::test_app(state)).unwrap();

    let resp = server.get("/api/nope").await;
    resp.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = resp.json();
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}
