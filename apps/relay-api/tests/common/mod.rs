#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time;
use tokio_tungstenite::{tungstenite, MaybeTlsStream, WebSocketStream};

use relay_api::config::Config;
use relay_api::db::store::MessageStore;
use relay_api::AppState;

pub type TestSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Build an `AppState` with default config and an optional message store.
pub fn test_state(store: Option<Arc<dyn MessageStore>>) -> AppState {
    AppState::new(Config::default(), store)
}

/// Build the full router with state applied.
pub fn test_app(state: AppState) -> Router {
    relay_api::routes::router().with_state(state)
}

/// Start an actual TCP server for WebSocket testing. The server runs in the
/// background.
pub async fn start_server(state: AppState) -> SocketAddr {
    let app = test_app(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

pub async fn connect(addr: SocketAddr) -> TestSocket {
    let url = format!("ws://{addr}/gateway");
    let (ws, _) = tokio_tungstenite::connect_async(&url)
        .await
        .expect("ws connect");
    ws
}

/// Send one `{"t", "d"}` envelope.
pub async fn send_event(ws: &mut TestSocket, event: serde_json::Value) {
    ws.send(tungstenite::Message::Text(event.to_string().into()))
        .await
        .expect("send event");
}

/// Read the next text frame as JSON.
pub async fn next_event(ws: &mut TestSocket) -> serde_json::Value {
    loop {
        let msg = time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timeout waiting for event")
            .expect("stream ended")
            .expect("ws read error");

        match msg {
            tungstenite::Message::Text(text) => {
                return serde_json::from_str(&text).expect("parse event");
            }
            tungstenite::Message::Ping(_) | tungstenite::Message::Pong(_) => continue,
            other => panic!("unexpected frame: {other:?}"),
        }
    }
}

/// Assert that no text frame arrives within `window`.
pub async fn expect_silence(ws: &mut TestSocket, window: Duration) {
    if let Ok(Some(Ok(msg))) = time::timeout(window, ws.next()).await {
        if msg.is_text() {
            panic!("expected no event, got {msg:?}");
        }
    }
}

/// Join as `username` and consume the `usersList` + `messageHistory` replies.
pub async fn join(ws: &mut TestSocket, username: &str) -> (serde_json::Value, serde_json::Value) {
    send_event(ws, serde_json::json!({ "t": "join", "d": { "username": username } })).await;

    let users = next_event(ws).await;
    assert_eq!(users["t"], "usersList");
    let history = next_event(ws).await;
    assert_eq!(history["t"], "messageHistory");

    (users["d"].clone(), history["d"].clone())
}

/// Poll until the coordinator reports `count` participants.
pub async fn wait_for_participants(state: &AppState, count: usize) {
    time::timeout(Duration::from_secs(5), async {
        while state.coordinator.participant_count() != count {
            time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("participant count never reached");
}
