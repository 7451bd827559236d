//! WebSocket upgrade handler and per-connection event loop.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use crate::AppState;

use super::coordinator::Coordinator;
use super::events::InboundEvent;
use super::fanout::BroadcastPayload;
use super::session::GatewaySession;

pub fn router() -> Router<AppState> {
    Router::new().route("/gateway", get(ws_upgrade))
}

async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, state))
}

async fn handle_connection(socket: WebSocket, state: AppState) {
    let session = GatewaySession::new();
    let (ws_tx, ws_rx) = socket.split();

    // Subscribe before any inbound event is handled so the join replies and
    // everything broadcast after them arrive in coordinator order.
    let broadcast_rx = state.broadcast.subscribe();

    tracing::info!(connection_id = %session.connection_id, "gateway connection opened");

    run_session(&session, &state.coordinator, ws_tx, ws_rx, broadcast_rx).await;

    // The loop owned the inbound stream, so nothing else can arrive for this
    // connection after the disconnect.
    state
        .coordinator
        .handle(&session.connection_id, InboundEvent::Disconnect);
    state.coordinator.release(&session.connection_id);

    tracing::info!(
        connection_id = %session.connection_id,
        uptime_secs = session.uptime().as_secs(),
        "gateway connection closed"
    );
}

/// Main session event loop: read client events, forward broadcasts.
async fn run_session(
    session: &GatewaySession,
    coordinator: &Coordinator,
    mut ws_tx: SplitSink<WebSocket, Message>,
    mut ws_rx: SplitStream<WebSocket>,
    mut broadcast_rx: broadcast::Receiver<Arc<BroadcastPayload>>,
) {
    loop {
        tokio::select! {
            // Client sends us a message.
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let event: InboundEvent = match serde_json::from_str(&text) {
                            Ok(event) => event,
                            Err(err) => {
                                tracing::debug!(
                                    connection_id = %session.connection_id,
                                    %err,
                                    "unparseable frame dropped"
                                );
                                continue;
                            }
                        };

                        if event == InboundEvent::Disconnect {
                            break;
                        }
                        coordinator.handle(&session.connection_id, event);
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(?e, connection_id = %session.connection_id, "ws read error");
                        break;
                    }
                    // Ping/Pong are answered by axum; binary frames are not part of the protocol.
                    Some(Ok(_)) => continue,
                }
            }

            // Broadcast event from the fanout hub.
            result = broadcast_rx.recv() => {
                match result {
                    Ok(payload) => {
                        if !session.is_recipient(&payload) {
                            continue;
                        }

                        if ws_tx.send(Message::Text(payload.text.clone().into())).await.is_err() {
                            tracing::debug!(
                                connection_id = %session.connection_id,
                                event = payload.event_name,
                                "ws write failed"
                            );
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(
                            connection_id = %session.connection_id,
                            skipped = n,
                            "gateway session lagged behind broadcast"
                        );
                        // Keep going; the missed events are dropped.
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        break;
                    }
                }
            }
        }
    }
}
