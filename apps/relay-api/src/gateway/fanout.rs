//! Broadcast hub for dispatching events to connected gateway sessions.
//!
//! Uses a single `tokio::sync::broadcast` channel. Each session subscribes
//! when its socket is accepted and filters payloads locally by audience, so
//! every session observes events in the order the coordinator emitted them.

use std::sync::Arc;

use tokio::sync::broadcast;

use super::events::OutboundEvent;
use crate::models::ConnectionId;

/// Who receives an outbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    Only(ConnectionId),
    AllExcept(ConnectionId),
    All,
}

impl Audience {
    pub fn includes(&self, connection_id: &ConnectionId) -> bool {
        match self {
            Self::Only(id) => id == connection_id,
            Self::AllExcept(id) => id != connection_id,
            Self::All => true,
        }
    }
}

/// Outbound seam used by the coordinator. Implementations must not block;
/// buffering and slow clients are their concern.
pub trait Transport: Send + Sync {
    fn deliver(&self, audience: Audience, event: OutboundEvent);
}

/// A serialized event broadcast to all connected gateway sessions.
#[derive(Debug, Clone)]
pub struct BroadcastPayload {
    pub audience: Audience,
    /// The event name (e.g. "newMessage").
    pub event_name: &'static str,
    /// JSON text frame, encoded once for every recipient.
    pub text: String,
}

/// The gateway broadcast hub. Cloneable; store in AppState.
#[derive(Clone)]
pub struct GatewayBroadcast {
    sender: broadcast::Sender<Arc<BroadcastPayload>>,
}

impl GatewayBroadcast {
    /// `capacity` bounds how far a session may fall behind before it skips
    /// events (`RecvError::Lagged`).
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to the broadcast channel. Each gateway session calls this
    /// once, before its first inbound event is handled.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<BroadcastPayload>> {
        self.sender.subscribe()
    }
}

impl Transport for GatewayBroadcast {
    fn deliver(&self, audience: Audience, event: OutboundEvent) {
        let text = match serde_json::to_string(&event) {
            Ok(text) => text,
            Err(err) => {
                tracing::error!(?err, event = event.name(), "failed to encode outbound event");
                return;
            }
        };

        // send() only fails when nobody is subscribed.
        let _ = self.sender.send(Arc::new(BroadcastPayload {
            audience,
            event_name: event.name(),
            text,
        }));
    }
}
