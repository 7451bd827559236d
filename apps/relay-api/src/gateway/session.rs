//! Per-connection gateway session state.

use std::time::{Duration, Instant};

use super::fanout::BroadcastPayload;
use crate::models::ConnectionId;

/// State for a single WebSocket connection.
pub struct GatewaySession {
    /// Unique connection identifier (`conn_` prefixed ULID).
    pub connection_id: ConnectionId,
    connected_at: Instant,
}

impl GatewaySession {
    pub fn new() -> Self {
        Self {
            connection_id: ConnectionId::generate(),
            connected_at: Instant::now(),
        }
    }

    /// Check whether this session should receive a broadcast payload.
    pub fn is_recipient(&self, payload: &BroadcastPayload) -> bool {
        payload.audience.includes(&self.connection_id)
    }

    pub fn uptime(&self) -> Duration {
        self.connected_at.elapsed()
    }
}

impl Default for GatewaySession {
    fn default() -> Self {
        Self::new()
    }
}
