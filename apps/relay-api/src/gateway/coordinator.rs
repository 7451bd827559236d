//! Presence and message-broadcast coordinator.
//!
//! Every inbound event from every connection goes through [`Coordinator::handle`],
//! which holds one lock across the registry/log mutation and the outbound
//! hand-off. A joiner's `usersList`/`messageHistory` snapshot therefore lines
//! up exactly with the broadcasts ordered before and after it.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use super::events::{InboundEvent, OutboundEvent, PresenceNotice, TypingNotice};
use super::fanout::{Audience, Transport};
use super::log::MessageLog;
use super::registry::ConnectionRegistry;
use crate::db::sink::PersistenceSink;
use crate::models::{ChatMessage, ConnectionId, Participant};

/// Lifecycle of one connection as seen by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Unjoined,
    Joined,
    Closed,
}

struct ChatState {
    registry: ConnectionRegistry,
    log: MessageLog,
    /// Disconnected connections whose session has not been released yet.
    closed: HashSet<ConnectionId>,
}

impl ChatState {
    fn state_of(&self, connection_id: &ConnectionId) -> ConnectionState {
        if self.closed.contains(connection_id) {
            ConnectionState::Closed
        } else if self.registry.contains(connection_id) {
            ConnectionState::Joined
        } else {
            ConnectionState::Unjoined
        }
    }
}

pub struct Coordinator {
    state: Mutex<ChatState>,
    transport: Arc<dyn Transport>,
    sink: Option<PersistenceSink>,
    history_replay_limit: usize,
}

impl Coordinator {
    pub fn new(
        transport: Arc<dyn Transport>,
        sink: Option<PersistenceSink>,
        log_capacity: usize,
        history_replay_limit: usize,
    ) -> Self {
        Self {
            state: Mutex::new(ChatState {
                registry: ConnectionRegistry::new(),
                log: MessageLog::new(log_capacity),
                closed: HashSet::new(),
            }),
            transport,
            sink,
            history_replay_limit,
        }
    }

    /// Apply one inbound event from `connection_id`.
    pub fn handle(&self, connection_id: &ConnectionId, event: InboundEvent) {
        let mut state = self.state.lock();

        if state.state_of(connection_id) == ConnectionState::Closed {
            tracing::debug!(
                connection_id = %connection_id,
                event = event.name(),
                "event for closed connection ignored"
            );
            return;
        }

        match event {
            InboundEvent::Join(payload) => self.join(&mut state, connection_id, payload.username),
            InboundEvent::SendMessage(payload) => {
                self.send_message(&mut state, connection_id, payload.message)
            }
            InboundEvent::Typing(is_typing) => self.typing(&state, connection_id, is_typing),
            InboundEvent::Disconnect => self.disconnect(&mut state, connection_id),
        }
    }

    /// Forget a closed connection once the gateway guarantees no further
    /// events for it.
    pub fn release(&self, connection_id: &ConnectionId) {
        self.state.lock().closed.remove(connection_id);
    }

    pub fn connection_state(&self, connection_id: &ConnectionId) -> ConnectionState {
        self.state.lock().state_of(connection_id)
    }

    pub fn participant_count(&self) -> usize {
        self.state.lock().registry.len()
    }

    pub fn participants(&self) -> Vec<Participant> {
        self.state.lock().registry.list()
    }

    /// The last `n` messages still held in memory, oldest-first.
    pub fn recent_messages(&self, n: usize) -> Vec<ChatMessage> {
        self.state.lock().log.recent(n)
    }

    /// Number of messages currently retained in memory.
    pub fn total_messages(&self) -> usize {
        self.state.lock().log.len()
    }

    fn join(&self, state: &mut ChatState, connection_id: &ConnectionId, username: String) {
        let participant = match state.registry.register(connection_id.clone(), username) {
            Ok(participant) => participant,
            Err(err) => {
                tracing::warn!(%err, "duplicate join rejected");
                return;
            }
        };

        tracing::info!(
            connection_id = %connection_id,
            username = %participant.username,
            participants = state.registry.len(),
            "participant joined"
        );

        let only = Audience::Only(connection_id.clone());
        self.transport
            .deliver(only.clone(), OutboundEvent::UsersList(state.registry.list()));
        self.transport.deliver(
            only,
            OutboundEvent::MessageHistory(state.log.recent(self.history_replay_limit)),
        );
        self.transport.deliver(
            Audience::AllExcept(connection_id.clone()),
            OutboundEvent::UserJoined(PresenceNotice::joined(&participant.username)),
        );
    }

    fn send_message(&self, state: &mut ChatState, connection_id: &ConnectionId, body: String) {
        let Some(sender) = state.registry.get(connection_id) else {
            tracing::debug!(connection_id = %connection_id, "message from unknown sender dropped");
            return;
        };

        let message = ChatMessage::new(sender.username.clone(), body);
        state.log.append(message.clone());

        if let Some(sink) = &self.sink {
            sink.submit(message.clone());
        }

        tracing::debug!(
            connection_id = %connection_id,
            message_id = message.id,
            "message broadcast"
        );
        self.transport
            .deliver(Audience::All, OutboundEvent::NewMessage(message));
    }

    fn typing(&self, state: &ChatState, connection_id: &ConnectionId, is_typing: bool) {
        let Some(sender) = state.registry.get(connection_id) else {
            tracing::debug!(connection_id = %connection_id, "typing from unknown sender dropped");
            return;
        };

        self.transport.deliver(
            Audience::AllExcept(connection_id.clone()),
            OutboundEvent::UserTyping(TypingNotice {
                username: sender.username.clone(),
                is_typing,
            }),
        );
    }

    fn disconnect(&self, state: &mut ChatState, connection_id: &ConnectionId) {
        state.closed.insert(connection_id.clone());

        let Some(participant) = state.registry.unregister(connection_id) else {
            tracing::debug!(connection_id = %connection_id, "connection closed before joining");
            return;
        };

        tracing::info!(
            connection_id = %connection_id,
            username = %participant.username,
            participants = state.registry.len(),
            "participant left"
        );

        self.transport.deliver(
            Audience::AllExcept(connection_id.clone()),
            OutboundEvent::UserLeft(PresenceNotice::left(&participant.username)),
        );
    }
}
