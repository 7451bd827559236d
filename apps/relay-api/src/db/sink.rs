//! Fire-and-forget hand-off from the broadcast path to the message store.
//!
//! Messages are queued on a bounded channel and written by a single worker
//! task in arrival order. When the store stalls and the queue fills, new
//! messages are dropped with a warning instead of blocking the broadcast path.
//! Store failures are logged and dropped; the caller is never told.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::db::store::MessageStore;
use crate::models::ChatMessage;

/// Messages waiting for the store before new ones are dropped.
pub const SINK_QUEUE_CAPACITY: usize = 1024;

#[derive(Clone)]
pub struct PersistenceSink {
    sender: mpsc::Sender<ChatMessage>,
}

impl PersistenceSink {
    /// Spawn the writer task. Must be called inside a Tokio runtime.
    pub fn spawn(store: Arc<dyn MessageStore>) -> (Self, JoinHandle<()>) {
        Self::with_capacity(store, SINK_QUEUE_CAPACITY)
    }

    pub fn with_capacity(store: Arc<dyn MessageStore>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (sender, mut receiver) = mpsc::channel::<ChatMessage>(capacity.max(1));

        let worker = tokio::spawn(async move {
            while let Some(message) = receiver.recv().await {
                if let Err(err) = store.append(&message).await {
                    tracing::warn!(
                        ?err,
                        message_id = message.id,
                        username = %message.username,
                        "failed to persist chat message"
                    );
                }
            }
            tracing::debug!("persistence sink closed");
        });

        (Self { sender }, worker)
    }

    /// Queue a message for storage. Never blocks; returns false when the
    /// message was dropped.
    pub fn submit(&self, message: ChatMessage) -> bool {
        match self.sender.try_send(message) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(message)) => {
                tracing::warn!(message_id = message.id, "persistence queue full, message not stored");
                false
            }
            Err(mpsc::error::TrySendError::Closed(message)) => {
                tracing::warn!(message_id = message.id, "persistence worker gone, message not stored");
                false
            }
        }
    }
}
