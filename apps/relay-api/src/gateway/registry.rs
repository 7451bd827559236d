//! Connection registry: which connections have joined, and as whom.

use std::collections::HashMap;

use crate::models::{ConnectionId, Participant};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("connection {0} is already registered")]
    AlreadyRegistered(ConnectionId),
}

struct Entry {
    /// Registration order, used to keep `list()` stable.
    order: u64,
    participant: Participant,
}

/// Owns every live [`Participant`]. Plain data; callers provide locking.
#[derive(Default)]
pub struct ConnectionRegistry {
    entries: HashMap<ConnectionId, Entry>,
    next_order: u64,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a participant for `connection_id`. An existing registration is
    /// left untouched and reported as an error.
    pub fn register(
        &mut self,
        connection_id: ConnectionId,
        username: String,
    ) -> Result<Participant, RegistryError> {
        if self.entries.contains_key(&connection_id) {
            return Err(RegistryError::AlreadyRegistered(connection_id));
        }

        let participant = Participant::new(connection_id.clone(), username);
        self.entries.insert(
            connection_id,
            Entry {
                order: self.next_order,
                participant: participant.clone(),
            },
        );
        self.next_order += 1;
        Ok(participant)
    }

    /// Remove and return the participant, or `None` if it was never registered
    /// or already removed.
    pub fn unregister(&mut self, connection_id: &ConnectionId) -> Option<Participant> {
        self.entries.remove(connection_id).map(|e| e.participant)
    }

    pub fn get(&self, connection_id: &ConnectionId) -> Option<&Participant> {
        self.entries.get(connection_id).map(|e| &e.participant)
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.entries.contains_key(connection_id)
    }

    /// Snapshot of all participants in join order.
    pub fn list(&self) -> Vec<Participant> {
        let mut entries: Vec<&Entry> = self.entries.values().collect();
        entries.sort_by_key(|e| e.order);
        entries.into_iter().map(|e| e.participant.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
