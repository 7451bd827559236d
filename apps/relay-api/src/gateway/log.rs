//! Bounded log of recent chat messages, replayed to newly joined clients.

use std::collections::VecDeque;

use crate::models::ChatMessage;

pub struct MessageLog {
    capacity: usize,
    entries: VecDeque<ChatMessage>,
}

impl MessageLog {
    /// Create a log holding at most `capacity` messages (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a message, evicting the oldest entries beyond capacity.
    pub fn append(&mut self, message: ChatMessage) {
        self.entries.push_back(message);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// The last `n` messages, oldest-first.
    pub fn recent(&self, n: usize) -> Vec<ChatMessage> {
        let start = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(start).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
