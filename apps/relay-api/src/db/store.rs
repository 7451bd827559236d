//! Message stores the persistence sink writes through: Postgres in
//! production, memory in tests.

use async_trait::async_trait;
use diesel::prelude::*;
use parking_lot::Mutex;

use crate::db::pool::DbPool;
use crate::db::schema::chat_messages;
use crate::error::StoreError;
use crate::models::message::{NewStoredMessage, StoredMessage};
use crate::models::ChatMessage;

/// Append-only durable home for chat messages.
///
/// Backed by PostgreSQL when `DATABASE_URL` is set and an in-memory vector in
/// tests.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn append(&self, message: &ChatMessage) -> Result<(), StoreError>;

    /// The newest `limit` messages, oldest-first.
    async fn recent(&self, limit: usize) -> Result<Vec<ChatMessage>, StoreError>;
}

// ---------------------------------------------------------------------------
// In-memory implementation (for tests)
// ---------------------------------------------------------------------------

pub struct MemoryStore {
    data: Mutex<Vec<ChatMessage>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.data.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.lock().is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn append(&self, message: &ChatMessage) -> Result<(), StoreError> {
        self.data.lock().push(message.clone());
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<ChatMessage>, StoreError> {
        let data = self.data.lock();
        let start = data.len().saturating_sub(limit);
        Ok(data[start..].to_vec())
    }
}

// ---------------------------------------------------------------------------
// PostgreSQL implementation
// ---------------------------------------------------------------------------

pub struct PgMessageStore {
    pool: DbPool,
}

impl PgMessageStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for PgMessageStore {
    async fn append(&self, message: &ChatMessage) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;

        diesel_async::RunQueryDsl::execute(
            diesel::insert_into(chat_messages::table).values(NewStoredMessage::from(message)),
            &mut conn,
        )
        .await?;

        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<ChatMessage>, StoreError> {
        let mut conn = self.pool.get().await?;

        let mut rows: Vec<StoredMessage> = diesel_async::RunQueryDsl::load(
            chat_messages::table
                .order(chat_messages::seq.desc())
                .limit(i64::try_from(limit).unwrap_or(i64::MAX))
                .select(StoredMessage::as_select()),
            &mut conn,
        )
        .await?;

        rows.reverse();
        Ok(rows.into_iter().map(ChatMessage::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_recent_is_oldest_first() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store
                .append(&ChatMessage::new("alice".into(), format!("m{i}")))
                .await
                .unwrap();
        }

        let recent = store.recent(3).await.unwrap();
        let bodies: Vec<&str> = recent.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["m2", "m3", "m4"]);
    }

    #[tokio::test]
    async fn memory_store_recent_with_large_limit_returns_everything() {
        let store = MemoryStore::new();
        store
            .append(&ChatMessage::new("bob".into(), "only".into()))
            .await
            .unwrap();

        assert_eq!(store.recent(50).await.unwrap().len(), 1);
        assert_eq!(store.len(), 1);
    }
}
