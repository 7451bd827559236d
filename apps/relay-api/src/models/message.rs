use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::schema::chat_messages;

/// One broadcast chat message. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ChatMessage {
    /// Wall-clock milliseconds at creation. Two sends inside the same
    /// millisecond share an id.
    pub id: i64,
    /// Sender's username, copied at send time.
    pub username: String,
    #[serde(rename = "message")]
    pub body: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(username: String, body: String) -> Self {
        Self::at(username, body, Utc::now())
    }

    pub fn at(username: String, body: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: timestamp.timestamp_millis(),
            username,
            body,
            timestamp,
        }
    }
}

/// Row in `chat_messages`. `seq` is a surrogate key so colliding message ids
/// never fail an insert.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = chat_messages)]
pub struct StoredMessage {
    pub seq: i64,
    pub id: i64,
    pub username: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<StoredMessage> for ChatMessage {
    fn from(row: StoredMessage) -> Self {
        Self {
            id: row.id,
            username: row.username,
            body: row.body,
            timestamp: row.created_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = chat_messages)]
pub struct NewStoredMessage<'a> {
    pub id: i64,
    pub username: &'a str,
    pub body: &'a str,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a ChatMessage> for NewStoredMessage<'a> {
    fn from(message: &'a ChatMessage) -> Self {
        Self {
            id: message.id,
            username: &message.username,
            body: &message.body,
            created_at: message.timestamp,
        }
    }
}
