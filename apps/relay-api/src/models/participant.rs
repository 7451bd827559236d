use std::fmt;

use chrono::{DateTime, Utc};
use relay_common::id::{prefix, PrefixedId};
use serde::Serialize;

/// Opaque identifier for one live gateway connection.
///
/// Assigned by the gateway when the socket is accepted; the coordinator never
/// mints these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl PrefixedId for ConnectionId {
    const PREFIX: &'static str = prefix::CONNECTION;
}

impl ConnectionId {
    pub fn generate() -> Self {
        Self(<Self as PrefixedId>::generate())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ConnectionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ConnectionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A joined chat participant, as sent in `usersList`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    #[serde(rename = "id")]
    pub connection_id: ConnectionId,
    pub username: String,
    pub joined_at: DateTime<Utc>,
}

impl Participant {
    pub fn new(connection_id: ConnectionId, username: String) -> Self {
        Self {
            connection_id,
            username,
            joined_at: Utc::now(),
        }
    }
}
