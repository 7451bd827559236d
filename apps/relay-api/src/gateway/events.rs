//! Gateway event types and wire-format messages.
//!
//! Every frame is a JSON envelope `{"t": <event>, "d": <payload>}` in both
//! directions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ChatMessage, Participant};

// ---------------------------------------------------------------------------
// Client → Server
// ---------------------------------------------------------------------------

/// An event received from a connection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "t", content = "d", rename_all = "camelCase")]
pub enum InboundEvent {
    Join(JoinPayload),
    SendMessage(SendMessagePayload),
    Typing(bool),
    /// Sent by the client or synthesized by the gateway when the socket closes.
    Disconnect,
}

impl InboundEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Join(_) => "join",
            Self::SendMessage(_) => "sendMessage",
            Self::Typing(_) => "typing",
            Self::Disconnect => "disconnect",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JoinPayload {
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SendMessagePayload {
    pub message: String,
}

// ---------------------------------------------------------------------------
// Server → Client
// ---------------------------------------------------------------------------

/// An event sent to one or more connections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "t", content = "d", rename_all = "camelCase")]
pub enum OutboundEvent {
    UsersList(Vec<Participant>),
    MessageHistory(Vec<ChatMessage>),
    UserJoined(PresenceNotice),
    NewMessage(ChatMessage),
    UserTyping(TypingNotice),
    UserLeft(PresenceNotice),
}

impl OutboundEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::UsersList(_) => "usersList",
            Self::MessageHistory(_) => "messageHistory",
            Self::UserJoined(_) => "userJoined",
            Self::NewMessage(_) => "newMessage",
            Self::UserTyping(_) => "userTyping",
            Self::UserLeft(_) => "userLeft",
        }
    }
}

/// Payload of `userJoined` and `userLeft`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresenceNotice {
    pub username: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl PresenceNotice {
    pub fn joined(username: &str) -> Self {
        Self {
            username: username.to_string(),
            message: format!("{username} joined the chat"),
            timestamp: Utc::now(),
        }
    }

    pub fn left(username: &str) -> Self {
        Self {
            username: username.to_string(),
            message: format!("{username} left the chat"),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingNotice {
    pub username: String,
    pub is_typing: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::ConnectionId;

    fn parse(value: serde_json::Value) -> Result<InboundEvent, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn parses_inbound_events() {
        assert_eq!(
            parse(json!({"t": "join", "d": {"username": "alice"}})).unwrap(),
            InboundEvent::Join(JoinPayload { username: "alice".into() })
        );
        assert_eq!(
            parse(json!({"t": "sendMessage", "d": {"message": "hi"}})).unwrap(),
            InboundEvent::SendMessage(SendMessagePayload { message: "hi".into() })
        );
        assert_eq!(
            parse(json!({"t": "typing", "d": true})).unwrap(),
            InboundEvent::Typing(true)
        );
        assert_eq!(parse(json!({"t": "disconnect"})).unwrap(), InboundEvent::Disconnect);
    }

    #[test]
    fn rejects_unknown_or_malformed_events() {
        assert!(parse(json!({"t": "shout", "d": "hey"})).is_err());
        assert!(parse(json!({"t": "typing", "d": "yes"})).is_err());
        assert!(parse(json!({"t": "join", "d": {}})).is_err());
    }

    #[test]
    fn outbound_envelope_shape() {
        let typing = OutboundEvent::UserTyping(TypingNotice {
            username: "bob".into(),
            is_typing: true,
        });
        assert_eq!(
            serde_json::to_value(&typing).unwrap(),
            json!({"t": "userTyping", "d": {"username": "bob", "isTyping": true}})
        );

        let participant = Participant::new(ConnectionId::from("conn_a"), "alice".into());
        let list = serde_json::to_value(OutboundEvent::UsersList(vec![participant])).unwrap();
        assert_eq!(list["t"], "usersList");
        assert_eq!(list["d"][0]["id"], "conn_a");
        assert_eq!(list["d"][0]["username"], "alice");
        assert!(list["d"][0]["joinedAt"].is_string());
    }

    #[test]
    fn presence_notice_messages() {
        assert_eq!(PresenceNotice::joined("bob").message, "bob joined the chat");
        assert_eq!(PresenceNotice::left("bob").message, "bob left the chat");
    }

    #[test]
    fn names_match_wire_tags() {
        let event = OutboundEvent::UserLeft(PresenceNotice::left("x"));
        assert_eq!(serde_json::to_value(&event).unwrap()["t"], event.name());
    }
}
