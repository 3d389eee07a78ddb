/// WebSocket message types for real-time notifications
use super::manager::ChannelId;
use crate::models::Notification;
use serde::{Deserialize, Serialize};

/// Frames exchanged on a notification channel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum WebSocketMessage {
    /// Server pushes a persisted notification to the client
    Notification { notification: Notification },

    /// Heartbeat/ping
    Ping { timestamp: i64 },

    /// Heartbeat reply
    Pong { timestamp: i64 },

    /// Error message from server
    Error { code: String, message: String },

    /// Connection established confirmation
    Connected { channel_id: ChannelId, timestamp: i64 },
}

impl WebSocketMessage {
    pub fn notification(notification: Notification) -> Self {
        WebSocketMessage::Notification { notification }
    }

    pub fn ping() -> Self {
        WebSocketMessage::Ping {
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    pub fn pong(timestamp: i64) -> Self {
        WebSocketMessage::Pong { timestamp }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        WebSocketMessage::Error {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn connected(channel_id: ChannelId) -> Self {
        WebSocketMessage::Connected {
            channel_id,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
