//! Wire frames exchanged on the messaging endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PeerId;

/// Event sent to a peer right after its connection opens.
pub const CONNECT_EVENT: &str = "connect";

/// Event dispatched to handlers when a connection closes.
pub const DISCONNECT_EVENT: &str = "disconnect";

/// Event used for protocol errors sent to the client.
pub const ERROR_EVENT: &str = "error";

/// Client → server frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientMessage {
    /// Event name used to pick the handler.
    pub event: String,
    /// Arbitrary payload; `null` when omitted.
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Server → client frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerMessage {
    /// Event name.
    pub event: String,
    /// Payload.
    pub data: serde_json::Value,
    /// ISO-8601 send time.
    pub timestamp: DateTime<Utc>,
}

impl ServerMessage {
    /// Builds a frame stamped with the current time.
    #[must_use]
    pub fn new(event: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event: event.into(),
            data,
            timestamp: Utc::now(),
        }
    }

    /// Handshake frame carrying the peer's id.
    #[must_use]
    pub fn connect(peer_id: PeerId) -> Self {
        Self::new(CONNECT_EVENT, serde_json::json!({ "sid": peer_id }))
    }

    /// Error frame with a numeric code.
    #[must_use]
    pub fn error(code: u16, message: &str) -> Self {
        Self::new(
            ERROR_EVENT,
            serde_json::json!({ "code": code, "message": message }),
        )
    }

    /// Serializes the frame to JSON text.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
