//! Broadcast hub for outgoing messages.
//!
//! [`MessageHub`] wraps a [`tokio::sync::broadcast`] channel. Every emit
//! publishes a [`Broadcast`] and each connection filters it against its
//! own id and room membership before writing it to the socket.

use serde::Serialize;
use tokio::sync::broadcast;

use super::{PeerId, SOCKET_IO_NAMESPACE};
use crate::error::FacadeError;

/// A message addressed to a set of peers.
#[derive(Debug, Clone)]
pub struct Broadcast {
    /// Namespace the message belongs to.
    pub namespace: &'static str,
    /// Event name.
    pub event: String,
    /// Payload.
    pub data: serde_json::Value,
    /// Target room; `None` reaches every peer.
    pub room: Option<String>,
    /// Peer excluded from delivery.
    pub skip: Option<PeerId>,
}

impl Broadcast {
    /// Returns `true` unless `peer_id` is the skipped peer or the message
    /// is for another namespace. Room filtering is left to the caller.
    #[must_use]
    pub fn admits(&self, peer_id: PeerId) -> bool {
        self.namespace == SOCKET_IO_NAMESPACE && self.skip != Some(peer_id)
    }
}

/// Broadcast hub shared by the server, handlers, and connections.
///
/// Backed by a `tokio::broadcast` channel. When the ring buffer is full,
/// the oldest messages are dropped for lagging receivers.
#[derive(Debug, Clone)]
pub struct MessageHub {
    sender: broadcast::Sender<Broadcast>,
}

impl MessageHub {
    /// Creates a new hub with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Sends `data` tagged with `event` to every peer in `room` (all peers
    /// if `None`), except `skip`.
    ///
    /// Delivery is fire-and-forget: with no connected peers the message is
    /// dropped silently.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::Serialization`] if `data` cannot be encoded
    /// as JSON.
    pub fn emit<T: Serialize + ?Sized>(
        &self,
        event: &str,
        data: &T,
        room: Option<&str>,
        skip: Option<PeerId>,
    ) -> Result<(), FacadeError> {
        let data = serde_json::to_value(data)?;
        let delivered = self.publish(Broadcast {
            namespace: SOCKET_IO_NAMESPACE,
            event: event.to_string(),
            data,
            room: room.map(str::to_string),
            skip,
        });
        tracing::trace!(event, room = ?room, receivers = delivered, "emit");
        Ok(())
    }

    /// Publishes a prepared broadcast.
    ///
    /// Returns the number of connections that received it.
    pub fn publish(&self, message: Broadcast) -> usize {
        self.sender.send(message).unwrap_or(0)
    }

    /// Creates a receiver for all future broadcasts.
    ///
    /// Each connection calls this once on upgrade.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Broadcast> {
        self.sender.subscribe()
    }

    /// Returns the number of live connections.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn emit_without_receivers_is_ok() {
        let hub = MessageHub::new(8);
        assert!(hub.emit("news", &"hello", None, None).is_ok());
    }

    #[tokio::test]
    async fn subscriber_receives_emit() {
        let hub = MessageHub::new(8);
        let mut rx = hub.subscribe();

        let skip = PeerId::new();
        let result = hub.emit("news", &serde_json::json!({"n": 1}), Some("lobby"), Some(skip));
        assert!(result.is_ok());

        let Ok(msg) = rx.recv().await else {
            panic!("expected a broadcast");
        };
        assert_eq!(msg.event, "news");
        assert_eq!(msg.namespace, SOCKET_IO_NAMESPACE);
        assert_eq!(msg.room.as_deref(), Some("lobby"));
        assert_eq!(msg.data, serde_json::json!({"n": 1}));
        assert!(!msg.admits(skip));
        assert!(msg.admits(PeerId::new()));
    }

    #[test]
    fn other_namespace_is_not_admitted() {
        let msg = Broadcast {
            namespace: "/other",
            event: "x".to_string(),
            data: serde_json::Value::Null,
            room: None,
            skip: None,
        };
        assert!(!msg.admits(PeerId::new()));
    }

    #[test]
    fn receiver_count_tracks_subscribers() {
        let hub = MessageHub::new(8);
        assert_eq!(hub.receiver_count(), 0);
        let rx = hub.subscribe();
        assert_eq!(hub.receiver_count(), 1);
        drop(rx);
        assert_eq!(hub.receiver_count(), 0);
    }
}
