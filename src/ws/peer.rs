//! Handle on a connected peer, passed to every message handler.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use super::rooms::RoomMembership;
use super::{MessageHub, PeerId};
use crate::error::FacadeError;

/// A connected peer as seen by message handlers.
///
/// Cheap to clone; all clones share the same room membership.
#[derive(Debug, Clone)]
pub struct Peer {
    id: PeerId,
    hub: MessageHub,
    membership: Arc<RwLock<RoomMembership>>,
}

impl Peer {
    /// Creates the handle for a new connection.
    #[must_use]
    pub fn new(id: PeerId, hub: MessageHub) -> Self {
        Self {
            id,
            hub,
            membership: Arc::new(RwLock::new(RoomMembership::new(id))),
        }
    }

    /// Returns the peer's id.
    #[must_use]
    pub const fn id(&self) -> PeerId {
        self.id
    }

    /// Returns the hub, for emitting to other peers.
    #[must_use]
    pub const fn hub(&self) -> &MessageHub {
        &self.hub
    }

    /// Sends `data` tagged with `event` to this peer only.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::Serialization`] if `data` cannot be encoded.
    pub fn emit<T: Serialize + ?Sized>(&self, event: &str, data: &T) -> Result<(), FacadeError> {
        self.hub.emit(event, data, Some(&self.id.to_string()), None)
    }

    /// Sends `data` to every peer in `room` except this one.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::Serialization`] if `data` cannot be encoded.
    pub fn broadcast<T: Serialize + ?Sized>(
        &self,
        event: &str,
        data: &T,
        room: Option<&str>,
    ) -> Result<(), FacadeError> {
        self.hub.emit(event, data, room, Some(self.id))
    }

    /// Joins `room`. Returns `false` if already a member.
    pub async fn join(&self, room: &str) -> bool {
        self.membership.write().await.join(room)
    }

    /// Leaves `room`. Returns `false` if not a member.
    pub async fn leave(&self, room: &str) -> bool {
        self.membership.write().await.leave(room)
    }

    /// Returns the rooms joined explicitly, sorted.
    pub async fn rooms(&self) -> Vec<String> {
        self.membership.read().await.rooms()
    }

    /// Returns `true` if a broadcast to `room` reaches this peer.
    pub async fn is_in(&self, room: Option<&str>) -> bool {
        self.membership.read().await.matches(room)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clones_share_membership() {
        let peer = Peer::new(PeerId::new(), MessageHub::new(4));
        let other = peer.clone();
        assert!(peer.join("lobby").await);
        assert!(other.is_in(Some("lobby")).await);
        assert_eq!(other.rooms().await, vec!["lobby"]);
    }

    #[tokio::test]
    async fn emit_targets_own_room() {
        let hub = MessageHub::new(4);
        let mut rx = hub.subscribe();
        let peer = Peer::new(PeerId::new(), hub);

        assert!(peer.emit("pong", &1).is_ok());
        let Ok(msg) = rx.recv().await else {
            panic!("expected a broadcast");
        };
        assert_eq!(msg.room, Some(peer.id().to_string()));
        assert_eq!(msg.skip, None);
    }

    #[tokio::test]
    async fn broadcast_skips_sender() {
        let hub = MessageHub::new(4);
        let mut rx = hub.subscribe();
        let peer = Peer::new(PeerId::new(), hub);

        assert!(peer.broadcast("chat", "hi", Some("lobby")).is_ok());
        let Ok(msg) = rx.recv().await else {
            panic!("expected a broadcast");
        };
        assert!(!msg.admits(peer.id()));
        assert_eq!(msg.room.as_deref(), Some("lobby"));
    }
}
