//! Messaging handlers for room membership.
//!
//! `join` and `leave` take the room name as their data and answer the
//! sender with `joined` / `left` carrying the same name.

use crate::error::FacadeError;
use crate::server::WebServer;
use crate::ws::Peer;

async fn on_join(peer: Peer, data: serde_json::Value) {
    let Some(room) = data.as_str() else {
        tracing::warn!(peer = %peer.id(), "join without a room name");
        return;
    };
    peer.join(room).await;
    tracing::debug!(peer = %peer.id(), room, "joined room");
    if let Err(e) = peer.emit("joined", room) {
        tracing::warn!(peer = %peer.id(), error = %e, "join ack not sent");
    }
}

async fn on_leave(peer: Peer, data: serde_json::Value) {
    let Some(room) = data.as_str() else {
        tracing::warn!(peer = %peer.id(), "leave without a room name");
        return;
    };
    peer.leave(room).await;
    tracing::debug!(peer = %peer.id(), room, "left room");
    if let Err(e) = peer.emit("left", room) {
        tracing::warn!(peer = %peer.id(), error = %e, "leave ack not sent");
    }
}

/// Registers the `join` and `leave` handlers.
///
/// # Errors
///
/// Never fails; the signature matches the other route modules.
pub fn register(server: &mut WebServer) -> Result<(), FacadeError> {
    server.handler("join").to(on_join);
    server.handler("leave").to(on_leave);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::ws::{MessageHub, PeerId};

    #[tokio::test]
    async fn join_adds_membership_and_acknowledges() {
        let hub = MessageHub::new(4);
        let mut rx = hub.subscribe();
        let peer = Peer::new(PeerId::new(), hub);

        on_join(peer.clone(), serde_json::json!("lobby")).await;
        assert!(peer.is_in(Some("lobby")).await);
        let Ok(ack) = rx.recv().await else {
            panic!("expected a join ack");
        };
        assert_eq!(ack.event, "joined");
        assert_eq!(ack.data, serde_json::json!("lobby"));

        on_leave(peer.clone(), serde_json::json!("lobby")).await;
        assert!(!peer.is_in(Some("lobby")).await);
    }

    #[tokio::test]
    async fn join_ignores_non_string_room() {
        let peer = Peer::new(PeerId::new(), MessageHub::new(4));
        on_join(peer.clone(), serde_json::json!({"room": "lobby"})).await;
        assert!(peer.rooms().await.is_empty());
    }
}
