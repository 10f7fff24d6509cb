//! Messaging handlers: `ping` answers the sender with `pong`.

use crate::error::FacadeError;
use crate::server::WebServer;
use crate::ws::Peer;

async fn on_connect(peer: Peer, _data: serde_json::Value) {
    tracing::info!(peer = %peer.id(), "peer connected");
}

async fn on_disconnect(peer: Peer, _data: serde_json::Value) {
    tracing::info!(peer = %peer.id(), "peer disconnected");
}

async fn on_ping(peer: Peer, data: serde_json::Value) {
    if let Err(e) = peer.emit("pong", &data) {
        tracing::warn!(peer = %peer.id(), error = %e, "pong not sent");
    }
}

/// Registers the connection and ping handlers.
///
/// # Errors
///
/// Never fails; the signature matches the other route modules.
pub fn register(server: &mut WebServer) -> Result<(), FacadeError> {
    server.on("connect", on_connect);
    server.on("disconnect", on_disconnect);
    server.handler("ping").to(on_ping);
    Ok(())
}
