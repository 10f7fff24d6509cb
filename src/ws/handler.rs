//! Axum WebSocket upgrade handler for the messaging endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::connection::run_connection;
use super::{Peer, PeerId};
use crate::app_state::AppState;

/// `GET /socketio` — Upgrade HTTP connection to WebSocket.
pub async fn socket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    // Subscribe before upgrading so nothing emitted by `connect` is missed.
    let broadcast_rx = state.hub.subscribe();
    let peer = Peer::new(PeerId::new(), state.hub.clone());
    let handlers = Arc::clone(&state.handlers);

    ws.on_upgrade(move |socket| run_connection(socket, peer, handlers, broadcast_rx))
}
