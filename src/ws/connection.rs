//! Messaging connection loop.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching incoming events to handlers and forwarding broadcasts
//! addressed to the peer.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::Peer;
use super::handlers::HandlerTable;
use super::hub::Broadcast;
use super::messages::{CONNECT_EVENT, ClientMessage, DISCONNECT_EVENT, ServerMessage};

/// Runs the read/write loop for a single connection.
///
/// - Sends the `connect` frame and dispatches the `connect` handler.
/// - Reads events from the client and spawns their handlers.
/// - Forwards broadcasts that pass the peer's skip and room filter.
/// - Dispatches the `disconnect` handler once the socket closes.
pub async fn run_connection(
    socket: WebSocket,
    peer: Peer,
    handlers: Arc<HandlerTable>,
    mut broadcast_rx: broadcast::Receiver<Broadcast>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let peer_id = peer.id();
    tracing::debug!(peer = %peer_id, "ws connection opened");

    let hello = ServerMessage::connect(peer_id).to_json();
    if ws_tx.send(Message::text(hello)).await.is_err() {
        return;
    }
    dispatch(&handlers, &peer, CONNECT_EVENT, serde_json::Value::Null);

    loop {
        tokio::select! {
            // Incoming frame from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(reply) = handle_text_message(&text, &handlers, &peer)
                            && ws_tx.send(Message::text(reply)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(peer = %peer_id, error = %e, "ws read failed");
                        break;
                    }
                    _ => {}
                }
            }
            // Broadcast from the hub
            message = broadcast_rx.recv() => {
                match message {
                    Ok(message) => {
                        if message.admits(peer_id) && peer.is_in(message.room.as_deref()).await {
                            let frame = ServerMessage::new(message.event, message.data).to_json();
                            if ws_tx.send(Message::text(frame)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(peer = %peer_id, lagged = n, "ws client lagged behind hub");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    if let Some(handler) = handlers.get(DISCONNECT_EVENT) {
        handler.call(peer, serde_json::Value::Null).await;
    }
    tracing::debug!(peer = %peer_id, "ws connection closed");
}

/// Decodes a client frame and dispatches it. Returns an error frame for
/// malformed input.
fn handle_text_message(text: &str, handlers: &HandlerTable, peer: &Peer) -> Option<String> {
    let Ok(msg) = serde_json::from_str::<ClientMessage>(text) else {
        return Some(ServerMessage::error(400, "malformed JSON").to_json());
    };
    dispatch(handlers, peer, &msg.event, msg.data);
    None
}

/// Spawns the handler registered for `event`, if any.
fn dispatch(handlers: &HandlerTable, peer: &Peer, event: &str, data: serde_json::Value) {
    match handlers.get(event) {
        Some(handler) => {
            tokio::spawn(handler.call(peer.clone(), data));
        }
        None => tracing::debug!(peer = %peer.id(), event, "no handler for event"),
    }
}
