//! Messaging layer: hub, handlers, peers, and the connection loop.
//!
//! The WebSocket endpoint at [`SOCKET_IO_NAMESPACE`] carries event-tagged
//! JSON frames in both directions. Incoming events go to the handler
//! registered for their name; outgoing messages go through the
//! [`MessageHub`] and are filtered per connection by room and skip.

pub mod connection;
pub mod handler;
pub mod handlers;
pub mod hub;
pub mod messages;
pub mod peer;
pub mod peer_id;
pub mod rooms;

pub use handlers::{HandlerTable, MessageHandler};
pub use hub::{Broadcast, MessageHub};
pub use peer::Peer;
pub use peer_id::PeerId;

/// Namespace of the messaging endpoint, also its URL path.
pub const SOCKET_IO_NAMESPACE: &str = "/socketio";
