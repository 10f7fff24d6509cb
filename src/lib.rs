//! # portico
//!
//! Modular routing and real-time messaging façade over Axum.
//!
//! A [`WebServer`] bundles an HTTP router, a WebSocket messaging endpoint
//! at `/socketio`, static assets under `/public`, and a Jinja template
//! environment behind one listener. Route modules register HTTP routes
//! and message handlers through a small façade; handlers reach the same
//! façade at request time through [`AppState`].
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── Route table (http/)        ── user routes, `/public` static files
//!     ├── Messaging endpoint (ws/)   ── `/socketio`, peers, rooms
//!     │
//!     ├── WebServer (server/)        ── setup, registration, emit, render, run
//!     │       ▲
//!     │       └── route modules (routes/), run in order at setup
//!     │
//!     └── AppState                   ── façade inside handlers
//! ```

pub mod app_state;
pub mod config;
pub mod error;
pub mod http;
pub mod routes;
pub mod server;
pub mod ws;

pub use app_state::AppState;
pub use config::ServerConfig;
pub use error::FacadeError;
pub use http::Bindings;
pub use server::{RouteModule, WebServer};
pub use ws::{MessageHub, Peer, PeerId, SOCKET_IO_NAMESPACE};
