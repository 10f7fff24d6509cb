//! `GET /hello/<name>` — plain-text greeting.

use axum::extract::Path;

use crate::error::FacadeError;
use crate::server::WebServer;

async fn greet(Path(name): Path<String>) -> String {
    format!("Hello, {name}!")
}

/// Registers the greeting route.
///
/// # Errors
///
/// Returns [`FacadeError`] if the route cannot be registered.
pub fn register(server: &mut WebServer) -> Result<(), FacadeError> {
    server.route("/hello/<name>").to(greet)
}
