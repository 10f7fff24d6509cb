//! `GET /shutdown` — stops the running server.

use axum::extract::State;

use crate::app_state::AppState;
use crate::error::FacadeError;
use crate::server::WebServer;

async fn shutdown(State(state): State<AppState>) -> Result<&'static str, FacadeError> {
    state.shutdown()?;
    Ok("Server shutting down...")
}

/// Registers the shutdown endpoint.
///
/// # Errors
///
/// Returns [`FacadeError`] if the route cannot be registered.
pub fn register(server: &mut WebServer) -> Result<(), FacadeError> {
    server.add_route("/shutdown", shutdown)
}
