//! `GET /` — page index rendered from `index.html`.

use axum::extract::State;
use axum::response::Html;

use crate::app_state::AppState;
use crate::error::FacadeError;
use crate::http::Bindings;
use crate::server::WebServer;

/// Renders the index template with the route listing.
async fn index(State(state): State<AppState>) -> Result<Html<String>, FacadeError> {
    let mut args = Bindings::new();
    args.insert("title".to_string(), serde_json::json!("Index"));
    Ok(Html(state.render("index.html", &mut args)?))
}

/// Registers the index page.
///
/// # Errors
///
/// Returns [`FacadeError`] if the route cannot be registered.
pub fn register(server: &mut WebServer) -> Result<(), FacadeError> {
    server.add_route("/", index)
}
