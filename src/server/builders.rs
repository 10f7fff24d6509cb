//! Fluent registration helpers.
//!
//! `server.route("/path").to(handler)` and `server.handler("event").to(f)`
//! register exactly what `add_route` and `on` register; the builders only
//! let a route module name the target before supplying the function.

use axum::handler::Handler;
use axum::routing::{MethodRouter, get};

use super::{WebServer, endpoint_name};
use crate::app_state::AppState;
use crate::error::FacadeError;
use crate::ws::MessageHandler;

/// Pending HTTP route registration.
#[derive(Debug)]
#[must_use = "a route is only registered once `to` or `methods` is called"]
pub struct RouteBuilder<'a> {
    server: &'a mut WebServer,
    path: String,
    name: Option<String>,
}

impl<'a> RouteBuilder<'a> {
    pub(super) fn new(server: &'a mut WebServer, path: &str) -> Self {
        Self {
            server,
            path: path.to_string(),
            name: None,
        }
    }

    /// Overrides the endpoint name derived from the handler.
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Registers `handler` for `GET`.
    ///
    /// # Errors
    ///
    /// Same as [`WebServer::add_route`].
    pub fn to<H, T>(self, handler: H) -> Result<(), FacadeError>
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        let name = self.name.unwrap_or_else(|| endpoint_name::<H>().to_string());
        self.server.add_named_route(&self.path, &name, get(handler))
    }

    /// Registers a full method router. Without [`RouteBuilder::name`],
    /// the path doubles as the endpoint name.
    ///
    /// # Errors
    ///
    /// Same as [`WebServer::add_route`].
    pub fn methods(self, method_router: MethodRouter<AppState>) -> Result<(), FacadeError> {
        let name = self.name.unwrap_or_else(|| self.path.clone());
        self.server.add_named_route(&self.path, &name, method_router)
    }
}

/// Pending message handler registration.
#[derive(Debug)]
#[must_use = "a handler is only registered once `to` is called"]
pub struct HandlerBuilder<'a> {
    server: &'a mut WebServer,
    event: String,
}

impl<'a> HandlerBuilder<'a> {
    pub(super) fn new(server: &'a mut WebServer, event: &str) -> Self {
        Self {
            server,
            event: event.to_string(),
        }
    }

    /// Registers `handler` for the event.
    pub fn to<H: MessageHandler>(self, handler: H) {
        self.server.on(&self.event, handler);
    }
}
