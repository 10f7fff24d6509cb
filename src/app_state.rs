//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use serde::Serialize;

use crate::error::FacadeError;
use crate::http::templates::{Bindings, Templates, inject_pages};
use crate::server::shutdown::ShutdownHook;
use crate::ws::{HandlerTable, MessageHub, PeerId};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
///
/// Built when the router is assembled; the route listing and handler
/// table are frozen at that point.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Broadcast hub for outgoing messages.
    pub hub: MessageHub,
    /// Message handlers for the messaging endpoint.
    pub handlers: Arc<HandlerTable>,
    /// Template environment.
    pub templates: Templates,
    /// Sorted placeholder URLs of every route.
    pub pages: Arc<[String]>,
    secret_key: Arc<str>,
    shutdown: Option<ShutdownHook>,
}

impl AppState {
    pub(crate) fn new(
        hub: MessageHub,
        handlers: Arc<HandlerTable>,
        templates: Templates,
        pages: Arc<[String]>,
        secret_key: Arc<str>,
        shutdown: Option<ShutdownHook>,
    ) -> Self {
        Self {
            hub,
            handlers,
            templates,
            pages,
            secret_key,
            shutdown,
        }
    }

    /// Returns the sorted route listing.
    #[must_use]
    pub fn routes(&self) -> Vec<String> {
        self.pages.to_vec()
    }

    /// Injects `pages` into `args` and renders `template`.
    ///
    /// `args` keeps the injected key after the call.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::Template`] if rendering fails.
    pub fn render(&self, template: &str, args: &mut Bindings) -> Result<String, FacadeError> {
        inject_pages(args, &self.pages);
        tracing::debug!(template, bindings = ?args.keys().collect::<Vec<_>>(), "render");
        self.templates.render(template, args)
    }

    /// Sends a message to every peer in `room` (all if `None`) except
    /// `skip`. See [`MessageHub::emit`].
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::Serialization`] if `data` cannot be encoded.
    pub fn emit<T: Serialize + ?Sized>(
        &self,
        event: &str,
        data: &T,
        room: Option<&str>,
        skip: Option<PeerId>,
    ) -> Result<(), FacadeError> {
        self.hub.emit(event, data, room, skip)
    }

    /// Returns the configured secret.
    #[must_use]
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// Asks the running server to stop accepting connections and exit
    /// once in-flight requests finish.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::ShutdownUnavailable`] when the state was not
    /// built by [`crate::server::WebServer::serve`] (for example a router
    /// obtained from [`crate::server::WebServer::app`]).
    pub fn shutdown(&self) -> Result<(), FacadeError> {
        tracing::info!("shutting down");
        let hook = self
            .shutdown
            .as_ref()
            .ok_or(FacadeError::ShutdownUnavailable)?;
        hook.trigger();
        Ok(())
    }
}
