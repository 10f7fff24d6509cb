//! Message handler registration.
//!
//! Handlers are async functions of `(Peer, serde_json::Value)`. Each event
//! name maps to at most one handler; registering again replaces it.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use super::Peer;

/// An async handler for one messaging event.
pub trait MessageHandler: Send + Sync + 'static {
    /// Handles `data` sent by `peer`.
    fn call(&self, peer: Peer, data: serde_json::Value) -> BoxFuture<'static, ()>;
}

impl<F, Fut> MessageHandler for F
where
    F: Fn(Peer, serde_json::Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    fn call(&self, peer: Peer, data: serde_json::Value) -> BoxFuture<'static, ()> {
        Box::pin(self(peer, data))
    }
}

/// Event name → handler map for the messaging namespace.
#[derive(Default, Clone)]
pub struct HandlerTable {
    handlers: HashMap<String, Arc<dyn MessageHandler>>,
}

impl HandlerTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `event`. Returns `true` if it replaced an
    /// earlier registration.
    pub fn insert<H: MessageHandler>(&mut self, event: &str, handler: H) -> bool {
        let replaced = self
            .handlers
            .insert(event.to_string(), Arc::new(handler))
            .is_some();
        if replaced {
            tracing::warn!(event, "message handler replaced");
        } else {
            tracing::debug!(event, "message handler registered");
        }
        replaced
    }

    /// Returns the handler for `event`.
    #[must_use]
    pub fn get(&self, event: &str) -> Option<Arc<dyn MessageHandler>> {
        self.handlers.get(event).map(Arc::clone)
    }

    /// Returns registered event names, sorted.
    #[must_use]
    pub fn events(&self) -> Vec<&str> {
        let mut events: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        events.sort_unstable();
        events
    }
}

impl fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerTable")
            .field("events", &self.events())
            .finish()
    }
}
