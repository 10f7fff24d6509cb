//! Built-in route modules.
//!
//! Route discovery is an explicit list: [`modules`] returns every module in
//! the order [`crate::WebServer::setup`] runs them. Add a module by writing
//! a `fn(&mut WebServer) -> Result<(), FacadeError>` and listing it here.

pub mod admin;
pub mod hello;
pub mod index;
pub mod ping;
pub mod rooms;

use crate::server::RouteModule;

/// Returns the built-in modules in registration order.
#[must_use]
pub fn modules() -> &'static [RouteModule] {
    &[
        index::register,
        hello::register,
        ping::register,
        rooms::register,
        admin::register,
    ]
}
