//! Server context: assembly, registration façade, and the serve loop.
//!
//! [`WebServer`] owns everything a running server needs: the HTTP route
//! table, the message handler table, the broadcast hub, the templates and
//! the configuration. It is built once by [`WebServer::setup`], mutated
//! through `&mut` by route modules, and consumed by [`WebServer::run`].
//!
//! ```no_run
//! use portico::{ServerConfig, WebServer};
//!
//! async fn greet(axum::extract::Path(name): axum::extract::Path<String>) -> String {
//!     format!("Hello, {name}!")
//! }
//!
//! fn hello(server: &mut WebServer) -> Result<(), portico::FacadeError> {
//!     server.add_route("/hello/<name>", greet)
//! }
//!
//! # async fn start() -> Result<(), portico::FacadeError> {
//! let server = WebServer::setup(ServerConfig::from_env()?, &[hello])?;
//! server.run().await
//! # }
//! ```

pub mod builders;
pub mod shutdown;

use std::sync::Arc;

use axum::Router;
use axum::handler::Handler;
use axum::routing::{MethodRouter, get};
use serde::Serialize;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use builders::{HandlerBuilder, RouteBuilder};
use shutdown::{ShutdownHook, shutdown_signal};

use crate::app_state::AppState;
use crate::config::{STATIC_URL_PATH, ServerConfig};
use crate::error::FacadeError;
use crate::http::templates::inject_pages;
use crate::http::{Bindings, RouteTable, Templates};
use crate::ws::handler::socket_handler;
use crate::ws::{HandlerTable, MessageHandler, MessageHub, PeerId, SOCKET_IO_NAMESPACE};

/// A registration step run during [`WebServer::setup`].
pub type RouteModule = fn(&mut WebServer) -> Result<(), FacadeError>;

/// The server context.
#[derive(Debug)]
pub struct WebServer {
    config: ServerConfig,
    routes: RouteTable,
    handlers: HandlerTable,
    hub: MessageHub,
    templates: Templates,
}

impl WebServer {
    /// Builds the environment, then runs `modules` in order.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a module; the partially built
    /// server is dropped.
    pub fn setup(config: ServerConfig, modules: &[RouteModule]) -> Result<Self, FacadeError> {
        let mut server = Self::new(config);
        for module in modules {
            module(&mut server)?;
        }
        tracing::info!(
            routes = server.routes.len(),
            events = server.handlers.events().len(),
            "server set up"
        );
        Ok(server)
    }

    /// Builds the environment with no routes or handlers.
    ///
    /// The HTTP table comes first with the static prefix and messaging
    /// endpoint reserved, then the hub, then the templates.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let mut routes = RouteTable::new();
        routes.reserve(STATIC_URL_PATH, true);
        routes.reserve(SOCKET_IO_NAMESPACE, false);

        let hub = MessageHub::new(config.message_bus_capacity);
        let templates = Templates::from_dir(&config.template_dir);

        tracing::debug!(config = ?config, "environment assembled");
        Self {
            config,
            routes,
            handlers: HandlerTable::new(),
            hub,
            templates,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the live broadcast hub.
    #[must_use]
    pub const fn hub(&self) -> &MessageHub {
        &self.hub
    }

    /// Returns the registered message handlers.
    #[must_use]
    pub const fn handlers(&self) -> &HandlerTable {
        &self.handlers
    }

    /// Returns `(endpoint, path)` pairs in registration order.
    #[must_use]
    pub fn endpoints(&self) -> Vec<(&str, &str)> {
        self.routes.endpoints()
    }

    /// Registers a `GET` route named after `handler`'s function name.
    ///
    /// Closures have no function name and all register as `{{closure}}`,
    /// so a second closure route fails with
    /// [`FacadeError::DuplicateEndpoint`]. Name closure routes with
    /// `route(path).name("..").to(closure)` instead.
    ///
    /// # Errors
    ///
    /// - [`FacadeError::InvalidRoute`] if `path` is malformed.
    /// - [`FacadeError::DuplicateEndpoint`] if the name is taken.
    /// - [`FacadeError::RouteConflict`] if the path collides.
    pub fn add_route<H, T>(&mut self, path: &str, handler: H) -> Result<(), FacadeError>
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.routes.insert(path, endpoint_name::<H>(), get(handler))
    }

    /// Registers a route with an explicit name and method set.
    ///
    /// # Errors
    ///
    /// Same as [`WebServer::add_route`].
    pub fn add_named_route(
        &mut self,
        path: &str,
        name: &str,
        method_router: MethodRouter<AppState>,
    ) -> Result<(), FacadeError> {
        self.routes.insert(path, name, method_router)
    }

    /// Starts a route registration to be completed with
    /// [`RouteBuilder::to`] or [`RouteBuilder::methods`].
    pub fn route(&mut self, path: &str) -> RouteBuilder<'_> {
        RouteBuilder::new(self, path)
    }

    /// Registers `handler` for `event` in the messaging namespace.
    /// A later registration for the same event replaces it.
    pub fn on<H: MessageHandler>(&mut self, event: &str, handler: H) {
        self.handlers.insert(event, handler);
    }

    /// Starts a message handler registration to be completed with
    /// [`HandlerBuilder::to`].
    pub fn handler(&mut self, event: &str) -> HandlerBuilder<'_> {
        HandlerBuilder::new(self, event)
    }

    /// Sends `data` tagged with `event` to every peer in `room` (all peers
    /// if `None`), except `skip`. Fire-and-forget.
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

    /// Returns the placeholder URL of every route, sorted. The static
    /// asset route is never listed.
    #[must_use]
    pub fn routes(&self) -> Vec<String> {
        self.routes.urls()
    }

    /// Injects `pages` into `args` and renders `template`.
    ///
    /// `args` keeps the injected key after the call.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::Template`] if rendering fails.
    pub fn render(&self, template: &str, args: &mut Bindings) -> Result<String, FacadeError> {
        inject_pages(args, &self.routes());
        tracing::debug!(template, bindings = ?args.keys().collect::<Vec<_>>(), "render");
        self.templates.render(template, args)
    }

    /// Returns the composed router: routes, static assets, and the
    /// messaging endpoint.
    ///
    /// Handlers served by this router cannot shut the server down.
    #[must_use]
    pub fn app(&self) -> Router {
        self.build_router(None)
    }

    /// Binds the configured address and serves until shutdown.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::Io`] if binding or serving fails.
    pub async fn run(self) -> Result<(), FacadeError> {
        let listener = TcpListener::bind(self.config.listen_addr).await?;
        self.serve(listener).await
    }

    /// Serves on `listener` until ctrl-c or [`AppState::shutdown`].
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::Io`] if serving fails.
    pub async fn serve(self, listener: TcpListener) -> Result<(), FacadeError> {
        let (hook, requested) = ShutdownHook::new();
        let app = self.build_router(Some(hook));

        tracing::info!(addr = ?listener.local_addr().ok(), "server listening");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(requested))
            .await?;
        tracing::info!("server stopped");
        Ok(())
    }

    fn build_router(&self, shutdown: Option<ShutdownHook>) -> Router {
        let state = AppState::new(
            self.hub.clone(),
            Arc::new(self.handlers.clone()),
            self.templates.clone(),
            self.routes().into(),
            self.config.secret_key.as_str().into(),
            shutdown,
        );

        self.routes
            .to_router()
            .route(SOCKET_IO_NAMESPACE, get(socket_handler))
            .nest_service(STATIC_URL_PATH, ServeDir::new(&self.config.static_dir))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive()),
            )
            .with_state(state)
    }
}

/// Derives an endpoint name from a handler's type: the last path segment
/// of its type name, generics stripped.
fn endpoint_name<H>() -> &'static str {
    let full = std::any::type_name::<H>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use axum::extract::Path;

    use super::*;

    async fn greet(Path(name): Path<String>) -> String {
        format!("Hello, {name}!")
    }

    async fn index() -> &'static str {
        "index"
    }

    fn server() -> WebServer {
        WebServer::new(ServerConfig::with_root(std::env::temp_dir()))
    }

    #[test]
    fn endpoint_name_is_function_name() {
        let mut s = server();
        assert!(s.add_route("/hello/<name>", greet).is_ok());
        assert_eq!(s.endpoints(), vec![("greet", "/hello/<name>")]);
    }

    #[test]
    fn hello_route_is_listed_with_placeholder() {
        let mut s = server();
        assert!(s.add_route("/hello/<name>", greet).is_ok());
        let routes = s.routes();
        assert_eq!(routes.iter().filter(|r| *r == "/hello/[name]").count(), 1);
    }

    #[test]
    fn static_route_is_never_listed() {
        let mut s = server();
        assert!(s.add_route("/", index).is_ok());
        assert!(s.routes().iter().all(|r| !r.starts_with(STATIC_URL_PATH)));
        assert!(!s.routes().contains(&SOCKET_IO_NAMESPACE.to_string()));
    }

    #[test]
    fn unnamed_closures_collide_until_named() {
        let mut s = server();
        assert!(s.add_route("/one", || async { "one" }).is_ok());
        let Err(err) = s.add_route("/two", || async { "two" }) else {
            panic!("second closure should share the endpoint name");
        };
        assert!(matches!(&err, FacadeError::DuplicateEndpoint(name) if name == "{{closure}}"));
        assert!(err.to_string().contains("route(path).name("));

        assert!(s.route("/two").name("two").to(|| async { "two" }).is_ok());
        assert_eq!(s.endpoints(), vec![("{{closure}}", "/one"), ("two", "/two")]);
    }

    #[test]
    fn invalid_route_does_not_mutate() {
        let mut s = server();
        assert!(s.add_route("no-slash", index).is_err());
        assert!(s.add_route("", index).is_err());
        assert!(s.routes().is_empty());
    }

    #[test]
    fn direct_and_builder_forms_are_equivalent() {
        let mut direct = server();
        assert!(direct.add_route("/hello/<name>", greet).is_ok());

        let mut built = server();
        assert!(built.route("/hello/<name>").to(greet).is_ok());

        assert_eq!(direct.routes(), built.routes());
        assert_eq!(direct.endpoints(), built.endpoints());
    }

    #[test]
    fn handler_direct_and_builder_forms_are_equivalent() {
        async fn on_ping(_: crate::ws::Peer, _: serde_json::Value) {}

        let mut direct = server();
        direct.on("ping", on_ping);

        let mut built = server();
        built.handler("ping").to(on_ping);

        assert_eq!(direct.handlers().events(), built.handlers().events());
    }

    #[test]
    fn routes_is_idempotent() {
        let mut s = server();
        assert!(s.add_route("/b", greet).is_ok());
        assert!(s.route("/a").name("a").to(index).is_ok());
        assert_eq!(s.routes(), s.routes());
    }

    #[test]
    fn setup_runs_modules_in_order_and_stops_on_error() {
        fn first(server: &mut WebServer) -> Result<(), FacadeError> {
            server.add_route("/first", index)
        }
        fn broken(server: &mut WebServer) -> Result<(), FacadeError> {
            server.add_route("broken", index)
        }

        let config = ServerConfig::with_root(std::env::temp_dir());
        let Ok(ok) = WebServer::setup(config.clone(), &[first]) else {
            panic!("setup should succeed");
        };
        assert_eq!(ok.routes(), vec!["/first"]);

        let result = WebServer::setup(config, &[first, broken]);
        assert!(matches!(result, Err(FacadeError::InvalidRoute { .. })));
    }

    #[test]
    fn setup_twice_yields_independent_servers() {
        fn one(server: &mut WebServer) -> Result<(), FacadeError> {
            server.add_route("/", index)
        }
        let config = ServerConfig::with_root(std::env::temp_dir());
        let (Ok(a), Ok(b)) = (
            WebServer::setup(config.clone(), &[one]),
            WebServer::setup(config, &[one]),
        ) else {
            panic!("setup should succeed twice");
        };
        assert_eq!(a.routes(), b.routes());
    }

    #[test]
    fn render_injects_pages_into_caller_bindings() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let templates = dir.path().join("templates");
        if std::fs::create_dir_all(&templates).is_err()
            || std::fs::write(
                templates.join("list.txt"),
                "{% for p in pages %}{{ p }};{% endfor %}{{ title }}",
            )
            .is_err()
        {
            panic!("failed to write template");
        }

        let mut s = WebServer::new(ServerConfig::with_root(dir.path()));
        assert!(s.add_route("/hello/<name>", greet).is_ok());
        assert!(s.add_route("/", index).is_ok());

        let mut args = Bindings::new();
        args.insert("title".to_string(), serde_json::json!("T"));
        let Ok(out) = s.render("list.txt", &mut args) else {
            panic!("render failed");
        };
        assert_eq!(out, "/;/hello/[name];T");
        assert_eq!(args.get("pages"), Some(&serde_json::json!(s.routes())));
    }

    #[tokio::test]
    async fn shutdown_outside_serve_is_an_error() {
        let s = server();
        let state = AppState::new(
            s.hub().clone(),
            Arc::new(HandlerTable::new()),
            s.templates.clone(),
            s.routes().into(),
            "k".into(),
            None,
        );
        assert!(matches!(
            state.shutdown(),
            Err(FacadeError::ShutdownUnavailable)
        ));
    }
}
