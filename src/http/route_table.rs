//! HTTP route table.
//!
//! [`RouteTable`] collects routes during setup and turns them into an
//! [`axum::Router`] once the server is assembled. It rejects the
//! registrations Axum would otherwise panic on: a repeated endpoint name,
//! two paths the router cannot tell apart, and paths that fall under a
//! reserved prefix (static assets, the messaging endpoint).
//!
//! Routes with `int`, `float` or `uuid` captures get a route layer that
//! answers `404 Not Found` when a captured value does not convert.

use std::fmt;
use std::sync::Arc;

use axum::Router;
use axum::extract::{RawPathParams, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::MethodRouter;

use super::route_pattern::{Converter, RoutePattern};
use crate::app_state::AppState;
use crate::error::FacadeError;

/// A registered HTTP route.
pub struct Route {
    /// Validated path pattern.
    pub pattern: RoutePattern,
    /// Endpoint name, unique within the table.
    pub name: String,
    method_router: MethodRouter<AppState>,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern.as_str())
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Reserved path owned by the server itself.
#[derive(Debug, Clone)]
struct Reserved {
    path: String,
    covers_subpaths: bool,
}

impl Reserved {
    fn covers(&self, axum_path: &str) -> bool {
        if axum_path == self.path {
            return true;
        }
        self.covers_subpaths
            && axum_path
                .strip_prefix(self.path.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

/// Ordered collection of HTTP routes.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
    reserved: Vec<Reserved>,
}

impl RouteTable {
    /// Creates an empty table with no reserved paths.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves `path` for the server. With `covers_subpaths`, everything
    /// below it is reserved as well.
    pub fn reserve(&mut self, path: &str, covers_subpaths: bool) {
        self.reserved.push(Reserved {
            path: path.to_string(),
            covers_subpaths,
        });
    }

    /// Adds a route.
    ///
    /// The table is left untouched when an error is returned.
    ///
    /// # Errors
    ///
    /// - [`FacadeError::InvalidRoute`] if `path` does not parse.
    /// - [`FacadeError::DuplicateEndpoint`] if `name` is already taken.
    /// - [`FacadeError::RouteConflict`] if the path collides with a reserved
    ///   path or with an existing route (see [`RoutePattern::conflicts_with`]).
    pub fn insert(
        &mut self,
        path: &str,
        name: &str,
        method_router: MethodRouter<AppState>,
    ) -> Result<(), FacadeError> {
        let pattern = RoutePattern::parse(path)?;

        if self.routes.iter().any(|r| r.name == name) {
            return Err(FacadeError::DuplicateEndpoint(name.to_string()));
        }

        let axum_path = pattern.axum_path();
        if let Some(reserved) = self.reserved.iter().find(|r| r.covers(&axum_path)) {
            return Err(FacadeError::RouteConflict {
                path: path.to_string(),
                existing: reserved.path.clone(),
            });
        }

        if let Some(existing) = self.routes.iter().find(|r| r.pattern.conflicts_with(&pattern)) {
            return Err(FacadeError::RouteConflict {
                path: path.to_string(),
                existing: existing.pattern.to_string(),
            });
        }

        let typed: Arc<[(String, Converter)]> = pattern.typed_captures().into();
        let method_router = if typed.is_empty() {
            method_router
        } else {
            method_router.route_layer(middleware::from_fn_with_state(typed, check_converters))
        };

        tracing::debug!(path, endpoint = name, "route registered");
        self.routes.push(Route {
            pattern,
            name: name.to_string(),
            method_router,
        });
        Ok(())
    }

    /// Returns the placeholder URL of every route, sorted.
    #[must_use]
    pub fn urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = self
            .routes
            .iter()
            .map(|r| r.pattern.placeholder_url())
            .collect();
        urls.sort();
        urls
    }

    /// Returns `(endpoint, path)` pairs in registration order.
    #[must_use]
    pub fn endpoints(&self) -> Vec<(&str, &str)> {
        self.routes
            .iter()
            .map(|r| (r.name.as_str(), r.pattern.as_str()))
            .collect()
    }

    /// Returns the number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no route is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Builds a router holding every route.
    #[must_use]
    pub fn to_router(&self) -> Router<AppState> {
        self.routes.iter().fold(Router::new(), |router, r| {
            router.route(&r.pattern.axum_path(), r.method_router.clone())
        })
    }
}

/// Rejects the request with `404` unless every typed capture converts.
async fn check_converters(
    State(typed): State<Arc<[(String, Converter)]>>,
    params: RawPathParams,
    request: Request,
    next: Next,
) -> Response {
    let rejected = params.iter().find(|(key, value)| {
        typed
            .iter()
            .any(|(name, converter)| name.as_str() == *key && !converter.accepts(value))
    });
    if let Some((key, value)) = rejected {
        tracing::debug!(capture = key, value, "path capture does not convert");
        return StatusCode::NOT_FOUND.into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use axum::routing::get;

    use super::*;

    async fn ok() -> &'static str {
        "ok"
    }

    fn table() -> RouteTable {
        let mut table = RouteTable::new();
        table.reserve("/public", true);
        table.reserve("/socketio", false);
        table
    }

    #[test]
    fn urls_are_sorted_placeholders() {
        let mut t = table();
        assert!(t.insert("/zeta", "zeta", get(ok)).is_ok());
        assert!(t.insert("/hello/<name>", "greet", get(ok)).is_ok());
        assert!(t.insert("/", "index", get(ok)).is_ok());
        assert_eq!(t.urls(), vec!["/", "/hello/[name]", "/zeta"]);
    }

    #[test]
    fn duplicate_endpoint_is_rejected() {
        let mut t = table();
        assert!(t.insert("/a", "same", get(ok)).is_ok());
        let err = t.insert("/b", "same", get(ok));
        assert!(matches!(err, Err(FacadeError::DuplicateEndpoint(_))));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn same_matching_path_is_rejected() {
        let mut t = table();
        assert!(t.insert("/items/<id>", "one", get(ok)).is_ok());
        let err = t.insert("/items/{other}", "two", get(ok));
        assert!(matches!(err, Err(FacadeError::RouteConflict { .. })));
        assert_eq!(t.urls(), vec!["/items/[id]"]);
    }

    #[test]
    fn catch_all_beside_capture_is_rejected() {
        let mut t = table();
        assert!(t.insert("/a/<x>", "one", get(ok)).is_ok());
        let err = t.insert("/a/<path:rest>", "two", get(ok));
        assert!(matches!(
            err,
            Err(FacadeError::RouteConflict { ref existing, .. }) if existing == "/a/<x>"
        ));
        assert!(t.insert("/a/<y>/deeper", "three", get(ok)).is_err());
        assert!(t.insert("/a/fixed", "four", get(ok)).is_ok());
        assert_eq!(t.len(), 2);
        let _router = t.to_router();
    }

    #[test]
    fn reserved_paths_are_rejected() {
        let mut t = table();
        assert!(t.insert("/public", "a", get(ok)).is_err());
        assert!(t.insert("/public/app.js", "b", get(ok)).is_err());
        assert!(t.insert("/socketio", "c", get(ok)).is_err());
        assert!(t.insert("/publication", "d", get(ok)).is_ok());
        assert!(t.insert("/socketio/info", "e", get(ok)).is_ok());
    }

    #[test]
    fn invalid_path_leaves_table_untouched() {
        let mut t = table();
        assert!(t.insert("", "empty", get(ok)).is_err());
        assert!(t.insert("relative", "relative", get(ok)).is_err());
        assert!(t.is_empty());
    }

    #[test]
    fn endpoints_keep_registration_order() {
        let mut t = table();
        assert!(t.insert("/b", "second", get(ok)).is_ok());
        assert!(t.insert("/a", "first", get(ok)).is_ok());
        assert_eq!(t.endpoints(), vec![("second", "/b"), ("first", "/a")]);
    }
}
