//! Façade error types with HTTP status code mapping.
//!
//! [`FacadeError`] is the central error type for the crate. Registration
//! errors are returned synchronously to the caller; when a handler returns
//! one, it maps to a structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 3002,
///     "message": "not running with a server that supports shutdown",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Error enum shared by registration, rendering and serving.
///
/// # Error Code Ranges
///
/// | Range     | Category     | HTTP Status               |
/// |-----------|--------------|---------------------------|
/// | 1000–1999 | Usage/Config | 400 Bad Request           |
/// | 3000–3999 | Server       | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum FacadeError {
    /// Route path is empty, relative, or has malformed placeholders.
    #[error("invalid route `{path}`: {reason}")]
    InvalidRoute {
        /// The rejected path.
        path: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Another route is already registered under this endpoint name.
    #[error("endpoint `{0}` is already registered; name the route with `route(path).name(..)`")]
    DuplicateEndpoint(String),

    /// The path collides with an existing route or a reserved prefix.
    #[error("route `{path}` conflicts with `{existing}`")]
    RouteConflict {
        /// The rejected path.
        path: String,
        /// The route or reserved prefix it collides with.
        existing: String,
    },

    /// Configuration value could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Shutdown was requested outside a running server.
    #[error("not running with a server that supports shutdown")]
    ShutdownUnavailable,

    /// I/O failure while binding or serving.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Template lookup or rendering failed.
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Payload could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FacadeError {
    /// Builds an [`FacadeError::InvalidRoute`] for `path`.
    pub(crate) fn invalid_route(path: &str, reason: impl Into<String>) -> Self {
        Self::InvalidRoute {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRoute { .. } => 1001,
            Self::DuplicateEndpoint(_) => 1002,
            Self::RouteConflict { .. } => 1003,
            Self::Config(_) => 1004,
            Self::Io(_) => 3001,
            Self::ShutdownUnavailable => 3002,
            Self::Template(_) => 3003,
            Self::Serialization(_) => 3004,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRoute { .. }
            | Self::DuplicateEndpoint(_)
            | Self::RouteConflict { .. }
            | Self::Config(_) => StatusCode::BAD_REQUEST,
            Self::Io(_)
            | Self::ShutdownUnavailable
            | Self::Template(_)
            | Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for FacadeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
