//! Server configuration loaded from environment variables.
//!
//! All settings come from environment variables (or a `.env` file via
//! `dotenvy`). Directory defaults are derived from `ROOT_DIR`, so a single
//! variable relocates static assets and templates together.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::FacadeError;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// URL prefix under which static assets are served.
pub const STATIC_URL_PATH: &str = "/public";

/// Top-level server configuration.
///
/// Loaded once at startup via [`ServerConfig::from_env`], or built with
/// [`ServerConfig::with_root`] in tests.
#[derive(Clone)]
pub struct ServerConfig {
    /// Socket address to bind the listener to (e.g. `0.0.0.0:8080`).
    pub listen_addr: SocketAddr,

    /// Root content directory.
    pub root_dir: PathBuf,

    /// Directory served under [`STATIC_URL_PATH`].
    pub static_dir: PathBuf,

    /// Directory templates are loaded from.
    pub template_dir: PathBuf,

    /// Shared secret for signing; never printed.
    pub secret_key: String,

    /// Capacity of the message hub broadcast channel.
    pub message_bus_capacity: usize,
}

impl ServerConfig {
    /// Builds a configuration with every directory under `root`.
    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root_dir = root.into();
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            static_dir: root_dir.join("public"),
            template_dir: root_dir.join("templates"),
            root_dir,
            secret_key: "secret!".to_string(),
            message_bus_capacity: 1024,
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set. Calls
    /// `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::Config`] if `LISTEN_ADDR` or `PORT` is set but
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, FacadeError> {
        dotenvy::dotenv().ok();

        let root_dir = std::env::var("ROOT_DIR").unwrap_or_else(|_| ".".to_string());
        let mut config = Self::with_root(root_dir);

        if let Ok(addr) = std::env::var("LISTEN_ADDR") {
            config.listen_addr = addr
                .parse()
                .map_err(|e| FacadeError::Config(format!("LISTEN_ADDR `{addr}`: {e}")))?;
        }
        if let Ok(port) = std::env::var("PORT") {
            let port: u16 = port
                .parse()
                .map_err(|e| FacadeError::Config(format!("PORT `{port}`: {e}")))?;
            config.listen_addr.set_port(port);
        }
        if let Ok(dir) = std::env::var("TEMPLATE_DIR") {
            config.template_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }
        if let Ok(secret) = std::env::var("SECRET_KEY") {
            config.secret_key = secret;
        }
        config.message_bus_capacity =
            parse_env("MESSAGE_BUS_CAPACITY", config.message_bus_capacity);

        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::with_root(".")
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("listen_addr", &self.listen_addr)
            .field("root_dir", &self.root_dir)
            .field("static_dir", &self.static_dir)
            .field("template_dir", &self.template_dir)
            .field("secret_key", &"<redacted>")
            .field("message_bus_capacity", &self.message_bus_capacity)
            .finish()
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
