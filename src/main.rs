//! portico server entry point.
//!
//! Runs the built-in route modules and serves HTTP and messaging on one
//! listener.

use tracing_subscriber::EnvFilter;

use portico::config::ServerConfig;
use portico::routes;
use portico::server::WebServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = ServerConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, root = %config.root_dir.display(), "starting portico");

    // Register routes and handlers
    let server = WebServer::setup(config, routes::modules())?;
    for url in server.routes() {
        tracing::debug!(url, "route");
    }

    // Serve until shutdown
    server.run().await?;

    Ok(())
}
