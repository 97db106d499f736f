//! # socsync Server
//!
//! HTTP server exposing the sync engine.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Server Startup                                 │
//! │                                                                         │
//! │  tracing init ──► config load ──► SQLite open + migrate                 │
//! │       │                                  │                              │
//! │       └──────────────► SocApiClient ◄────┘                              │
//! │                              │                                          │
//! │                         SyncEngine                                      │
//! │                              │                                          │
//! │                       axum router + serve                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod error;
mod routes;
mod state;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use socsync_db::{Database, DbConfig};
use socsync_engine::{SocApiClient, SyncConfig, SyncEngine};

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing (RUST_LOG overrides the default level)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting socsync server");

    // Load configuration
    let config = SyncConfig::load(None)?;
    info!(
        base_url = %config.remote.base_url,
        db_path = %config.database.path.display(),
        "Configuration loaded"
    );

    // Open the database (runs migrations)
    let db = Database::new(
        DbConfig::new(&config.database.path).max_connections(config.database.max_connections),
    )
    .await?;
    info!("Database ready");

    // Build the engine
    let client = SocApiClient::from_settings(&config.remote)?;
    let engine = SyncEngine::new(client, db);
    let state = AppState::new(engine);

    // Serve
    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
