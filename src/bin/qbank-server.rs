//! # Question Bank API Server
//!
//! Loads configuration, connects to PostgreSQL, applies migrations when enabled
//! and serves the REST API until Ctrl+C or SIGTERM.
//!
//! ## Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin qbank-server
//!
//! # Run with specific environment
//! QBANK_ENV=production cargo run --bin qbank-server
//! ```

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};

use qbank_core::config::ConfigManager;
use qbank_core::database::{DatabaseConnection, DatabaseMigrations};
use qbank_core::logging;
use qbank_core::web::{create_app, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_structured_logging();

    info!("Starting question bank server");
    info!("   Version: {}", env!("CARGO_PKG_VERSION"));
    info!(
        "   Build Mode: {}",
        if cfg!(debug_assertions) {
            "Debug"
        } else {
            "Release"
        }
    );

    let manager = ConfigManager::load().context("Failed to load configuration")?;
    info!("   Environment: {}", manager.environment());
    let config = manager.into_config();

    let db = DatabaseConnection::connect(&config.database)
        .await
        .context("Failed to connect to database")?;

    if config.database.run_migrations {
        DatabaseMigrations::run_all(db.pool())
            .await
            .context("Failed to run migrations")?;
    }

    let bind_address = config.web.bind_address.clone();
    let state = AppState::new(config, db.pool().clone()).context("Failed to build app state")?;
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;
    info!("   Listening on {}", bind_address);
    info!("   Press Ctrl+C to shutdown gracefully");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
    }

    info!("Shutdown signal received, closing database pool...");
    db.close().await;
    info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C");
        },
        _ = terminate => {
            info!("Received SIGTERM");
        },
    }
}
