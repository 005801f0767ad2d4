//! # Storefront API
//!
//! HTTP server entry point.
//!
//! ```text
//! .env ──► Settings ──► Database::new ──► health check ──► axum::serve
//!                                                              │
//!                                      Ctrl-C / SIGTERM ───────┘ graceful shutdown
//! ```

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use storefront_api::{router, AppState, Settings};
use storefront_db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the process environment still applies.
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Storefront API server...");

    let settings = Settings::load().context("failed to load configuration")?;
    info!(
        engine = %settings.database.engine,
        host = %settings.database.host,
        address = %settings.address,
        "Configuration loaded"
    );

    let db = Database::new(settings.database.clone())
        .await
        .context("failed to connect to database")?;
    if !db.health_check().await {
        anyhow::bail!("database is not answering queries");
    }
    info!("Connected to database");

    let app = router(AppState::new(db.clone()), settings.request_timeout);

    let listener = tokio::net::TcpListener::bind(&settings.address)
        .await
        .with_context(|| format!("failed to bind {}", settings.address))?;
    info!(address = %listener.local_addr()?, "Server is running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
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

    info!("Shutdown signal received, starting graceful shutdown...");
}
