use anyhow::Result;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;

use portal_api::app::{create_app, AppState};
use portal_api::config::Config;
use portal_api::jobs::{ExpiryReminderJob, JobScheduler};
use portal_api::middleware::{init_metrics, logging::init_logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    init_logging(&config.logging);

    info!("Starting portal API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the Prometheus recorder before any metric is touched
    init_metrics();

    // Create database pool
    let pool = persistence::db::create_pool(&config.database.pool_config()).await?;

    // Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    let state = AppState::new(config, pool.clone());

    // Background jobs: the daily subscription expiry sweep
    let mut scheduler = JobScheduler::new();
    scheduler.register(ExpiryReminderJob::new(
        pool,
        state.dispatcher.clone(),
        &state.config.jobs,
    ));
    scheduler.start();

    // Build application
    let app = create_app(state.clone());

    // Start server. ConnectInfo feeds the per-IP rate limiter.
    let addr = state.config.socket_addr();
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    scheduler.shutdown();
    scheduler.wait_for_shutdown(Duration::from_secs(10)).await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
