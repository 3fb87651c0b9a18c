use anyhow::{Context, Result};
use fitness_tracker::config::Config;
use fitness_tracker::db::Database;
use fitness_tracker::i18n::CatalogMetrics;
use fitness_tracker::logging;
use fitness_tracker::routes::{self, AppState};
use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging (stdout, plus errors in logs/error.log)
    let _log_guard = logging::init("fitness_tracker=info")?;

    info!("Starting fitness tracker API");

    // Load configuration from environment
    let config = Config::from_env()?;

    let db = Database::connect(&config.database_url).await?;
    db.ensure_schema().await?;
    db.create_search_indexes().await;

    let app = routes::router(AppState::new(db, &config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server started at port {}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    let catalog = CatalogMetrics::global().report();
    info!(
        hits = catalog.hits,
        misses = catalog.misses,
        hit_rate = catalog.hit_rate,
        "Translation catalog usage"
    );
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
