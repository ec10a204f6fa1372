// Main entry point for the monitoring API server

use std::sync::Arc;

use anyhow::{Context, Result};
use content_collector::{load_targets, HttpFetcher};
use server::{build_app, build_warehouse, AppState, Config};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,server=debug,content_collector=debug,sqlx=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting competitor content monitor");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    let targets =
        load_targets(&config.targets_file).context("Failed to load competitor targets")?;
    tracing::info!(competitors = targets.len(), "Competitor targets loaded");

    let warehouse = build_warehouse(&config).await?;
    let collector_config = config.collector_config();
    let fetcher = Arc::new(HttpFetcher::new(&collector_config)?);

    // Ctrl-C cancels in-flight collection runs between pages and stops the
    // server gracefully.
    let shutdown = CancellationToken::new();
    let shutdown_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown requested");
            shutdown_signal.cancel();
        }
    });

    let state = AppState {
        warehouse,
        fetcher,
        targets: Arc::new(targets),
        collector_config: Arc::new(collector_config),
        shutdown: shutdown.clone(),
    };
    let app = build_app(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .context("Server error")?;

    Ok(())
}
