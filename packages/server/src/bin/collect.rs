// One-shot collection run over all configured competitors

use anyhow::{Context, Result};
use content_collector::{load_targets, run_collection, HttpFetcher};
use server::{build_warehouse, Config};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,server=debug,content_collector=debug,sqlx=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    let targets =
        load_targets(&config.targets_file).context("Failed to load competitor targets")?;
    tracing::info!(competitors = targets.len(), "Starting one-shot collection");

    let warehouse = build_warehouse(&config).await?;
    let collector_config = config.collector_config();
    let fetcher = HttpFetcher::new(&collector_config)?;

    let cancel = CancellationToken::new();
    let cancel_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Cancellation requested");
            cancel_signal.cancel();
        }
    });

    let summary = run_collection(
        &targets,
        &fetcher,
        warehouse.as_ref(),
        &collector_config,
        &cancel,
    )
    .await
    .context("Collection run failed")?;

    tracing::info!(
        competitors = summary.competitors,
        pages_collected = summary.pages_collected,
        "Collection run complete"
    );

    Ok(())
}
