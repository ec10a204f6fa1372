use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::collect::collect;
use crate::config::CollectorConfig;
use crate::error::CollectError;
use crate::fetcher::PageFetcher;
use crate::types::CompetitorTarget;
use crate::warehouse::Warehouse;

/// Outcome of one collection run across all competitors
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub competitors: usize,
    pub pages_collected: usize,
}

/// Run a full collection: every competitor in turn, then one combined append.
///
/// A run always completes; failing pages or competitors only shrink the
/// result. The single batch-level failure is the warehouse append, surfaced
/// as `CollectError::Persist` with the detected snapshots dropped (retrying
/// is the caller's choice).
pub async fn run_collection(
    targets: &[CompetitorTarget],
    fetcher: &(impl PageFetcher + ?Sized),
    warehouse: &(impl Warehouse + ?Sized),
    config: &CollectorConfig,
    cancel: &CancellationToken,
) -> Result<RunSummary, CollectError> {
    tracing::info!(competitors = targets.len(), "Starting collection run");

    let mut all = Vec::new();
    for target in targets {
        if cancel.is_cancelled() {
            tracing::warn!("Collection run cancelled");
            break;
        }
        let changed = collect(target, fetcher, warehouse, config, cancel).await;
        tracing::info!(
            competitor = %target.name,
            new_pages = changed.len(),
            "Competitor collection finished"
        );
        all.extend(changed);
    }

    if all.is_empty() {
        tracing::info!("No new content to store");
    } else {
        warehouse
            .append_snapshots(&all)
            .await
            .map_err(CollectError::Persist)?;
        tracing::info!(rows = all.len(), "Stored new snapshots");
    }

    Ok(RunSummary {
        competitors: targets.len(),
        pages_collected: all.len(),
    })
}
