use axum::{extract::Extension, http::StatusCode, Json};
use content_collector::{run_collection, CompetitorTarget};
use serde::{Deserialize, Serialize};

use crate::app::AppState;

#[derive(Debug, Deserialize)]
pub struct RunRequest {
    /// Restrict the run to one configured competitor.
    pub competitor: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub status: String,
    pub competitors: usize,
    pub pages_collected: usize,
}

/// Trigger a collection run over the configured competitors.
///
/// The run itself never fails on individual pages; only a warehouse append
/// failure turns into a 502 so the caller knows the detected snapshots were
/// not stored and may re-trigger the run.
pub async fn run_collections(
    Extension(state): Extension<AppState>,
    body: Option<Json<RunRequest>>,
) -> (StatusCode, Json<RunResponse>) {
    let filter = body.and_then(|Json(request)| request.competitor);

    let selected: Vec<CompetitorTarget> = match &filter {
        Some(name) => state
            .targets
            .iter()
            .filter(|t| &t.name == name)
            .cloned()
            .collect(),
        None => state.targets.as_ref().clone(),
    };

    if filter.is_some() && selected.is_empty() {
        return (
            StatusCode::NOT_FOUND,
            Json(RunResponse {
                status: "unknown competitor".to_string(),
                competitors: 0,
                pages_collected: 0,
            }),
        );
    }

    match run_collection(
        &selected,
        state.fetcher.as_ref(),
        state.warehouse.as_ref(),
        &state.collector_config,
        &state.shutdown,
    )
    .await
    {
        Ok(summary) => (
            StatusCode::OK,
            Json(RunResponse {
                status: "success".to_string(),
                competitors: summary.competitors,
                pages_collected: summary.pages_collected,
            }),
        ),
        Err(error) => {
            tracing::error!(error = %error, "Collection run failed to persist");
            (
                StatusCode::BAD_GATEWAY,
                Json(RunResponse {
                    status: "failed".to_string(),
                    competitors: selected.len(),
                    pages_collected: 0,
                }),
            )
        }
    }
}
