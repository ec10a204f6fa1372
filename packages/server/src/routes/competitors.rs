use axum::{extract::Extension, Json};
use content_collector::CompetitorTarget;

use crate::app::AppState;

/// List the configured competitor targets
pub async fn list_competitors(
    Extension(state): Extension<AppState>,
) -> Json<Vec<CompetitorTarget>> {
    Json(state.targets.as_ref().clone())
}
