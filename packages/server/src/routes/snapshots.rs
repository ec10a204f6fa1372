use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use content_collector::PageSnapshot;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::AppState;

#[derive(Debug, Deserialize)]
pub struct SnapshotsQuery {
    pub competitor: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub id: Uuid,
    pub competitor_name: String,
    pub url: String,
    pub page_title: String,
    pub meta_description: String,
    pub content: String,
    pub content_hash: String,
    pub collected_at: DateTime<Utc>,
}

impl From<PageSnapshot> for SnapshotResponse {
    fn from(snapshot: PageSnapshot) -> Self {
        Self {
            id: snapshot.id.0,
            competitor_name: snapshot.competitor_name,
            url: snapshot.url,
            page_title: snapshot.page_title,
            meta_description: snapshot.meta_description,
            content: snapshot.content,
            content_hash: snapshot.content_hash.to_hex(),
            collected_at: snapshot.collected_at,
        }
    }
}

/// Recent snapshots from the warehouse, newest first
pub async fn list_snapshots(
    Extension(state): Extension<AppState>,
    Query(params): Query<SnapshotsQuery>,
) -> Response {
    let limit = params.limit.unwrap_or(100).clamp(1, 500);

    match state
        .warehouse
        .query_snapshots(params.competitor.as_deref(), limit)
        .await
    {
        Ok(snapshots) => {
            let body: Vec<SnapshotResponse> =
                snapshots.into_iter().map(SnapshotResponse::from).collect();
            Json(body).into_response()
        }
        Err(error) => {
            tracing::error!(error = %error, "Snapshot query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "snapshot query failed"})),
            )
                .into_response()
        }
    }
}
