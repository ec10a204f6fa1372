use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    warehouse: WarehouseHealth,
}

#[derive(Serialize)]
pub struct WarehouseHealth {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint
///
/// Probes the warehouse with a one-row query. Returns 200 OK when reachable,
/// 503 Service Unavailable otherwise.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let warehouse = match state.warehouse.query_snapshots(None, 1).await {
        Ok(_) => WarehouseHealth {
            status: "ok".to_string(),
            error: None,
        },
        Err(e) => WarehouseHealth {
            status: "error".to_string(),
            error: Some(e.to_string()),
        },
    };

    let healthy = warehouse.status == "ok";
    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(HealthResponse {
            status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
            warehouse,
        }),
    )
}
