//! Application setup and shared state.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use content_collector::{CollectorConfig, CompetitorTarget, HttpFetcher, Warehouse};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::routes::{health_handler, list_competitors, list_snapshots, run_collections};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub warehouse: Arc<dyn Warehouse>,
    pub fetcher: Arc<HttpFetcher>,
    pub targets: Arc<Vec<CompetitorTarget>>,
    pub collector_config: Arc<CollectorConfig>,
    /// Cancelled on shutdown; collection runs stop between pages.
    pub shutdown: CancellationToken,
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/competitors", get(list_competitors))
        .route("/collections/run", post(run_collections))
        .route("/snapshots", get(list_snapshots))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
