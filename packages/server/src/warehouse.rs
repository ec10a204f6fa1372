use std::sync::Arc;

use anyhow::{Context, Result};
use content_collector::{MemoryWarehouse, PostgresWarehouse, Warehouse};
use sqlx::postgres::PgPoolOptions;

use crate::config::Config;

/// Build the warehouse backend from configuration.
///
/// With `DATABASE_URL` set this connects to Postgres and applies migrations;
/// without it the in-memory warehouse is used, which is fine for development
/// but loses history on restart.
pub async fn build_warehouse(config: &Config) -> Result<Arc<dyn Warehouse>> {
    match &config.database_url {
        Some(url) => {
            tracing::info!("Connecting to warehouse database...");
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(url)
                .await
                .context("Failed to connect to database")?;

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;
            tracing::info!("Warehouse database ready");

            Ok(Arc::new(PostgresWarehouse::new(pool)))
        }
        None => {
            tracing::warn!(
                "DATABASE_URL not set, using in-memory warehouse (history is lost on restart)"
            );
            Ok(Arc::new(MemoryWarehouse::new()))
        }
    }
}
