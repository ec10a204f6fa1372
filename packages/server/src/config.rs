use std::time::Duration;

use anyhow::{Context, Result};
use content_collector::CollectorConfig;
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string; when absent the server falls back to the
    /// in-memory warehouse.
    pub database_url: Option<String>,
    pub port: u16,
    /// Path to the JSON file with the competitor target list.
    pub targets_file: String,
    pub request_delay_secs: u64,
    pub max_content_length: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok(),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            targets_file: env::var("COMPETITORS_FILE")
                .unwrap_or_else(|_| "competitors.json".to_string()),
            request_delay_secs: env::var("REQUEST_DELAY_SECS")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .context("REQUEST_DELAY_SECS must be a valid number")?,
            max_content_length: env::var("MAX_CONTENT_LENGTH")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()
                .context("MAX_CONTENT_LENGTH must be a valid number")?,
        })
    }

    pub fn collector_config(&self) -> CollectorConfig {
        CollectorConfig::default()
            .with_request_delay(Duration::from_secs(self.request_delay_secs))
            .with_max_content_length(self.max_content_length)
    }
}
