use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::types::CompetitorTarget;

/// Default cap on extracted page content, in characters.
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 10_000;

/// Browser-like user agent sent with every fetch.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Tunables for a collection run
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Politeness delay applied after every page attempt.
    pub request_delay: Duration,
    /// Cap on extracted content length, in characters.
    pub max_content_length: usize,
    /// Per-request timeout for page fetches.
    pub fetch_timeout: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            request_delay: Duration::from_secs(1),
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

impl CollectorConfig {
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn with_max_content_length(mut self, max: usize) -> Self {
        self.max_content_length = max;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }
}

/// Load and validate the competitor target list from a JSON file.
///
/// The file is a JSON array of `{name, base_url, target_pages}` objects.
pub fn load_targets(path: impl AsRef<Path>) -> Result<Vec<CompetitorTarget>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read targets file {}", path.display()))?;
    let targets: Vec<CompetitorTarget> = serde_json::from_str(&raw)
        .with_context(|| format!("invalid targets file {}", path.display()))?;
    for target in &targets {
        target.validate()?;
    }
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CollectorConfig::default();
        assert_eq!(config.request_delay, Duration::from_secs(1));
        assert_eq!(config.max_content_length, 10_000);
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_builder() {
        let config = CollectorConfig::default()
            .with_request_delay(Duration::ZERO)
            .with_max_content_length(500);
        assert_eq!(config.request_delay, Duration::ZERO);
        assert_eq!(config.max_content_length, 500);
    }

    #[test]
    fn test_load_targets_rejects_invalid_entries() {
        let dir = std::env::temp_dir().join("collector-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("targets.json");

        std::fs::write(
            &path,
            r#"[{"name": "acme", "base_url": "https://acme.test", "target_pages": ["/pricing"]}]"#,
        )
        .unwrap();
        let targets = load_targets(&path).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].name, "acme");

        std::fs::write(
            &path,
            r#"[{"name": "", "base_url": "https://acme.test", "target_pages": []}]"#,
        )
        .unwrap();
        assert!(load_targets(&path).is_err());
    }
}
