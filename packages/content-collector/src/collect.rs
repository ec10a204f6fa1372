use tokio_util::sync::CancellationToken;

use crate::config::CollectorConfig;
use crate::detector::{classify, Change};
use crate::error::CollectError;
use crate::fetcher::PageFetcher;
use crate::normalizer::normalize;
use crate::types::{CompetitorTarget, PageSnapshot};
use crate::warehouse::Warehouse;

/// Collect one competitor's target pages and return the changed snapshots.
///
/// Pages are fetched sequentially in configured order with a politeness delay
/// after every attempt, including the last. Per-page failures are logged and
/// skipped; one failing page never aborts the batch. Unchanged pages are
/// discarded. Nothing is written to the warehouse here; the caller appends
/// the combined results after all competitors ran.
pub async fn collect(
    target: &CompetitorTarget,
    fetcher: &(impl PageFetcher + ?Sized),
    warehouse: &(impl Warehouse + ?Sized),
    config: &CollectorConfig,
    cancel: &CancellationToken,
) -> Vec<PageSnapshot> {
    tracing::info!(
        competitor = %target.name,
        pages = target.target_pages.len(),
        "Starting collection"
    );

    let mut changed = Vec::new();
    let mut unchanged = 0usize;
    let mut failed = 0usize;

    for path in &target.target_pages {
        if cancel.is_cancelled() {
            tracing::warn!(competitor = %target.name, "Collection cancelled");
            break;
        }

        let url = target.page_url(path);
        match collect_page(target, &url, fetcher, warehouse, config).await {
            Ok(Some(snapshot)) => {
                tracing::info!(
                    url = %url,
                    content_hash = %snapshot.content_hash.to_hex(),
                    "New content version"
                );
                changed.push(snapshot);
            }
            Ok(None) => {
                tracing::info!(url = %url, "Content unchanged");
                unchanged += 1;
            }
            Err(error) => {
                tracing::warn!(url = %url, error = %error, "Page collection failed");
                failed += 1;
            }
        }

        // Politeness delay after every attempt, raced against cancellation so
        // shutdown does not wait out the sleep.
        tokio::select! {
            _ = tokio::time::sleep(config.request_delay) => {}
            _ = cancel.cancelled() => break,
        }
    }

    tracing::info!(
        competitor = %target.name,
        new = changed.len(),
        unchanged = unchanged,
        failed = failed,
        "Collection completed"
    );

    changed
}

/// Fetch, normalize, fingerprint and classify a single page.
async fn collect_page(
    target: &CompetitorTarget,
    url: &str,
    fetcher: &(impl PageFetcher + ?Sized),
    warehouse: &(impl Warehouse + ?Sized),
    config: &CollectorConfig,
) -> Result<Option<PageSnapshot>, CollectError> {
    let raw = fetcher.fetch(url).await?;
    let page = normalize(&raw.html, config.max_content_length);
    // The snapshot is keyed by the request URL, the same key the fingerprint
    // lookup below uses; future lookups must find this row.
    let snapshot = PageSnapshot::new(target.name.clone(), url.to_string(), page);

    match classify(warehouse, &target.name, url, &snapshot.content_hash).await? {
        Change::New => Ok(Some(snapshot)),
        Change::Unchanged => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warehouse::MemoryWarehouse;
    use std::collections::HashMap;
    use std::time::Duration;

    /// Serves canned HTML per URL; unknown URLs fail the fetch.
    struct MockFetcher {
        pages: HashMap<String, String>,
    }

    impl MockFetcher {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(url, html)| (url.to_string(), html.to_string()))
                    .collect(),
            }
        }
    }

    #[async_trait::async_trait]
    impl PageFetcher for MockFetcher {
        async fn fetch(&self, url: &str) -> Result<crate::fetcher::RawPage, CollectError> {
            match self.pages.get(url) {
                Some(html) => Ok(crate::fetcher::RawPage { html: html.clone() }),
                None => Err(CollectError::Parse {
                    url: url.to_string(),
                }),
            }
        }
    }

    /// Fingerprint lookups fail for one URL and succeed everywhere else.
    struct FlakyLookupWarehouse {
        inner: MemoryWarehouse,
        failing_url: String,
    }

    #[async_trait::async_trait]
    impl Warehouse for FlakyLookupWarehouse {
        async fn append_snapshots(&self, snapshots: &[PageSnapshot]) -> anyhow::Result<()> {
            self.inner.append_snapshots(snapshots).await
        }

        async fn latest_fingerprint(
            &self,
            competitor_name: &str,
            url: &str,
        ) -> anyhow::Result<Option<crate::types::ContentHash>> {
            if url == self.failing_url {
                anyhow::bail!("fingerprint read failed")
            }
            self.inner.latest_fingerprint(competitor_name, url).await
        }

        async fn query_snapshots(
            &self,
            competitor_name: Option<&str>,
            limit: i64,
        ) -> anyhow::Result<Vec<PageSnapshot>> {
            self.inner.query_snapshots(competitor_name, limit).await
        }
    }

    fn target(pages: &[&str]) -> CompetitorTarget {
        CompetitorTarget::new(
            "acme".to_string(),
            "https://acme.test".to_string(),
            pages.iter().map(|p| p.to_string()).collect(),
        )
        .unwrap()
    }

    fn quick_config() -> CollectorConfig {
        CollectorConfig::default().with_request_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_partial_failure_does_not_abort_the_batch() {
        let fetcher = MockFetcher::new(&[
            ("https://acme.test/a", "<html><body>alpha</body></html>"),
            // /b intentionally missing so its fetch fails
            ("https://acme.test/c", "<html><body>gamma</body></html>"),
        ]);
        let warehouse = MemoryWarehouse::new();
        let cancel = CancellationToken::new();

        let snapshots = collect(
            &target(&["/a", "/b", "/c"]),
            &fetcher,
            &warehouse,
            &quick_config(),
            &cancel,
        )
        .await;

        let urls: Vec<&str> = snapshots.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls, vec!["https://acme.test/a", "https://acme.test/c"]);
    }

    #[tokio::test]
    async fn test_dedup_across_collections() {
        let warehouse = MemoryWarehouse::new();
        let cancel = CancellationToken::new();
        let config = quick_config();
        let pricing = target(&["/pricing"]);

        // First collection: first-ever observation is new.
        let v1 = MockFetcher::new(&[(
            "https://acme.test/pricing",
            "<html><head><title>Pricing</title></head><body>Plans start at $10</body></html>",
        )]);
        let first = collect(&pricing, &v1, &warehouse, &config, &cancel).await;
        assert_eq!(first.len(), 1);
        let first_hash = first[0].content_hash.clone();
        warehouse.append_snapshots(&first).await.unwrap();

        // Second collection with identical content: unchanged, nothing returned.
        let second = collect(&pricing, &v1, &warehouse, &config, &cancel).await;
        assert!(second.is_empty());

        // Third collection with changed body: new again, different hash.
        let v2 = MockFetcher::new(&[(
            "https://acme.test/pricing",
            "<html><head><title>Pricing</title></head><body>Plans start at $12</body></html>",
        )]);
        let third = collect(&pricing, &v2, &warehouse, &config, &cancel).await;
        assert_eq!(third.len(), 1);
        assert_ne!(third[0].content_hash, first_hash);
    }

    #[tokio::test]
    async fn test_lookup_failure_skips_page_and_stores_nothing() {
        let fetcher = MockFetcher::new(&[
            ("https://acme.test/a", "<html><body>alpha</body></html>"),
            ("https://acme.test/b", "<html><body>beta</body></html>"),
        ]);
        let warehouse = FlakyLookupWarehouse {
            inner: MemoryWarehouse::new(),
            failing_url: "https://acme.test/a".to_string(),
        };
        let cancel = CancellationToken::new();

        let snapshots = collect(
            &target(&["/a", "/b"]),
            &fetcher,
            &warehouse,
            &quick_config(),
            &cancel,
        )
        .await;

        // The page whose lookup failed is skipped entirely; the other page
        // still collects and nothing was written on its behalf.
        let urls: Vec<&str> = snapshots.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls, vec!["https://acme.test/b"]);
        assert!(warehouse.inner.is_empty());
    }

    #[tokio::test]
    async fn test_cancellation_stops_between_pages() {
        let fetcher = MockFetcher::new(&[
            ("https://acme.test/a", "<html><body>alpha</body></html>"),
            ("https://acme.test/b", "<html><body>beta</body></html>"),
        ]);
        let warehouse = MemoryWarehouse::new();

        let cancelled = CancellationToken::new();
        cancelled.cancel();
        let none = collect(
            &target(&["/a", "/b"]),
            &fetcher,
            &warehouse,
            &quick_config(),
            &cancelled,
        )
        .await;
        assert!(none.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_applies_after_every_page_including_the_last() {
        let fetcher = MockFetcher::new(&[
            ("https://acme.test/a", "<html><body>alpha</body></html>"),
            ("https://acme.test/b", "<html><body>beta</body></html>"),
        ]);
        let warehouse = MemoryWarehouse::new();
        let cancel = CancellationToken::new();
        let config = CollectorConfig::default().with_request_delay(Duration::from_secs(1));

        let start = tokio::time::Instant::now();
        let snapshots = collect(&target(&["/a", "/b"]), &fetcher, &warehouse, &config, &cancel).await;

        assert_eq!(snapshots.len(), 2);
        assert!(start.elapsed() >= Duration::from_secs(2));
    }
}
