use crate::error::CollectError;
use crate::types::ContentHash;
use crate::warehouse::Warehouse;

/// Result of comparing a new fingerprint against warehouse history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    New,
    Unchanged,
}

/// Decide whether a freshly computed fingerprint is new for (competitor, url).
///
/// First-ever collections and differing fingerprints are `New`; a matching
/// fingerprint is `Unchanged` and the snapshot is discarded by the caller.
/// A failed lookup is fail-closed: the error propagates and the page is
/// skipped without writing anything.
pub async fn classify(
    warehouse: &(impl Warehouse + ?Sized),
    competitor_name: &str,
    url: &str,
    new_hash: &ContentHash,
) -> Result<Change, CollectError> {
    let previous = warehouse
        .latest_fingerprint(competitor_name, url)
        .await
        .map_err(|source| CollectError::Lookup {
            url: url.to_string(),
            source,
        })?;

    match previous {
        Some(ref known) if known == new_hash => Ok(Change::Unchanged),
        Some(_) => Ok(Change::New),
        None => Ok(Change::New),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::NormalizedPage;
    use crate::types::PageSnapshot;
    use crate::warehouse::MemoryWarehouse;
    use anyhow::Result;
    use async_trait::async_trait;

    fn snapshot(content: &str) -> PageSnapshot {
        PageSnapshot::new(
            "acme".to_string(),
            "https://acme.test/pricing".to_string(),
            NormalizedPage {
                title: "Pricing".to_string(),
                content: content.to_string(),
                meta_description: String::new(),
            },
        )
    }

    #[tokio::test]
    async fn test_first_collection_is_new() {
        let warehouse = MemoryWarehouse::new();
        let hash = ContentHash::from_parts("Pricing", "v1");
        let change = classify(&warehouse, "acme", "https://acme.test/pricing", &hash)
            .await
            .unwrap();
        assert_eq!(change, Change::New);
    }

    #[tokio::test]
    async fn test_matching_fingerprint_is_unchanged_and_differing_is_new() {
        let warehouse = MemoryWarehouse::new();
        let stored = snapshot("v1");
        warehouse.append_snapshots(&[stored.clone()]).await.unwrap();

        let same = classify(
            &warehouse,
            "acme",
            "https://acme.test/pricing",
            &stored.content_hash,
        )
        .await
        .unwrap();
        assert_eq!(same, Change::Unchanged);

        let differing = ContentHash::from_parts("Pricing", "v2");
        let changed = classify(&warehouse, "acme", "https://acme.test/pricing", &differing)
            .await
            .unwrap();
        assert_eq!(changed, Change::New);
    }

    struct FailingWarehouse;

    #[async_trait]
    impl Warehouse for FailingWarehouse {
        async fn append_snapshots(&self, _snapshots: &[PageSnapshot]) -> Result<()> {
            anyhow::bail!("warehouse down")
        }

        async fn latest_fingerprint(
            &self,
            _competitor_name: &str,
            _url: &str,
        ) -> Result<Option<ContentHash>> {
            anyhow::bail!("warehouse down")
        }

        async fn query_snapshots(
            &self,
            _competitor_name: Option<&str>,
            _limit: i64,
        ) -> Result<Vec<PageSnapshot>> {
            anyhow::bail!("warehouse down")
        }
    }

    #[tokio::test]
    async fn test_lookup_failure_propagates_as_lookup_error() {
        let hash = ContentHash::from_parts("Pricing", "v1");
        let err = classify(&FailingWarehouse, "acme", "https://acme.test/pricing", &hash)
            .await
            .unwrap_err();
        assert!(matches!(err, CollectError::Lookup { .. }));
    }
}
