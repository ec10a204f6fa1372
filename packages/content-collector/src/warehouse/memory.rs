use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use super::Warehouse;
use crate::types::{ContentHash, PageSnapshot};

/// In-memory warehouse for development and tests.
///
/// Injected wherever a `Warehouse` is needed rather than living as global
/// state; rows are append-only like the real store.
#[derive(Default)]
pub struct MemoryWarehouse {
    rows: Mutex<Vec<PageSnapshot>>,
}

impl MemoryWarehouse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Warehouse for MemoryWarehouse {
    async fn append_snapshots(&self, snapshots: &[PageSnapshot]) -> Result<()> {
        self.rows.lock().unwrap().extend_from_slice(snapshots);
        Ok(())
    }

    async fn latest_fingerprint(
        &self,
        competitor_name: &str,
        url: &str,
    ) -> Result<Option<ContentHash>> {
        let rows = self.rows.lock().unwrap();
        // Ties on collected_at resolve to the later insertion.
        Ok(rows
            .iter()
            .enumerate()
            .filter(|(_, s)| s.competitor_name == competitor_name && s.url == url)
            .max_by_key(|(index, s)| (s.collected_at, *index))
            .map(|(_, s)| s.content_hash.clone()))
    }

    async fn query_snapshots(
        &self,
        competitor_name: Option<&str>,
        limit: i64,
    ) -> Result<Vec<PageSnapshot>> {
        let rows = self.rows.lock().unwrap();
        let mut matched: Vec<PageSnapshot> = rows
            .iter()
            .filter(|s| competitor_name.map_or(true, |name| s.competitor_name == name))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.collected_at.cmp(&a.collected_at));
        matched.truncate(limit.max(0) as usize);
        Ok(matched)
    }
}
