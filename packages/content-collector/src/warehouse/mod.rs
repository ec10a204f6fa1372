use anyhow::Result;
use async_trait::async_trait;

use crate::types::{ContentHash, PageSnapshot};

mod memory;
mod postgres;

pub use memory::MemoryWarehouse;
pub use postgres::PostgresWarehouse;

/// The append-only store of historical snapshots.
///
/// The core only appends rows and reads the latest-hash projection; it never
/// updates or deletes. "Latest" is resolved by the warehouse's own time
/// ordering at query time.
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Append a batch of snapshots to history.
    async fn append_snapshots(&self, snapshots: &[PageSnapshot]) -> Result<()>;

    /// Most recent stored fingerprint for (competitor, url), if any.
    async fn latest_fingerprint(
        &self,
        competitor_name: &str,
        url: &str,
    ) -> Result<Option<ContentHash>>;

    /// Recent snapshots, newest first, optionally filtered by competitor.
    async fn query_snapshots(
        &self,
        competitor_name: Option<&str>,
        limit: i64,
    ) -> Result<Vec<PageSnapshot>>;
}
