pub mod collect;
pub mod config;
pub mod detector;
pub mod error;
pub mod fetcher;
pub mod normalizer;
pub mod run;
pub mod types;
pub mod warehouse;

// Re-exports for clean API
pub use collect::collect;
pub use config::{load_targets, CollectorConfig};
pub use detector::{classify, Change};
pub use error::CollectError;
pub use fetcher::{HttpFetcher, PageFetcher, RawPage};
pub use normalizer::{normalize, NormalizedPage};
pub use run::{run_collection, RunSummary};
pub use types::{CompetitorTarget, ContentHash, PageSnapshot, SnapshotId};
pub use warehouse::{MemoryWarehouse, PostgresWarehouse, Warehouse};
