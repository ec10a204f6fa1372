mod collections;
mod competitors;
mod health;
mod snapshots;

pub use collections::{run_collections, RunRequest, RunResponse};
pub use competitors::list_competitors;
pub use health::health_handler;
pub use snapshots::{list_snapshots, SnapshotResponse};
