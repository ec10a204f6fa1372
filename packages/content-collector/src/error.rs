use thiserror::Error;

/// Failures the collection pipeline can hit for a single page or batch.
///
/// `Fetch`, `Parse` and `Lookup` are page-level: the orchestrator logs them
/// and moves on to the next page. `Persist` is batch-level and surfaces to
/// the caller of the run.
#[derive(Debug, Error)]
pub enum CollectError {
    /// Network failure, timeout, or non-2xx response.
    #[error("fetch failed for {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Response body could not be read as text.
    #[error("no parseable text content at {url}")]
    Parse { url: String },

    /// Warehouse could not be consulted during change detection.
    /// Fail-closed: the page is skipped, nothing is written.
    #[error("warehouse lookup failed for {url}")]
    Lookup {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    /// Warehouse append failed after a batch completed.
    #[error("warehouse append failed")]
    Persist(#[source] anyhow::Error),
}
