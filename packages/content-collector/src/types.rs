use anyhow::{ensure, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use url::Url;
use uuid::Uuid;

use crate::normalizer::NormalizedPage;

/// Unique identifier for a page snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnapshotId(pub Uuid);

impl SnapshotId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for SnapshotId {
    fn default() -> Self {
        Self::new()
    }
}

/// Content fingerprint used for change detection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub Vec<u8>);

impl ContentHash {
    /// Hash a page's title and content.
    ///
    /// The digest is a function of (title, content) only; URL, competitor and
    /// collection time never feed into it, so identical content collected at
    /// different times compares equal. The separator byte keeps
    /// ("ab", "c") and ("a", "bc") distinct.
    pub fn from_parts(title: &str, content: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(title.as_bytes());
        hasher.update([0x1f]);
        hasher.update(content.as_bytes());
        Self(hasher.finalize().to_vec())
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

/// An immutable observation of one URL at one point in time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub id: SnapshotId,
    pub competitor_name: String,
    pub url: String,
    pub page_title: String,
    pub content: String,
    pub meta_description: String,
    pub content_hash: ContentHash,
    pub collected_at: DateTime<Utc>,
}

impl PageSnapshot {
    pub fn new(competitor_name: String, url: String, page: NormalizedPage) -> Self {
        let content_hash = ContentHash::from_parts(&page.title, &page.content);
        Self {
            id: SnapshotId::new(),
            competitor_name,
            url,
            page_title: page.title,
            content: page.content,
            meta_description: page.meta_description,
            content_hash,
            collected_at: Utc::now(),
        }
    }
}

/// A competitor site to monitor: a base URL plus the page paths to watch.
///
/// Loaded from static configuration before a run and read-only during it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorTarget {
    pub name: String,
    pub base_url: String,
    pub target_pages: Vec<String>,
}

impl CompetitorTarget {
    pub fn new(name: String, base_url: String, target_pages: Vec<String>) -> Result<Self> {
        let target = Self {
            name,
            base_url,
            target_pages,
        };
        target.validate()?;
        Ok(target)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.name.trim().is_empty(), "competitor name is empty");
        let url = Url::parse(&self.base_url)
            .with_context(|| format!("invalid base URL for {}: {}", self.name, self.base_url))?;
        ensure!(
            url.scheme() == "http" || url.scheme() == "https",
            "base URL for {} must be http(s): {}",
            self.name,
            self.base_url
        );
        Ok(())
    }

    /// Join the base URL and a page path with exactly one separating slash.
    pub fn page_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
