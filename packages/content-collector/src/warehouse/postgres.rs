use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::Warehouse;
use crate::types::{ContentHash, PageSnapshot, SnapshotId};

/// Postgres-backed warehouse over the `page_snapshots` table.
pub struct PostgresWarehouse {
    pool: PgPool,
}

impl PostgresWarehouse {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn snapshot_from_row(row: &PgRow) -> PageSnapshot {
    PageSnapshot {
        id: SnapshotId(row.get("id")),
        competitor_name: row.get("competitor_name"),
        url: row.get("url"),
        page_title: row.get("page_title"),
        content: row.get("content"),
        meta_description: row.get("meta_description"),
        content_hash: ContentHash(row.get("content_hash")),
        collected_at: row.get("collected_at"),
    }
}

#[async_trait]
impl Warehouse for PostgresWarehouse {
    async fn append_snapshots(&self, snapshots: &[PageSnapshot]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to open transaction")?;

        for snapshot in snapshots {
            sqlx::query(
                r#"
                INSERT INTO page_snapshots (
                    id, competitor_name, url, page_title, content,
                    meta_description, content_hash, collected_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(snapshot.id.0)
            .bind(&snapshot.competitor_name)
            .bind(&snapshot.url)
            .bind(&snapshot.page_title)
            .bind(&snapshot.content)
            .bind(&snapshot.meta_description)
            .bind(&snapshot.content_hash.0)
            .bind(snapshot.collected_at)
            .execute(&mut *tx)
            .await
            .context("Failed to append page snapshot")?;
        }

        tx.commit().await.context("Failed to commit snapshot batch")
    }

    async fn latest_fingerprint(
        &self,
        competitor_name: &str,
        url: &str,
    ) -> Result<Option<ContentHash>> {
        let row = sqlx::query(
            r#"
            SELECT content_hash
            FROM page_snapshots
            WHERE competitor_name = $1 AND url = $2
            ORDER BY collected_at DESC
            LIMIT 1
            "#,
        )
        .bind(competitor_name)
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to query latest fingerprint")?;

        Ok(row.map(|r| ContentHash(r.get("content_hash"))))
    }

    async fn query_snapshots(
        &self,
        competitor_name: Option<&str>,
        limit: i64,
    ) -> Result<Vec<PageSnapshot>> {
        let rows = match competitor_name {
            Some(name) => {
                sqlx::query(
                    r#"
                    SELECT id, competitor_name, url, page_title, content,
                           meta_description, content_hash, collected_at
                    FROM page_snapshots
                    WHERE competitor_name = $1
                    ORDER BY collected_at DESC
                    LIMIT $2
                    "#,
                )
                .bind(name)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, competitor_name, url, page_title, content,
                           meta_description, content_hash, collected_at
                    FROM page_snapshots
                    ORDER BY collected_at DESC
                    LIMIT $1
                    "#,
                )
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
        }
        .context("Failed to query page snapshots")?;

        Ok(rows.iter().map(snapshot_from_row).collect())
    }
}
