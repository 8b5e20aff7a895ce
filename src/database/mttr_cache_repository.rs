//! SQLite-backed [`MttrCacheStore`].
//!
//! Each write is a single-row upsert inside its own transaction; SQLite's
//! row-level atomicity guarantees readers never see a torn entry.

use async_trait::async_trait;
use sqlx::{FromRow, SqlitePool};

use super::codec::{decode_timestamp, encode_timestamp};
use crate::error::{HealthError, Result};
use crate::models::MttrCacheEntry;
use crate::mttr::MttrCacheStore;

#[derive(Debug, FromRow)]
struct MttrCacheRow {
    workflow_id: String,
    repository: String,
    mttr_seconds: f64,
    sample_size: i64,
    calculated_at: String,
}

impl TryFrom<MttrCacheRow> for MttrCacheEntry {
    type Error = HealthError;

    fn try_from(row: MttrCacheRow) -> Result<Self> {
        let sample_size = u32::try_from(row.sample_size).map_err(|_| {
            HealthError::Storage(format!(
                "invalid MTTR sample size {} for workflow {}",
                row.sample_size, row.workflow_id
            ))
        })?;

        Ok(MttrCacheEntry {
            calculated_at: decode_timestamp("calculated_at", &row.calculated_at)?,
            workflow_id: row.workflow_id,
            repository: row.repository,
            mttr_seconds: row.mttr_seconds,
            sample_size,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SqliteMttrStore {
    pool: SqlitePool,
}

impl SqliteMttrStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn all(&self) -> Result<Vec<MttrCacheEntry>> {
        let rows = sqlx::query_as::<_, MttrCacheRow>(
            r#"
            SELECT workflow_id, repository, mttr_seconds, sample_size, calculated_at
            FROM mttr_cache
            ORDER BY repository, workflow_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(MttrCacheEntry::try_from).collect()
    }
}

#[async_trait]
impl MttrCacheStore for SqliteMttrStore {
    async fn get(&self, workflow_id: &str) -> Result<Option<MttrCacheEntry>> {
        let row = sqlx::query_as::<_, MttrCacheRow>(
            r#"
            SELECT workflow_id, repository, mttr_seconds, sample_size, calculated_at
            FROM mttr_cache
            WHERE workflow_id = ?
            "#,
        )
        .bind(workflow_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(MttrCacheEntry::try_from).transpose()
    }

    async fn put(&self, entry: &MttrCacheEntry) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO mttr_cache (workflow_id, repository, mttr_seconds, sample_size, calculated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(workflow_id) DO UPDATE SET
                repository = excluded.repository,
                mttr_seconds = excluded.mttr_seconds,
                sample_size = excluded.sample_size,
                calculated_at = excluded.calculated_at
            "#,
        )
        .bind(&entry.workflow_id)
        .bind(&entry.repository)
        .bind(entry.mttr_seconds)
        .bind(i64::from(entry.sample_size))
        .bind(encode_timestamp(entry.calculated_at))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn remove(&self, workflow_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM mttr_cache WHERE workflow_id = ?")
            .bind(workflow_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn entries_for_repository(&self, repository: &str) -> Result<Vec<MttrCacheEntry>> {
        let rows = sqlx::query_as::<_, MttrCacheRow>(
            r#"
            SELECT workflow_id, repository, mttr_seconds, sample_size, calculated_at
            FROM mttr_cache
            WHERE repository = ?
            ORDER BY workflow_id
            "#,
        )
        .bind(repository)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(MttrCacheEntry::try_from).collect()
    }
}
