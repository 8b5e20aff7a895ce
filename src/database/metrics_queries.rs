//! # Metrics Query Layer (SQLite)
//!
//! Assembles a [`RawMetricSet`] for a [`MetricsSelection`] from persisted
//! runs, reading MTTR from the aggregate cache instead of computing it.
//!
//! ## Definitions
//!
//! Over runs *started* in the last `window_days` days and already completed:
//!
//! - `total_runs`: completed runs, cancelled included
//! - `success_rate`: `success / (success + failure) * 100`, two decimals;
//!   absent when no run succeeded or failed
//! - `avg_duration_seconds`: mean duration of completed runs, two decimals;
//!   absent when there are none
//!
//! MTTR is the cached all-time value: the workflow's entry, or for a whole
//! repository the sample-size weighted mean of its workflows' entries.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use super::codec::{encode_timestamp, round2};
use crate::clock::Clock;
use crate::error::Result;
use crate::models::{MetricsSelection, MttrCacheEntry, RawMetricSet};
use crate::mttr::MttrCacheStore;
use crate::services::MetricsSource;

#[derive(Debug, FromRow)]
struct RunAggregateRow {
    total_runs: i64,
    success_count: i64,
    failure_count: i64,
    avg_duration_seconds: Option<f64>,
}

/// Run counts for a selection, before scoring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunAggregates {
    pub total_runs: u64,
    pub success_count: u64,
    pub failure_count: u64,
    pub avg_duration_seconds: Option<f64>,
}

impl RunAggregates {
    pub fn success_rate(&self) -> Option<f64> {
        let decided = self.success_count + self.failure_count;
        (decided > 0).then(|| round2(self.success_count as f64 / decided as f64 * 100.0))
    }
}

impl From<RunAggregateRow> for RunAggregates {
    fn from(row: RunAggregateRow) -> Self {
        let count = |value: i64| u64::try_from(value).unwrap_or(0);
        RunAggregates {
            total_runs: count(row.total_runs),
            success_count: count(row.success_count),
            failure_count: count(row.failure_count),
            avg_duration_seconds: row.avg_duration_seconds.map(round2),
        }
    }
}

pub struct SqlMetricsQueries {
    pool: SqlitePool,
    mttr_store: Arc<dyn MttrCacheStore>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SqlMetricsQueries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlMetricsQueries")
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

/// Earliest `started_at` inside the window; `None` when the window reaches
/// past the representable range and so covers all history
pub fn window_cutoff(now: DateTime<Utc>, window_days: u32) -> Option<DateTime<Utc>> {
    Duration::try_days(i64::from(window_days)).and_then(|window| now.checked_sub_signed(window))
}

impl SqlMetricsQueries {
    pub fn new(pool: SqlitePool, mttr_store: Arc<dyn MttrCacheStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            pool,
            mttr_store,
            clock,
        }
    }

    /// Counts and average duration over the selection's window
    pub async fn run_aggregates(&self, selection: &MetricsSelection) -> Result<RunAggregates> {
        let cutoff = window_cutoff(self.clock.now(), selection.window_days).map(encode_timestamp);

        let row = sqlx::query_as::<_, RunAggregateRow>(
            r#"
            SELECT
                COUNT(*) AS total_runs,
                COUNT(CASE WHEN r.status = 'success' THEN 1 END) AS success_count,
                COUNT(CASE WHEN r.status = 'failure' THEN 1 END) AS failure_count,
                AVG(r.duration_seconds) AS avg_duration_seconds
            FROM runs r
            JOIN workflows w ON w.id = r.workflow_id
            WHERE w.repository = ?
              AND (? IS NULL OR r.workflow_id = ?)
              AND r.completed_at IS NOT NULL
              AND (? IS NULL OR r.started_at >= ?)
            "#,
        )
        .bind(&selection.repository)
        .bind(selection.workflow_id.as_deref())
        .bind(selection.workflow_id.as_deref())
        .bind(cutoff.as_deref())
        .bind(cutoff.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    /// Cached MTTR for the selection, absent when nothing was recovered yet
    pub async fn cached_mttr(&self, selection: &MetricsSelection) -> Result<Option<f64>> {
        match &selection.workflow_id {
            Some(workflow_id) => Ok(self
                .mttr_store
                .get(workflow_id)
                .await?
                .filter(|entry| entry.repository == selection.repository)
                .map(|entry| entry.mttr_seconds)),
            None => {
                let entries = self
                    .mttr_store
                    .entries_for_repository(&selection.repository)
                    .await?;
                Ok(MttrCacheEntry::weighted_mean(&entries))
            }
        }
    }
}

#[async_trait]
impl MetricsSource for SqlMetricsQueries {
    async fn raw_metrics(&self, selection: &MetricsSelection) -> Result<RawMetricSet> {
        let start = Instant::now();

        let aggregates = self.run_aggregates(selection).await?;
        let mttr_seconds = self.cached_mttr(selection).await?;

        debug!(
            selection = %selection,
            total_runs = aggregates.total_runs,
            duration_ms = start.elapsed().as_millis() as u64,
            "Raw metrics query completed"
        );

        Ok(RawMetricSet {
            success_rate: aggregates.success_rate(),
            mttr_seconds,
            avg_duration_seconds: aggregates.avg_duration_seconds,
            total_runs: aggregates.total_runs,
            window_days: selection.window_days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_window_cutoff() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(
            window_cutoff(now, 30),
            Some(Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap())
        );
        assert_eq!(window_cutoff(now, 0), Some(now));
        assert_eq!(window_cutoff(now, u32::MAX), None);
        assert_eq!(window_cutoff(now, 200_000_000), None);
    }

    #[test]
    fn test_success_rate_excludes_cancelled() {
        let aggregates = RunAggregates {
            total_runs: 10,
            success_count: 2,
            failure_count: 1,
            avg_duration_seconds: None,
        };
        assert_eq!(aggregates.success_rate(), Some(66.67));
    }

    #[test]
    fn test_success_rate_absent_without_decided_runs() {
        let aggregates = RunAggregates {
            total_runs: 4,
            success_count: 0,
            failure_count: 0,
            avg_duration_seconds: None,
        };
        assert_eq!(aggregates.success_rate(), None);
    }
}
