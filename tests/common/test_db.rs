//! In-memory SQLite fixture wired the way the binary wires it.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use workflow_health::clock::ManualClock;
use workflow_health::config::MttrCacheConfig;
use workflow_health::database::{DatabaseConnection, RunRepository, SqlMetricsQueries, SqliteMttrStore};
use workflow_health::models::{Run, Workflow};
use workflow_health::mttr::MttrRefresher;

/// Fixed "now" for every database test: 2024-06-01T00:00:00Z
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

pub struct TestDb {
    pub db: DatabaseConnection,
    pub clock: ManualClock,
    pub runs: Arc<RunRepository>,
    pub mttr_store: Arc<SqliteMttrStore>,
}

impl TestDb {
    pub async fn new() -> Self {
        let db = DatabaseConnection::in_memory()
            .await
            .expect("in-memory database should migrate");
        let pool = db.pool().clone();

        Self {
            db,
            clock: ManualClock::new(test_now()),
            runs: Arc::new(RunRepository::new(pool.clone())),
            mttr_store: Arc::new(SqliteMttrStore::new(pool)),
        }
    }

    pub fn metrics_queries(&self) -> SqlMetricsQueries {
        SqlMetricsQueries::new(
            self.db.pool().clone(),
            self.mttr_store.clone(),
            Arc::new(self.clock.clone()),
        )
    }

    pub fn refresher(&self) -> MttrRefresher {
        MttrRefresher::new(
            self.runs.clone(),
            self.mttr_store.clone(),
            Arc::new(self.clock.clone()),
            MttrCacheConfig::for_test(),
        )
    }

    /// Insert the workflow, then its runs
    pub async fn seed(&self, workflow: &Workflow, runs: &[Run]) {
        self.runs
            .upsert_workflow(workflow)
            .await
            .expect("workflow upsert should succeed");
        self.runs
            .upsert_runs_batch(runs)
            .await
            .expect("run batch upsert should succeed");
    }
}
