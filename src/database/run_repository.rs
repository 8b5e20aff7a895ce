//! # Run Repository
//!
//! Workflow and run persistence at the ingestion boundary, plus the read
//! access the MTTR refresher needs. Writes are idempotent upserts keyed by
//! the upstream identifiers, so re-ingesting the same page of runs is safe.

use async_trait::async_trait;
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;
use tracing::debug;

use super::codec::{decode_timestamp, encode_timestamp};
use crate::constants::RunStatus;
use crate::error::{HealthError, Result};
use crate::models::{Run, Workflow};
use crate::mttr::RunHistorySource;

#[derive(Debug, FromRow)]
struct WorkflowRow {
    id: String,
    repository: String,
    name: String,
    path: Option<String>,
    state: Option<String>,
}

impl From<WorkflowRow> for Workflow {
    fn from(row: WorkflowRow) -> Self {
        Workflow {
            id: row.id,
            repository: row.repository,
            name: row.name,
            path: row.path,
            state: row.state,
        }
    }
}

#[derive(Debug, FromRow)]
struct RunRow {
    id: String,
    workflow_id: String,
    run_number: Option<i64>,
    commit_sha: Option<String>,
    branch: Option<String>,
    status: String,
    started_at: String,
    completed_at: Option<String>,
    duration_seconds: Option<f64>,
}

impl TryFrom<RunRow> for Run {
    type Error = HealthError;

    fn try_from(row: RunRow) -> Result<Self> {
        let status = RunStatus::from_str(&row.status).map_err(HealthError::Storage)?;
        let completed_at = row
            .completed_at
            .as_deref()
            .map(|raw| decode_timestamp("completed_at", raw))
            .transpose()?;

        Ok(Run {
            id: row.id,
            workflow_id: row.workflow_id,
            run_number: row.run_number,
            commit_sha: row.commit_sha,
            branch: row.branch,
            status,
            started_at: decode_timestamp("started_at", &row.started_at)?,
            completed_at,
            duration_seconds: row.duration_seconds,
        })
    }
}

#[derive(Debug, Clone)]
pub struct RunRepository {
    pool: SqlitePool,
}

impl RunRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn upsert_workflow(&self, workflow: &Workflow) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO workflows (id, repository, name, path, state)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                repository = excluded.repository,
                name = excluded.name,
                path = excluded.path,
                state = excluded.state
            "#,
        )
        .bind(&workflow.id)
        .bind(&workflow.repository)
        .bind(&workflow.name)
        .bind(workflow.path.as_deref())
        .bind(workflow.state.as_deref())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert or update a batch of runs in one transaction.
    ///
    /// The whole batch is rejected if any run completes before it started.
    /// `duration_seconds` is derived here for completed runs.
    pub async fn upsert_runs_batch(&self, runs: &[Run]) -> Result<usize> {
        for run in runs {
            run.validate()?;
        }

        let mut tx = self.pool.begin().await?;

        for run in runs {
            sqlx::query(
                r#"
                INSERT INTO runs (
                    id, workflow_id, run_number, commit_sha, branch, status,
                    started_at, completed_at, duration_seconds
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(id) DO UPDATE SET
                    workflow_id = excluded.workflow_id,
                    run_number = excluded.run_number,
                    commit_sha = excluded.commit_sha,
                    branch = excluded.branch,
                    status = excluded.status,
                    started_at = excluded.started_at,
                    completed_at = excluded.completed_at,
                    duration_seconds = excluded.duration_seconds
                "#,
            )
            .bind(&run.id)
            .bind(&run.workflow_id)
            .bind(run.run_number)
            .bind(run.commit_sha.as_deref())
            .bind(run.branch.as_deref())
            .bind(run.status.as_str())
            .bind(encode_timestamp(run.started_at))
            .bind(run.completed_at.map(encode_timestamp))
            .bind(run.elapsed_seconds())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!(count = runs.len(), "Upserted run batch");
        Ok(runs.len())
    }

    pub async fn list_workflows(&self) -> Result<Vec<Workflow>> {
        let rows = sqlx::query_as::<_, WorkflowRow>(
            "SELECT id, repository, name, path, state FROM workflows ORDER BY repository, name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Workflow::from).collect())
    }

    pub async fn workflows_for_repository(&self, repository: &str) -> Result<Vec<Workflow>> {
        let rows = sqlx::query_as::<_, WorkflowRow>(
            "SELECT id, repository, name, path, state FROM workflows WHERE repository = ? ORDER BY name",
        )
        .bind(repository)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Workflow::from).collect())
    }

    pub async fn repositories(&self) -> Result<Vec<String>> {
        let repositories =
            sqlx::query_scalar::<_, String>("SELECT DISTINCT repository FROM workflows ORDER BY repository")
                .fetch_all(&self.pool)
                .await?;

        Ok(repositories)
    }

    /// All runs of a workflow ordered by start time
    pub async fn runs_for_workflow(&self, workflow_id: &str) -> Result<Vec<Run>> {
        let rows = sqlx::query_as::<_, RunRow>(
            r#"
            SELECT id, workflow_id, run_number, commit_sha, branch, status,
                   started_at, completed_at, duration_seconds
            FROM runs
            WHERE workflow_id = ?
            ORDER BY started_at, id
            "#,
        )
        .bind(workflow_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Run::try_from).collect()
    }
}

#[async_trait]
impl RunHistorySource for RunRepository {
    async fn list_workflows(&self) -> Result<Vec<Workflow>> {
        RunRepository::list_workflows(self).await
    }

    async fn runs_for_workflow(&self, workflow_id: &str) -> Result<Vec<Run>> {
        RunRepository::runs_for_workflow(self, workflow_id).await
    }
}
