//! # Workflow Run
//!
//! A single execution of a workflow as recorded by ingestion. The scoring
//! core only ever reads runs; writes happen at the ingestion boundary through
//! [`RunRepository`](crate::database::RunRepository).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::RunStatus;
use crate::error::{HealthError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub id: String,
    pub workflow_id: String,
    pub run_number: Option<i64>,
    pub commit_sha: Option<String>,
    pub branch: Option<String>,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    /// `None` while the run is still in flight
    pub completed_at: Option<DateTime<Utc>>,
    /// Derived at write time for completed runs
    pub duration_seconds: Option<f64>,
}

impl Run {
    pub fn new(
        id: impl Into<String>,
        workflow_id: impl Into<String>,
        status: RunStatus,
        started_at: DateTime<Utc>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Self {
        let mut run = Self {
            id: id.into(),
            workflow_id: workflow_id.into(),
            run_number: None,
            commit_sha: None,
            branch: None,
            status,
            started_at,
            completed_at,
            duration_seconds: None,
        };
        run.duration_seconds = run.elapsed_seconds();
        run
    }

    pub fn with_commit(mut self, commit_sha: impl Into<String>, branch: impl Into<String>) -> Self {
        self.commit_sha = Some(commit_sha.into());
        self.branch = Some(branch.into());
        self
    }

    pub fn with_run_number(mut self, run_number: i64) -> Self {
        self.run_number = Some(run_number);
        self
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Wall-clock duration, `None` for in-flight runs
    pub fn elapsed_seconds(&self) -> Option<f64> {
        self.completed_at
            .map(|completed| (completed - self.started_at).num_milliseconds() as f64 / 1000.0)
    }

    /// Completed runs must not finish before they started
    pub fn validate(&self) -> Result<()> {
        if let Some(completed_at) = self.completed_at {
            if completed_at < self.started_at {
                return Err(HealthError::Validation(format!(
                    "run {} completed_at {} precedes started_at {}",
                    self.id, completed_at, self.started_at
                )));
            }
        }
        Ok(())
    }
}
