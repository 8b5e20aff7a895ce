//! Run history builders for test data.

use chrono::{DateTime, Duration, Utc};
use workflow_health::constants::RunStatus;
use workflow_health::models::Run;

/// Builds a sequence of runs for one workflow, each starting a fixed gap
/// after the previous one
pub struct RunHistoryBuilder {
    workflow_id: String,
    next_start: DateTime<Utc>,
    gap: Duration,
    run_length: Duration,
    runs: Vec<Run>,
}

impl RunHistoryBuilder {
    pub fn new(workflow_id: &str, first_start: DateTime<Utc>) -> Self {
        Self {
            workflow_id: workflow_id.to_string(),
            next_start: first_start,
            gap: Duration::hours(1),
            run_length: Duration::minutes(10),
            runs: Vec::new(),
        }
    }

    pub fn with_gap(mut self, gap: Duration) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_run_length(mut self, run_length: Duration) -> Self {
        self.run_length = run_length;
        self
    }

    /// Append `count` completed runs with the given status
    pub fn completed(mut self, status: RunStatus, count: usize) -> Self {
        for _ in 0..count {
            let started_at = self.next_start;
            self.push(status, started_at, Some(started_at + self.run_length));
        }
        self
    }

    /// Append a run that has not completed yet
    pub fn in_flight(mut self, status: RunStatus) -> Self {
        let started_at = self.next_start;
        self.push(status, started_at, None);
        self
    }

    /// Move the next start time without recording a run
    pub fn skip(mut self, by: Duration) -> Self {
        self.next_start += by;
        self
    }

    pub fn build(self) -> Vec<Run> {
        self.runs
    }

    fn push(&mut self, status: RunStatus, started_at: DateTime<Utc>, completed_at: Option<DateTime<Utc>>) {
        let number = self.runs.len() as i64 + 1;
        let id = format!("{}-{number}", self.workflow_id);
        self.runs.push(
            Run::new(id, self.workflow_id.clone(), status, started_at, completed_at)
                .with_run_number(number),
        );
        self.next_start = started_at + self.gap;
    }
}
