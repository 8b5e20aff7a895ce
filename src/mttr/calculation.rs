//! Mean time to recovery over a workflow's run history.
//!
//! Every completed failure is paired with the first success that completed
//! strictly after it; the interval between the two completion times is one
//! sample. Consecutive failures each produce their own sample against the
//! same recovery. Failures with no later success, cancelled runs and in-flight
//! runs contribute nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::RunStatus;
use crate::models::Run;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MttrSample {
    /// Mean recovery time, rounded to two decimals
    pub mttr_seconds: f64,
    pub sample_size: u32,
}

/// Recovery interval in seconds for every failure that was recovered
pub fn recovery_intervals(runs: &[Run]) -> Vec<f64> {
    let completed_at = |status: RunStatus| {
        let mut times: Vec<DateTime<Utc>> = runs
            .iter()
            .filter(|run| run.status == status)
            .filter_map(|run| run.completed_at)
            .collect();
        times.sort_unstable();
        times
    };

    let successes = completed_at(RunStatus::Success);
    let failures = completed_at(RunStatus::Failure);

    failures
        .into_iter()
        .filter_map(|failed_at| {
            let next = successes.partition_point(|succeeded_at| *succeeded_at <= failed_at);
            successes
                .get(next)
                .map(|recovered_at| (*recovered_at - failed_at).num_milliseconds() as f64 / 1000.0)
        })
        .collect()
}

/// `None` when no failure has been recovered yet
pub fn compute_mttr(runs: &[Run]) -> Option<MttrSample> {
    let intervals = recovery_intervals(runs);
    if intervals.is_empty() {
        return None;
    }

    let mean = intervals.iter().sum::<f64>() / intervals.len() as f64;
    Some(MttrSample {
        mttr_seconds: (mean * 100.0).round() / 100.0,
        sample_size: u32::try_from(intervals.len()).unwrap_or(u32::MAX),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn run(id: &str, status: RunStatus, completed_minute: Option<i64>) -> Run {
        Run::new(id, "wf", status, at(-1), completed_minute.map(at))
    }

    #[test]
    fn test_single_recovery() {
        let runs = vec![
            run("1", RunStatus::Failure, Some(0)),
            run("2", RunStatus::Success, Some(10)),
        ];
        assert_eq!(
            compute_mttr(&runs),
            Some(MttrSample {
                mttr_seconds: 600.0,
                sample_size: 1
            })
        );
    }

    #[test]
    fn test_consecutive_failures_share_recovery() {
        let runs = vec![
            run("1", RunStatus::Failure, Some(0)),
            run("2", RunStatus::Failure, Some(5)),
            run("3", RunStatus::Success, Some(10)),
        ];
        // 600s and 300s
        assert_eq!(
            compute_mttr(&runs),
            Some(MttrSample {
                mttr_seconds: 450.0,
                sample_size: 2
            })
        );
    }

    #[test]
    fn test_unrecovered_and_cancelled_runs_ignored() {
        let runs = vec![
            run("1", RunStatus::Success, Some(0)),
            run("2", RunStatus::Failure, Some(2)),
            run("3", RunStatus::Cancelled, Some(3)),
            run("4", RunStatus::Success, Some(4)),
            run("5", RunStatus::Failure, Some(20)),
            run("6", RunStatus::Success, None),
        ];
        assert_eq!(recovery_intervals(&runs), vec![120.0]);
    }

    #[test]
    fn test_no_failures_is_absent() {
        let runs = vec![run("1", RunStatus::Success, Some(0))];
        assert_eq!(compute_mttr(&runs), None);
        assert_eq!(compute_mttr(&[]), None);
    }

    #[test]
    fn test_success_at_same_instant_does_not_recover() {
        let runs = vec![
            run("1", RunStatus::Failure, Some(0)),
            run("2", RunStatus::Success, Some(0)),
        ];
        assert_eq!(compute_mttr(&runs), None);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let runs = vec![
            run("3", RunStatus::Success, Some(7)),
            run("1", RunStatus::Failure, Some(0)),
        ];
        assert_eq!(compute_mttr(&runs).map(|s| s.mttr_seconds), Some(420.0));
    }

    #[test]
    fn test_rounded_to_two_decimals() {
        let mut runs = vec![run("1", RunStatus::Failure, Some(0))];
        let mut recovered = run("2", RunStatus::Success, Some(0));
        recovered.completed_at = Some(at(0) + Duration::milliseconds(1_234));
        runs.push(recovered);
        assert_eq!(compute_mttr(&runs).map(|s| s.mttr_seconds), Some(1.23));
    }
}
