//! # Raw Metric Set
//!
//! **Ephemeral**: computed per query by the metrics query layer and consumed
//! by the health score calculator. Never persisted.
//!
//! ## Absence
//!
//! Every primitive may be absent. Absence is distinct from zero: a workflow
//! that never failed has no MTTR, which is not the same as recovering
//! instantly. The calculator and the quality classifier read `None` as
//! "no data" and score it according to each metric's absence policy.
//!
//! ```text
//! Repository: octo/app   Window: 30 days
//! Success Rate: 95.0%    (38 of 40 reliability-relevant runs)
//! MTTR: 5m               (from the MTTR aggregate cache)
//! Avg Duration: 10m      (completed runs in the window)
//! Total Runs: 42         (completed runs started in the window)
//! ```

use serde::{Deserialize, Serialize};

/// The five inputs of a health score computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMetricSet {
    /// Percentage in `0..=100` when present
    pub success_rate: Option<f64>,
    pub mttr_seconds: Option<f64>,
    pub avg_duration_seconds: Option<f64>,
    pub total_runs: u64,
    pub window_days: u32,
}

impl RawMetricSet {
    pub fn new(
        success_rate: Option<f64>,
        mttr_seconds: Option<f64>,
        avg_duration_seconds: Option<f64>,
        total_runs: u64,
        window_days: u32,
    ) -> Self {
        Self {
            success_rate,
            mttr_seconds,
            avg_duration_seconds,
            total_runs,
            window_days,
        }
    }

    /// Every primitive absent and no runs; what a storage failure degrades to
    pub fn absent(window_days: u32) -> Self {
        Self::new(None, None, None, 0, window_days)
    }

    /// Runs per day over the window, `None` for a zero-length window
    pub fn runs_per_day(&self) -> Option<f64> {
        (self.window_days > 0).then(|| self.total_runs as f64 / f64::from(self.window_days))
    }
}
