//! # Scoring Constants and Shared Enums
//!
//! Default thresholds, tier enums and the fixed sub-metric ordering used by the
//! health scoring engine. Every enum serializes as `snake_case` so the values
//! rendered by the presentation layer match the configuration vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default values for every recognized configuration option.
pub mod defaults {
    pub const WEIGHT_SUCCESS_RATE: f64 = 0.35;
    pub const WEIGHT_MTTR: f64 = 0.25;
    pub const WEIGHT_DURATION: f64 = 0.20;
    pub const WEIGHT_THROUGHPUT: f64 = 0.20;

    pub const THRESHOLD_EXCELLENT: u32 = 85;
    pub const THRESHOLD_GOOD: u32 = 70;
    pub const THRESHOLD_FAIR: u32 = 50;
    pub const THRESHOLD_POOR: u32 = 0;

    pub const MTTR_MAX_SECONDS: f64 = 7200.0;
    pub const DURATION_MAX_SECONDS: f64 = 1800.0;
    pub const THROUGHPUT_MIN_RUNS_PER_DAY: f64 = 1.0;
    pub const MIN_SAMPLE_SIZE: u32 = 10;

    pub const MTTR_REFRESH_INTERVAL_SECONDS: u64 = 300;
    pub const MTTR_INITIAL_DELAY_SECONDS: u64 = 0;
    pub const READ_CACHE_TTL_SECONDS: u64 = 60;

    pub const SUCCESS_RATE_HIGH_THRESHOLD: f64 = 90.0;
    pub const SUCCESS_RATE_MEDIUM_THRESHOLD: f64 = 70.0;

    pub const DATABASE_URL: &str = "sqlite://data/workflow_health.db";
    pub const DATABASE_MAX_CONNECTIONS: u32 = 5;
    pub const DATABASE_BUSY_TIMEOUT_MS: u64 = 5000;

    /// Tolerance applied when checking that the weights sum to 1.0.
    pub const WEIGHT_SUM_TOLERANCE: f64 = 0.001;
}

/// Warning texts that callers and tests match on verbatim.
pub mod warnings {
    pub const SUCCESS_RATE_MISSING: &str = "success rate data not available";
    pub const MTTR_MISSING: &str = "MTTR data not available - assuming no failures";
    pub const DURATION_MISSING: &str = "duration data not available - no samples yet";
    pub const STORAGE_UNAVAILABLE: &str = "metrics storage unavailable - treating all inputs as absent";
}

/// Terminal status of a workflow run as recorded by ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Success,
    Failure,
    Cancelled,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Success => "success",
            RunStatus::Failure => "failure",
            RunStatus::Cancelled => "cancelled",
        }
    }

    /// Cancelled runs never count towards success rate or MTTR.
    pub fn counts_for_reliability(&self) -> bool {
        !matches!(self, RunStatus::Cancelled)
    }
}

impl FromStr for RunStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(RunStatus::Success),
            "failure" => Ok(RunStatus::Failure),
            "cancelled" => Ok(RunStatus::Cancelled),
            other => Err(format!("unknown run status: {other}")),
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How trustworthy a single health score computation is.
///
/// Ordered from best to worst so that `max` picks the worse of two tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataQuality {
    Excellent,
    Good,
    Fair,
    Poor,
    Insufficient,
}

impl DataQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataQuality::Excellent => "excellent",
            DataQuality::Good => "good",
            DataQuality::Fair => "fair",
            DataQuality::Poor => "poor",
            DataQuality::Insufficient => "insufficient",
        }
    }

    /// One tier worse. `Poor` and `Insufficient` are left where they are.
    pub fn degrade(self) -> Self {
        match self {
            DataQuality::Excellent => DataQuality::Good,
            DataQuality::Good => DataQuality::Fair,
            DataQuality::Fair => DataQuality::Poor,
            other => other,
        }
    }
}

impl fmt::Display for DataQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Health class derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthClass {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl HealthClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthClass::Excellent => "excellent",
            HealthClass::Good => "good",
            HealthClass::Fair => "fair",
            HealthClass::Poor => "poor",
        }
    }
}

impl fmt::Display for HealthClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four sub-metrics that make up a health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubMetric {
    SuccessRate,
    Mttr,
    Duration,
    Throughput,
}

impl SubMetric {
    /// Fixed evaluation order; warnings are concatenated in this order.
    pub const ORDERED: [SubMetric; 4] = [
        SubMetric::SuccessRate,
        SubMetric::Mttr,
        SubMetric::Duration,
        SubMetric::Throughput,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubMetric::SuccessRate => "success_rate",
            SubMetric::Mttr => "mttr",
            SubMetric::Duration => "duration",
            SubMetric::Throughput => "throughput",
        }
    }

    /// Key used in the result breakdown map.
    pub fn breakdown_key(&self) -> &'static str {
        match self {
            SubMetric::SuccessRate => "success_rate_score",
            SubMetric::Mttr => "mttr_score",
            SubMetric::Duration => "duration_score",
            SubMetric::Throughput => "throughput_score",
        }
    }
}

impl fmt::Display for SubMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display band for a raw success rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuccessRateBand {
    High,
    Medium,
    Low,
    Unknown,
}

impl SuccessRateBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuccessRateBand::High => "high",
            SuccessRateBand::Medium => "medium",
            SuccessRateBand::Low => "low",
            SuccessRateBand::Unknown => "unknown",
        }
    }

    pub fn classify(success_rate: Option<f64>) -> Self {
        match success_rate {
            Some(rate) if rate >= defaults::SUCCESS_RATE_HIGH_THRESHOLD => SuccessRateBand::High,
            Some(rate) if rate >= defaults::SUCCESS_RATE_MEDIUM_THRESHOLD => {
                SuccessRateBand::Medium
            }
            Some(rate) if rate.is_finite() => SuccessRateBand::Low,
            _ => SuccessRateBand::Unknown,
        }
    }
}
