use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::{HealthThresholds, ScoreWeights};
use crate::constants::{DataQuality, HealthClass};
use crate::models::RawMetricSet;

/// Outcome of one health score computation.
///
/// Always complete and renderable: failures show up in `warnings` and
/// `errors`, never as a missing result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthScoreResult {
    /// Weighted sum of the sub-scores, one decimal, within `0..=100`
    pub overall_score: f64,
    pub health_class: HealthClass,
    pub data_quality: DataQuality,
    /// Sub-score per metric keyed by `SubMetric::breakdown_key`
    pub breakdown: BTreeMap<String, f64>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub metadata: CalculationMetadata,
}

/// Inputs and configuration used, for audit and debugging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationMetadata {
    pub input_data: RawMetricSet,
    pub weights_used: ScoreWeights,
    pub thresholds_used: HealthThresholds,
}

impl HealthScoreResult {
    pub fn sub_score(&self, key: &str) -> Option<f64> {
        self.breakdown.get(key).copied()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
