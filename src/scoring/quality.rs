//! # Quality Classifier
//!
//! Assigns a [`DataQuality`] tier from which primitive inputs are usable.
//! Sample size dominates: below the configured minimum run count the result
//! is `insufficient` whatever else is present. Above it, each missing or
//! invalid primitive (success rate, MTTR, duration) costs one tier.

use serde::{Deserialize, Serialize};

use crate::constants::{DataQuality, SubMetric};
use crate::models::RawMetricSet;

/// State of one primitive input as seen by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputState {
    Valid,
    Missing,
    Invalid,
}

impl InputState {
    fn of(value: Option<f64>, in_domain: impl Fn(f64) -> bool) -> Self {
        match value {
            None => InputState::Missing,
            Some(v) if v.is_finite() && in_domain(v) => InputState::Valid,
            Some(_) => InputState::Invalid,
        }
    }

    pub fn is_usable(&self) -> bool {
        matches!(self, InputState::Valid)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QualityAssessment {
    pub tier: DataQuality,
    pub success_rate: InputState,
    pub mttr: InputState,
    pub duration: InputState,
    pub warnings: Vec<String>,
}

impl QualityAssessment {
    pub fn unusable_inputs(&self) -> usize {
        [self.success_rate, self.mttr, self.duration]
            .iter()
            .filter(|state| !state.is_usable())
            .count()
    }

    /// Whether the classifier already charged a tier for `metric`'s input.
    /// Throughput has no primitive of its own here.
    pub fn already_penalized(&self, metric: SubMetric) -> bool {
        let state = match metric {
            SubMetric::SuccessRate => self.success_rate,
            SubMetric::Mttr => self.mttr,
            SubMetric::Duration => self.duration,
            SubMetric::Throughput => return false,
        };
        !state.is_usable()
    }
}

pub fn classify(metrics: &RawMetricSet, min_sample_size: u32) -> QualityAssessment {
    let success_rate = InputState::of(metrics.success_rate, |v| (0.0..=100.0).contains(&v));
    let mttr = InputState::of(metrics.mttr_seconds, |v| v >= 0.0);
    let duration = InputState::of(metrics.avg_duration_seconds, |v| v >= 0.0);

    let mut assessment = QualityAssessment {
        tier: DataQuality::Excellent,
        success_rate,
        mttr,
        duration,
        warnings: Vec::new(),
    };

    if metrics.total_runs < u64::from(min_sample_size) {
        assessment.tier = DataQuality::Insufficient;
        assessment.warnings.push(format!(
            "insufficient data: {} runs (minimum {min_sample_size} required)",
            metrics.total_runs
        ));
        return assessment;
    }

    assessment.tier = match assessment.unusable_inputs() {
        0 => DataQuality::Excellent,
        1 => DataQuality::Good,
        2 => DataQuality::Fair,
        _ => DataQuality::Poor,
    };

    assessment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_dominates() {
        let metrics = RawMetricSet::new(Some(100.0), Some(0.0), Some(10.0), 9, 30);
        let assessment = classify(&metrics, 10);
        assert_eq!(assessment.tier, DataQuality::Insufficient);
        assert_eq!(assessment.warnings.len(), 1);
    }

    #[test]
    fn test_tier_per_unusable_input() {
        let cases = [
            (RawMetricSet::new(Some(90.0), Some(60.0), Some(60.0), 10, 30), DataQuality::Excellent),
            (RawMetricSet::new(Some(90.0), None, Some(60.0), 10, 30), DataQuality::Good),
            (RawMetricSet::new(None, None, Some(60.0), 10, 30), DataQuality::Fair),
            (RawMetricSet::new(None, None, None, 10, 30), DataQuality::Poor),
        ];

        for (metrics, expected) in cases {
            assert_eq!(classify(&metrics, 10).tier, expected, "{metrics:?}");
        }
    }

    #[test]
    fn test_invalid_counts_like_missing() {
        let metrics = RawMetricSet::new(Some(120.0), Some(-5.0), Some(60.0), 10, 30);
        let assessment = classify(&metrics, 10);
        assert_eq!(assessment.success_rate, InputState::Invalid);
        assert_eq!(assessment.mttr, InputState::Invalid);
        assert_eq!(assessment.duration, InputState::Valid);
        assert_eq!(assessment.tier, DataQuality::Fair);
    }

    #[test]
    fn test_non_finite_is_invalid() {
        let metrics = RawMetricSet::new(Some(f64::NAN), Some(1.0), Some(1.0), 50, 30);
        assert_eq!(classify(&metrics, 10).success_rate, InputState::Invalid);
    }

    #[test]
    fn test_already_penalized() {
        let metrics = RawMetricSet::new(Some(f64::NAN), Some(1.0), None, 50, 30);
        let assessment = classify(&metrics, 10);
        assert!(assessment.already_penalized(SubMetric::SuccessRate));
        assert!(!assessment.already_penalized(SubMetric::Mttr));
        assert!(assessment.already_penalized(SubMetric::Duration));
        assert!(!assessment.already_penalized(SubMetric::Throughput));
    }
}
