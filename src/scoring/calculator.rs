//! # Health Score Calculator
//!
//! Runs the quality classifier and the four score functions, then combines
//! the sub-scores into one weighted overall score.
//!
//! The calculation is a pure function of its [`RawMetricSet`] and the
//! validated [`ScoringConfig`]. It performs no I/O and cannot fail: a fault in
//! one sub-metric is recorded in `errors` and scores that sub-metric 0, while
//! the remaining sub-metrics are computed as usual. The fault drops the data
//! quality one tier unless the classifier already counted that input as
//! unusable.

use std::collections::BTreeMap;
use tracing::warn;

use super::functions::{self, ScoreResult};
use super::quality;
use super::result::{CalculationMetadata, HealthScoreResult};
use crate::config::{ConfigResult, ScoringConfig};
use crate::constants::SubMetric;
use crate::models::RawMetricSet;

#[derive(Debug, Clone)]
pub struct HealthScoreCalculator {
    config: ScoringConfig,
}

impl HealthScoreCalculator {
    /// Build a calculator; invalid weights or thresholds are rejected here
    pub fn new(config: ScoringConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Convenience form taking the five primitive inputs directly
    pub fn calculate_health_score(
        &self,
        success_rate: Option<f64>,
        mttr_seconds: Option<f64>,
        avg_duration_seconds: Option<f64>,
        total_runs: u64,
        window_days: u32,
    ) -> HealthScoreResult {
        self.calculate(&RawMetricSet::new(
            success_rate,
            mttr_seconds,
            avg_duration_seconds,
            total_runs,
            window_days,
        ))
    }

    pub fn calculate(&self, metrics: &RawMetricSet) -> HealthScoreResult {
        let assessment = quality::classify(metrics, self.config.min_sample_size);

        let mut data_quality = assessment.tier;
        let mut warnings = assessment.warnings.clone();
        let mut errors = Vec::new();
        let mut breakdown = BTreeMap::new();
        let mut weighted_sum = 0.0;

        for metric in SubMetric::ORDERED {
            let score = match self.score_metric(metric, metrics) {
                Ok(sub_score) => {
                    warnings.extend(sub_score.warnings);
                    sub_score.score
                }
                Err(e) => {
                    warn!(metric = %metric, error = %e, "Sub-metric computation failed; scoring it 0");
                    errors.push(format!("{}: {e}", metric.breakdown_key()));
                    if !assessment.already_penalized(metric) {
                        data_quality = data_quality.degrade();
                    }
                    0.0
                }
            };

            weighted_sum += self.config.weights.weight_for(metric) * score;
            breakdown.insert(metric.breakdown_key().to_string(), score);
        }

        let overall_score = round_to_tenth(weighted_sum).clamp(0.0, 100.0);

        HealthScoreResult {
            overall_score,
            health_class: self.config.thresholds.classify(overall_score),
            data_quality,
            breakdown,
            warnings,
            errors,
            metadata: CalculationMetadata {
                input_data: metrics.clone(),
                weights_used: self.config.weights.clone(),
                thresholds_used: self.config.thresholds.clone(),
            },
        }
    }

    fn score_metric(&self, metric: SubMetric, metrics: &RawMetricSet) -> ScoreResult {
        match metric {
            SubMetric::SuccessRate => functions::success_rate_score(metrics.success_rate),
            SubMetric::Mttr => functions::mttr_score(metrics.mttr_seconds, &self.config),
            SubMetric::Duration => {
                functions::duration_score(metrics.avg_duration_seconds, &self.config)
            }
            SubMetric::Throughput => {
                functions::throughput_score(metrics.total_runs, metrics.window_days, &self.config)
            }
        }
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{warnings, DataQuality, HealthClass};

    fn calculator() -> HealthScoreCalculator {
        HealthScoreCalculator::new(ScoringConfig::default()).unwrap()
    }

    #[test]
    fn test_rejects_invalid_configuration() {
        let mut config = ScoringConfig::default();
        config.weights.mttr = 0.5;
        assert!(HealthScoreCalculator::new(config).is_err());
    }

    #[test]
    fn test_perfect_inputs() {
        let result = calculator().calculate_health_score(Some(100.0), Some(0.0), Some(0.0), 30, 30);
        assert_eq!(result.overall_score, 100.0);
        assert_eq!(result.health_class, HealthClass::Excellent);
        assert_eq!(result.data_quality, DataQuality::Excellent);
        assert!(result.warnings.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_default_weights_worked_example() {
        // 0.35 * 95 + 0.25 * 95.83 + 0.20 * 66.67 + 0.20 * 100 = 90.54
        let result =
            calculator().calculate_health_score(Some(95.0), Some(300.0), Some(600.0), 30, 30);
        assert_eq!(result.overall_score, 90.5);
        assert_eq!(result.health_class, HealthClass::Excellent);
        assert_eq!(result.data_quality, DataQuality::Excellent);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_sparse_data_is_insufficient() {
        let result = calculator().calculate_health_score(None, None, Some(600.0), 5, 30);
        assert_eq!(result.data_quality, DataQuality::Insufficient);
        assert!(result
            .warnings
            .iter()
            .any(|w| w == warnings::SUCCESS_RATE_MISSING));
        assert!(result.warnings.iter().any(|w| w == warnings::MTTR_MISSING));
    }

    #[test]
    fn test_warning_order_follows_metric_order() {
        let result = calculator().calculate_health_score(None, None, None, 15, 30);
        assert_eq!(
            result.warnings,
            vec![
                warnings::SUCCESS_RATE_MISSING.to_string(),
                warnings::MTTR_MISSING.to_string(),
                warnings::DURATION_MISSING.to_string(),
                "low throughput: 0.50 runs/day (minimum: 1)".to_string(),
            ]
        );
        assert_eq!(result.data_quality, DataQuality::Poor);
    }

    #[test]
    fn test_sub_metric_failure_is_isolated() {
        let result =
            calculator().calculate_health_score(Some(100.0), Some(f64::NAN), Some(0.0), 30, 30);

        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("mttr_score"));
        assert_eq!(result.sub_score("mttr_score"), Some(0.0));
        assert_eq!(result.sub_score("success_rate_score"), Some(100.0));
        // NaN already cost its tier in the classifier
        assert_eq!(result.data_quality, DataQuality::Good);
        assert_eq!(result.overall_score, 75.0);
    }

    #[test]
    fn test_zero_window_recorded_as_error() {
        let result = calculator().calculate_health_score(Some(100.0), Some(0.0), Some(0.0), 30, 0);
        assert_eq!(result.errors, vec!["throughput_score: throughput window is zero days"]);
        assert_eq!(result.sub_score("throughput_score"), Some(0.0));
        assert_eq!(result.data_quality, DataQuality::Good);
    }

    #[test]
    fn test_total_absence_still_renders() {
        let result = calculator().calculate(&RawMetricSet::absent(30));
        assert_eq!(result.data_quality, DataQuality::Insufficient);
        // success rate 0, MTTR 100, duration 100, throughput 0
        assert_eq!(result.overall_score, 45.0);
        assert_eq!(result.health_class, HealthClass::Poor);
        assert_eq!(result.breakdown.len(), 4);
    }

    #[test]
    fn test_metadata_records_inputs() {
        let metrics = RawMetricSet::new(Some(80.0), None, Some(120.0), 12, 7);
        let result = calculator().calculate(&metrics);
        assert_eq!(result.metadata.input_data, metrics);
        assert_eq!(result.metadata.weights_used, ScoringConfig::default().weights);
    }
}
