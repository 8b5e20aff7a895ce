//! proptest strategies for scoring inputs.

use proptest::prelude::*;
use workflow_health::config::{ScoreWeights, ScoringConfig};
use workflow_health::models::RawMetricSet;

/// Any finite value, occasionally out of range
pub fn optional_rate_strategy() -> impl Strategy<Value = Option<f64>> {
    prop::option::of(-50.0f64..150.0)
}

/// Seconds, occasionally negative or beyond any default threshold
pub fn optional_seconds_strategy() -> impl Strategy<Value = Option<f64>> {
    prop::option::of(-100.0f64..20_000.0)
}

pub fn raw_metrics_strategy() -> impl Strategy<Value = RawMetricSet> {
    (
        optional_rate_strategy(),
        optional_seconds_strategy(),
        optional_seconds_strategy(),
        0u64..500,
        1u32..120,
    )
        .prop_map(|(success_rate, mttr, duration, total_runs, window_days)| {
            RawMetricSet::new(success_rate, mttr, duration, total_runs, window_days)
        })
}

/// Four positive weights normalized to sum to 1.0
pub fn weights_strategy() -> impl Strategy<Value = ScoreWeights> {
    (1u32..100, 1u32..100, 1u32..100, 1u32..100).prop_map(|(a, b, c, d)| {
        let total = f64::from(a + b + c + d);
        let success_rate = f64::from(a) / total;
        let mttr = f64::from(b) / total;
        let duration = f64::from(c) / total;
        ScoreWeights {
            success_rate,
            mttr,
            duration,
            throughput: 1.0 - success_rate - mttr - duration,
        }
    })
}

pub fn scoring_config_strategy() -> impl Strategy<Value = ScoringConfig> {
    weights_strategy().prop_map(|weights| ScoringConfig {
        weights,
        ..ScoringConfig::default()
    })
}
