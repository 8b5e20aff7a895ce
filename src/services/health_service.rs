//! # Health Score Service
//!
//! Request-path orchestration: read cache, then the metrics query layer,
//! then the calculator.
//!
//! Nothing here fails. When storage is unavailable the selection is scored
//! as if every input were absent, which yields `insufficient` data quality
//! plus a warning. Degraded reports are not cached, so the next request
//! retries storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use super::MetricsSource;
use crate::cache::{MetricsCacheKey, MetricsReadCache};
use crate::clock::Clock;
use crate::config::{ConfigResult, HealthConfig};
use crate::constants::{warnings, SuccessRateBand};
use crate::logging::{log_error, log_scoring_operation};
use crate::models::{MetricsSelection, RawMetricSet};
use crate::scoring::{HealthScoreCalculator, HealthScoreResult};

/// Presentation payload: the score, the raw inputs and freshness
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub selection: MetricsSelection,
    pub result: HealthScoreResult,
    pub raw_metrics: RawMetricSet,
    pub success_rate_band: SuccessRateBand,
    pub calculated_at: DateTime<Utc>,
    /// In-process only; never serialized
    #[serde(skip)]
    pub from_cache: bool,
}

pub struct HealthScoreService {
    source: Arc<dyn MetricsSource>,
    calculator: HealthScoreCalculator,
    read_cache: Option<MetricsReadCache<MetricsCacheKey, HealthReport>>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for HealthScoreService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthScoreService")
            .field("calculator", &self.calculator)
            .field("read_cache_entries", &self.cached_entries())
            .finish_non_exhaustive()
    }
}

impl HealthScoreService {
    /// Validates the scoring configuration before anything is served
    pub fn new(
        config: &HealthConfig,
        source: Arc<dyn MetricsSource>,
        clock: Arc<dyn Clock>,
    ) -> ConfigResult<Self> {
        config.read_cache.validate()?;
        let calculator = HealthScoreCalculator::new(config.scoring.clone())?;

        let read_cache = config
            .read_cache
            .enabled
            .then(|| MetricsReadCache::new(config.read_cache.ttl(), clock.clone()));

        Ok(Self {
            source,
            calculator,
            read_cache,
            clock,
        })
    }

    pub fn calculator(&self) -> &HealthScoreCalculator {
        &self.calculator
    }

    /// Health report for `selection`, served from the read cache while fresh
    pub async fn health_report(&self, selection: &MetricsSelection) -> HealthReport {
        let Some(cache) = &self.read_cache else {
            return self.compute_report(selection).await.unwrap_or_else(|degraded| degraded);
        };

        match cache
            .get_or_compute(selection, || self.compute_report(selection))
            .await
        {
            Ok(lookup) => HealthReport {
                from_cache: lookup.from_cache,
                ..lookup.value
            },
            Err(degraded) => degraded,
        }
    }

    /// Compute a fresh report, bypassing the cache.
    ///
    /// `Err` carries the degraded report produced when storage was unavailable.
    pub async fn compute_report(
        &self,
        selection: &MetricsSelection,
    ) -> std::result::Result<HealthReport, HealthReport> {
        match self.source.raw_metrics(selection).await {
            Ok(raw_metrics) => Ok(self.score(selection, raw_metrics)),
            Err(e) => {
                error!(
                    selection = %selection,
                    error = %e,
                    storage_unavailable = e.is_storage_unavailable(),
                    "Metrics query failed; scoring with all inputs absent"
                );
                log_error(
                    "health_score_service",
                    "raw_metrics",
                    &e.to_string(),
                    Some(&selection.to_string()),
                );

                let mut report = self.score(selection, RawMetricSet::absent(selection.window_days));
                report
                    .result
                    .warnings
                    .insert(0, warnings::STORAGE_UNAVAILABLE.to_string());
                Err(report)
            }
        }
    }

    fn score(&self, selection: &MetricsSelection, raw_metrics: RawMetricSet) -> HealthReport {
        let result = self.calculator.calculate(&raw_metrics);

        log_scoring_operation(
            &selection.repository,
            selection.workflow_id.as_deref(),
            result.overall_score,
            result.data_quality.as_str(),
            result.warnings.len(),
            result.errors.len(),
        );

        HealthReport {
            selection: selection.clone(),
            success_rate_band: SuccessRateBand::classify(raw_metrics.success_rate),
            result,
            raw_metrics,
            calculated_at: self.clock.now(),
            from_cache: false,
        }
    }

    pub fn invalidate(&self, selection: &MetricsSelection) -> bool {
        self.read_cache
            .as_ref()
            .is_some_and(|cache| cache.invalidate(selection))
    }

    pub fn clear_cache(&self) {
        if let Some(cache) = &self.read_cache {
            cache.clear();
        }
    }

    pub fn cached_entries(&self) -> usize {
        self.read_cache.as_ref().map_or(0, MetricsReadCache::len)
    }
}
