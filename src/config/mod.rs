//! # Workflow Health Configuration
//!
//! All static configuration consumed by the scoring engine and its caches.
//! Configuration is loaded once, validated eagerly and then treated as
//! immutable; an invalid combination of weights or thresholds is a fatal
//! startup error, never a runtime fallback.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use workflow_health::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let scoring = &manager.config().scoring;
//! println!("MTTR max: {}s", scoring.mttr_max_seconds);
//! # Ok(())
//! # }
//! ```

pub mod cache_config;
pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{defaults, HealthClass, SubMetric};

pub use cache_config::{MttrCacheConfig, ReadCacheConfig};
pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure mirroring workflow-health.yaml
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Health score weights, thresholds and metric limits
    pub scoring: ScoringConfig,

    /// Background MTTR aggregate refresh
    pub mttr_cache: MttrCacheConfig,

    /// In-process TTL cache in front of the metrics query
    pub read_cache: ReadCacheConfig,

    /// Run storage connection settings
    pub database: DatabaseConfig,

    /// Structured logging output
    pub logging: LoggingConfig,
}

/// Scoring parameters for the health score calculator
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: ScoreWeights,
    pub thresholds: HealthThresholds,
    pub mttr_max_seconds: f64,
    pub duration_max_seconds: f64,
    pub throughput_min_runs_per_day: f64,
    /// Runs required before a computation is anything better than `insufficient`
    pub min_sample_size: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            thresholds: HealthThresholds::default(),
            mttr_max_seconds: defaults::MTTR_MAX_SECONDS,
            duration_max_seconds: defaults::DURATION_MAX_SECONDS,
            throughput_min_runs_per_day: defaults::THROUGHPUT_MIN_RUNS_PER_DAY,
            min_sample_size: defaults::MIN_SAMPLE_SIZE,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        self.weights.validate()?;
        self.thresholds.validate()?;

        for (field, value) in [
            ("scoring.mttr_max_seconds", self.mttr_max_seconds),
            ("scoring.duration_max_seconds", self.duration_max_seconds),
            (
                "scoring.throughput_min_runs_per_day",
                self.throughput_min_runs_per_day,
            ),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigurationError::invalid_value(
                    field,
                    value.to_string(),
                    "must be a finite number greater than 0",
                ));
            }
        }

        Ok(())
    }
}

/// Per-sub-metric weights; must sum to 1.0
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub success_rate: f64,
    pub mttr: f64,
    pub duration: f64,
    pub throughput: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            success_rate: defaults::WEIGHT_SUCCESS_RATE,
            mttr: defaults::WEIGHT_MTTR,
            duration: defaults::WEIGHT_DURATION,
            throughput: defaults::WEIGHT_THROUGHPUT,
        }
    }
}

impl ScoreWeights {
    pub fn weight_for(&self, metric: SubMetric) -> f64 {
        match metric {
            SubMetric::SuccessRate => self.success_rate,
            SubMetric::Mttr => self.mttr,
            SubMetric::Duration => self.duration,
            SubMetric::Throughput => self.throughput,
        }
    }

    pub fn sum(&self) -> f64 {
        SubMetric::ORDERED
            .iter()
            .map(|metric| self.weight_for(*metric))
            .sum()
    }

    pub fn validate(&self) -> ConfigResult<()> {
        for metric in SubMetric::ORDERED {
            let weight = self.weight_for(metric);
            if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
                return Err(ConfigurationError::invalid_value(
                    format!("scoring.weights.{metric}"),
                    weight.to_string(),
                    "weight must be between 0.0 and 1.0",
                ));
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > defaults::WEIGHT_SUM_TOLERANCE {
            return Err(ConfigurationError::validation_error(format!(
                "score weights must sum to 1.0, got {sum}"
            )));
        }

        Ok(())
    }
}

/// Lower bounds (inclusive) of each health class
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthThresholds {
    pub excellent: u32,
    pub good: u32,
    pub fair: u32,
    pub poor: u32,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            excellent: defaults::THRESHOLD_EXCELLENT,
            good: defaults::THRESHOLD_GOOD,
            fair: defaults::THRESHOLD_FAIR,
            poor: defaults::THRESHOLD_POOR,
        }
    }
}

impl HealthThresholds {
    /// Threshold lookup; anything below `fair` is `poor`.
    pub fn classify(&self, overall_score: f64) -> HealthClass {
        if overall_score >= f64::from(self.excellent) {
            HealthClass::Excellent
        } else if overall_score >= f64::from(self.good) {
            HealthClass::Good
        } else if overall_score >= f64::from(self.fair) {
            HealthClass::Fair
        } else {
            HealthClass::Poor
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.excellent > 100 {
            return Err(ConfigurationError::invalid_value(
                "scoring.thresholds.excellent",
                self.excellent.to_string(),
                "threshold must be within 0..=100",
            ));
        }

        if !(self.excellent > self.good && self.good > self.fair && self.fair > self.poor) {
            return Err(ConfigurationError::validation_error(format!(
                "health thresholds must be strictly decreasing (excellent {} > good {} > fair {} > poor {})",
                self.excellent, self.good, self.fair, self.poor
            )));
        }

        Ok(())
    }
}

/// Run storage connection configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: defaults::DATABASE_URL.to_string(),
            max_connections: defaults::DATABASE_MAX_CONNECTIONS,
            busy_timeout_ms: defaults::DATABASE_BUSY_TIMEOUT_MS,
        }
    }
}

impl DatabaseConfig {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.url.trim().is_empty() {
            return Err(ConfigurationError::invalid_value(
                "database.url",
                "",
                "database url must not be empty",
            ));
        }

        if self.max_connections == 0 {
            return Err(ConfigurationError::invalid_value(
                "database.max_connections",
                "0",
                "pool needs at least one connection",
            ));
        }

        Ok(())
    }
}

/// Structured logging output
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Explicit filter directive; environment default when absent
    pub level: Option<String>,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl HealthConfig {
    /// Short intervals and TTLs for tests
    pub fn for_test() -> Self {
        Self {
            mttr_cache: MttrCacheConfig::for_test(),
            read_cache: ReadCacheConfig::for_test(),
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
                ..DatabaseConfig::default()
            },
            ..Self::default()
        }
    }

    pub fn for_development() -> Self {
        Self {
            mttr_cache: MttrCacheConfig::for_development(),
            read_cache: ReadCacheConfig::for_development(),
            ..Self::default()
        }
    }

    /// Validate every section; the first violation wins
    pub fn validate(&self) -> ConfigResult<()> {
        self.scoring.validate()?;
        self.mttr_cache.validate()?;
        self.read_cache.validate()?;
        self.database.validate()?;
        Ok(())
    }

    pub fn with_overrides<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.mttr_cache = self.mttr_cache.with_overrides(&lookup)?;
        self.read_cache = self.read_cache.with_overrides(&lookup)?;

        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }

        Ok(self)
    }
}
