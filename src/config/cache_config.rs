//! Cache Configuration Management
//!
//! Configuration for the two cache tiers: the persisted MTTR aggregate cache
//! (refreshed by a background task) and the in-process metrics read cache
//! (TTL-bounded memoization of full health score results).
//!
//! Both support environment presets and environment-variable overrides. An
//! override that cannot be parsed is a fatal configuration error rather than a
//! silent fallback to the previous value.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use super::error::{ConfigResult, ConfigurationError};
use crate::constants::defaults;

pub const ENV_MTTR_REFRESH_INTERVAL: &str = "MTTR_REFRESH_INTERVAL";
pub const ENV_MTTR_INITIAL_DELAY: &str = "MTTR_WORKER_INITIAL_DELAY";
pub const ENV_READ_CACHE_TTL: &str = "WORKFLOW_HEALTH_READ_CACHE_TTL_SECONDS";
pub const ENV_READ_CACHE_ENABLED: &str = "WORKFLOW_HEALTH_READ_CACHE_ENABLED";

/// Background MTTR refresh behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MttrCacheConfig {
    pub refresh_interval_seconds: u64,
    pub initial_delay_seconds: u64,
}

impl Default for MttrCacheConfig {
    fn default() -> Self {
        Self {
            refresh_interval_seconds: defaults::MTTR_REFRESH_INTERVAL_SECONDS,
            initial_delay_seconds: defaults::MTTR_INITIAL_DELAY_SECONDS,
        }
    }
}

impl MttrCacheConfig {
    pub fn for_test() -> Self {
        Self {
            refresh_interval_seconds: 1,
            initial_delay_seconds: 0,
        }
    }

    pub fn for_development() -> Self {
        Self {
            refresh_interval_seconds: 60,
            initial_delay_seconds: 5,
        }
    }

    /// Get refresh interval as Duration
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds)
    }

    /// Get initial delay as Duration
    pub fn initial_delay(&self) -> Duration {
        Duration::from_secs(self.initial_delay_seconds)
    }

    /// Apply overrides read through `lookup` (normally `std::env::var`)
    pub fn with_overrides<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_MTTR_REFRESH_INTERVAL) {
            self.refresh_interval_seconds = parse_override(ENV_MTTR_REFRESH_INTERVAL, &raw)?;
            info!(
                "MTTR refresh interval override: {}s",
                self.refresh_interval_seconds
            );
        }

        if let Some(raw) = lookup(ENV_MTTR_INITIAL_DELAY) {
            self.initial_delay_seconds = parse_override(ENV_MTTR_INITIAL_DELAY, &raw)?;
            info!("MTTR initial delay override: {}s", self.initial_delay_seconds);
        }

        Ok(self)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.refresh_interval_seconds == 0 {
            return Err(ConfigurationError::invalid_value(
                "mttr_cache.refresh_interval_seconds",
                "0",
                "refresh interval must be greater than 0",
            ));
        }

        if self.initial_delay_seconds > self.refresh_interval_seconds * 10 {
            warn!(
                initial_delay_seconds = self.initial_delay_seconds,
                refresh_interval_seconds = self.refresh_interval_seconds,
                "MTTR initial delay is much longer than the refresh interval"
            );
        }

        Ok(())
    }
}

/// In-process metrics read cache behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadCacheConfig {
    pub enabled: bool,
    pub ttl_seconds: u64,
}

impl Default for ReadCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_seconds: defaults::READ_CACHE_TTL_SECONDS,
        }
    }
}

impl ReadCacheConfig {
    /// Rapid invalidation for test feedback
    pub fn for_test() -> Self {
        Self {
            enabled: true,
            ttl_seconds: 1,
        }
    }

    pub fn for_development() -> Self {
        Self {
            enabled: true,
            ttl_seconds: 10,
        }
    }

    /// Get TTL as Duration
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    pub fn with_overrides<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_READ_CACHE_ENABLED) {
            self.enabled = parse_override(ENV_READ_CACHE_ENABLED, &raw)?;
            info!("Read cache enabled override: {}", self.enabled);
        }

        if let Some(raw) = lookup(ENV_READ_CACHE_TTL) {
            self.ttl_seconds = parse_override(ENV_READ_CACHE_TTL, &raw)?;
            info!("Read cache TTL override: {}s", self.ttl_seconds);
        }

        Ok(self)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.enabled && self.ttl_seconds == 0 {
            return Err(ConfigurationError::invalid_value(
                "read_cache.ttl_seconds",
                "0",
                "TTL must be greater than 0 when the read cache is enabled",
            ));
        }

        Ok(())
    }
}

/// Log both cache tiers for debugging
pub fn log_cache_configuration(mttr: &MttrCacheConfig, read: &ReadCacheConfig) {
    info!("Cache Configuration:");
    info!(
        "  MTTR Cache: refresh every {}s (initial delay {}s)",
        mttr.refresh_interval_seconds, mttr.initial_delay_seconds
    );
    info!(
        "  Read Cache: enabled={}, {}s TTL",
        read.enabled, read.ttl_seconds
    );
}

fn parse_override<T>(key: &str, raw: &str) -> ConfigResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigurationError::environment_override_error(key, format!("'{raw}': {e}")))
}
