//! In-process caching for computed health scores.

pub mod read_cache;

pub use read_cache::{CacheEntry, CacheLookup, MetricsReadCache};

/// Read-cache key: repository, workflow (or all) and window.
pub type MetricsCacheKey = crate::models::MetricsSelection;
