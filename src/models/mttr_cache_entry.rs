use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted MTTR aggregate for one workflow.
///
/// Written wholesale by the background refresher and never partially
/// updated. Readers get whichever complete entry was last written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MttrCacheEntry {
    pub workflow_id: String,
    pub repository: String,
    pub mttr_seconds: f64,
    /// Number of failure-to-recovery intervals averaged
    pub sample_size: u32,
    pub calculated_at: DateTime<Utc>,
}

impl MttrCacheEntry {
    /// Sample-size weighted mean over several workflows' entries
    pub fn weighted_mean<'a, I>(entries: I) -> Option<f64>
    where
        I: IntoIterator<Item = &'a MttrCacheEntry>,
    {
        let (weighted_sum, samples) = entries
            .into_iter()
            .filter(|entry| entry.sample_size > 0)
            .fold((0.0, 0u64), |(sum, count), entry| {
                (
                    sum + entry.mttr_seconds * f64::from(entry.sample_size),
                    count + u64::from(entry.sample_size),
                )
            });

        (samples > 0).then(|| ((weighted_sum / samples as f64) * 100.0).round() / 100.0)
    }
}
