use async_trait::async_trait;

use crate::error::Result;
use crate::models::{MetricsSelection, RawMetricSet};

/// The metrics query layer as seen by the health score service.
///
/// Implementations aggregate persisted runs into the five scoring inputs. A
/// returned error means storage was unavailable; callers degrade it to
/// "all inputs absent" rather than surfacing it.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn raw_metrics(&self, selection: &MetricsSelection) -> Result<RawMetricSet>;
}
