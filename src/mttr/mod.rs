//! # MTTR Aggregate Cache
//!
//! Mean time to recovery is quadratic if computed naively over run history,
//! so it is never computed on a request path. A background
//! [`MttrRefresher`] recomputes it per workflow on a fixed interval and
//! replaces the persisted [`MttrCacheEntry`](crate::models::MttrCacheEntry).
//! Readers always get the last complete entry, or nothing if none exists yet.
//!
//! Per-workflow state:
//!
//! ```text
//! absent -> computing -> cached -> stale-but-served -> computing -> ...
//! ```

pub mod calculation;
pub mod refresher;
pub mod store;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Run, Workflow};

pub use calculation::{compute_mttr, recovery_intervals, MttrSample};
pub use refresher::{MttrRefresher, MttrRefresherHandle, RefreshOutcome, RefreshSummary};
pub use store::{InMemoryMttrStore, MttrCacheStore};

/// Read access to run history, as needed by the refresher
#[async_trait]
pub trait RunHistorySource: Send + Sync {
    async fn list_workflows(&self) -> Result<Vec<Workflow>>;

    /// Every run recorded for the workflow, in any order
    async fn runs_for_workflow(&self, workflow_id: &str) -> Result<Vec<Run>>;
}
