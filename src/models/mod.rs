//! # Value Contracts
//!
//! Plain data types exchanged between run storage, the MTTR refresher, the
//! metrics query layer and the scoring engine. None of them carry a storage
//! library row shape; the `database` module maps rows into these types.

pub mod mttr_cache_entry;
pub mod raw_metrics;
pub mod run;
pub mod selection;
pub mod workflow;

pub use mttr_cache_entry::MttrCacheEntry;
pub use raw_metrics::RawMetricSet;
pub use run::Run;
pub use selection::MetricsSelection;
pub use workflow::Workflow;
