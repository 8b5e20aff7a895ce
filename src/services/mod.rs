pub mod health_service;
pub mod metrics_source;

pub use health_service::{HealthReport, HealthScoreService};
pub use metrics_source::MetricsSource;
