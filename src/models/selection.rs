use serde::{Deserialize, Serialize};
use std::fmt;

/// What a health score is computed over: one repository, optionally narrowed
/// to a single workflow, over the last `window_days` days.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MetricsSelection {
    pub repository: String,
    /// `None` selects every workflow in the repository
    pub workflow_id: Option<String>,
    pub window_days: u32,
}

impl MetricsSelection {
    pub fn repository(repository: impl Into<String>, window_days: u32) -> Self {
        Self {
            repository: repository.into(),
            workflow_id: None,
            window_days,
        }
    }

    pub fn workflow(
        repository: impl Into<String>,
        workflow_id: impl Into<String>,
        window_days: u32,
    ) -> Self {
        Self {
            repository: repository.into(),
            workflow_id: Some(workflow_id.into()),
            window_days,
        }
    }
}

impl fmt::Display for MetricsSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}d",
            self.repository,
            self.workflow_id.as_deref().unwrap_or("all"),
            self.window_days
        )
    }
}
