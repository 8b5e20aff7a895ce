use serde::{Deserialize, Serialize};

/// A CI workflow definition within a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    pub id: String,
    /// `owner/name`
    pub repository: String,
    pub name: String,
    pub path: Option<String>,
    pub state: Option<String>,
}

impl Workflow {
    pub fn new(
        id: impl Into<String>,
        repository: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            repository: repository.into(),
            name: name.into(),
            path: None,
            state: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}
