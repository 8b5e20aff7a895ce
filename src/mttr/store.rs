//! Storage seam for persisted MTTR aggregates.
//!
//! Single writer (the refresher), any number of readers. Every write replaces
//! a whole entry, so readers see either the previous entry or the new one.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::error::Result;
use crate::models::MttrCacheEntry;

#[async_trait]
pub trait MttrCacheStore: Send + Sync {
    async fn get(&self, workflow_id: &str) -> Result<Option<MttrCacheEntry>>;

    /// Replace the entry for `entry.workflow_id` wholesale
    async fn put(&self, entry: &MttrCacheEntry) -> Result<()>;

    /// Returns whether an entry existed
    async fn remove(&self, workflow_id: &str) -> Result<bool>;

    async fn entries_for_repository(&self, repository: &str) -> Result<Vec<MttrCacheEntry>>;
}

/// Process-local store, used by tests and by callers without persistence
#[derive(Debug, Default)]
pub struct InMemoryMttrStore {
    entries: RwLock<HashMap<String, MttrCacheEntry>>,
}

impl InMemoryMttrStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl MttrCacheStore for InMemoryMttrStore {
    async fn get(&self, workflow_id: &str) -> Result<Option<MttrCacheEntry>> {
        Ok(self.entries.read().get(workflow_id).cloned())
    }

    async fn put(&self, entry: &MttrCacheEntry) -> Result<()> {
        self.entries
            .write()
            .insert(entry.workflow_id.clone(), entry.clone());
        Ok(())
    }

    async fn remove(&self, workflow_id: &str) -> Result<bool> {
        Ok(self.entries.write().remove(workflow_id).is_some())
    }

    async fn entries_for_repository(&self, repository: &str) -> Result<Vec<MttrCacheEntry>> {
        let mut entries: Vec<MttrCacheEntry> = self
            .entries
            .read()
            .values()
            .filter(|entry| entry.repository == repository)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.workflow_id.cmp(&b.workflow_id));
        Ok(entries)
    }
}
