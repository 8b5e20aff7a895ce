//! # MTTR Refresher Background Service
//!
//! Periodically recomputes MTTR for every workflow and overwrites the
//! persisted aggregate, so request paths never pay for the computation.
//!
//! ## Cycle
//!
//! 1. Optional initial delay before the first cycle
//! 2. Timer tick (default every 300 seconds)
//! 3. For each workflow: load run history, compute MTTR, replace its entry
//!    (or remove it when there is no recovered failure)
//! 4. Log a [`RefreshSummary`]
//!
//! A slow cycle delays the next tick instead of overlapping with it. A
//! failure for one workflow leaves that workflow's entry at its previous
//! value and does not stop the cycle.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use super::calculation::compute_mttr;
use super::store::MttrCacheStore;
use super::RunHistorySource;
use crate::clock::Clock;
use crate::config::MttrCacheConfig;
use crate::error::{HealthError, Result};
use crate::logging::log_refresh_cycle;
use crate::models::{MttrCacheEntry, Workflow};

/// What one refresh cycle did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    /// Workflows whose entry was written
    pub refreshed: usize,
    /// Workflows whose entry was removed for lack of samples
    pub cleared: usize,
    /// Workflows left at their previous value after an error
    pub failed: usize,
    pub duration: Duration,
}

/// Result of refreshing a single workflow
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Updated(MttrCacheEntry),
    /// No samples; a previously cached entry was removed
    Cleared,
    /// No samples and nothing was cached
    NoSamples,
}

pub struct MttrRefresher {
    history: Arc<dyn RunHistorySource>,
    store: Arc<dyn MttrCacheStore>,
    clock: Arc<dyn Clock>,
    config: MttrCacheConfig,
}

// Manual Debug implementation because the collaborators are trait objects
impl std::fmt::Debug for MttrRefresher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MttrRefresher")
            .field("config", &self.config)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl MttrRefresher {
    #[must_use]
    pub fn new(
        history: Arc<dyn RunHistorySource>,
        store: Arc<dyn MttrCacheStore>,
        clock: Arc<dyn Clock>,
        config: MttrCacheConfig,
    ) -> Self {
        Self {
            history,
            store,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &MttrCacheConfig {
        &self.config
    }

    /// Run one full refresh cycle.
    ///
    /// Only a failure to enumerate workflows fails the cycle; per-workflow
    /// failures are counted in the summary.
    pub async fn refresh_cycle(&self) -> Result<RefreshSummary> {
        let start = Instant::now();

        let workflows = self
            .history
            .list_workflows()
            .await
            .map_err(|e| HealthError::Refresh(format!("failed to list workflows: {e}")))?;

        let mut summary = RefreshSummary::default();

        for workflow in &workflows {
            match self.refresh_workflow(workflow).await {
                Ok(RefreshOutcome::Updated(entry)) => {
                    debug!(
                        workflow_id = %entry.workflow_id,
                        mttr_seconds = entry.mttr_seconds,
                        sample_size = entry.sample_size,
                        "MTTR entry refreshed"
                    );
                    summary.refreshed += 1;
                }
                Ok(RefreshOutcome::Cleared) => {
                    debug!(workflow_id = %workflow.id, "MTTR entry removed, no recovered failures");
                    summary.cleared += 1;
                }
                Ok(RefreshOutcome::NoSamples) => {}
                Err(e) => {
                    error!(
                        workflow_id = %workflow.id,
                        repository = %workflow.repository,
                        error = %e,
                        "MTTR refresh failed for workflow; previous value kept"
                    );
                    summary.failed += 1;
                }
            }
        }

        summary.duration = start.elapsed();
        log_refresh_cycle(
            summary.refreshed,
            summary.cleared,
            summary.failed,
            summary.duration.as_millis() as u64,
        );

        Ok(summary)
    }

    /// Recompute and persist MTTR for one workflow
    pub async fn refresh_workflow(&self, workflow: &Workflow) -> Result<RefreshOutcome> {
        let runs = self.history.runs_for_workflow(&workflow.id).await?;

        match compute_mttr(&runs) {
            Some(sample) => {
                let entry = MttrCacheEntry {
                    workflow_id: workflow.id.clone(),
                    repository: workflow.repository.clone(),
                    mttr_seconds: sample.mttr_seconds,
                    sample_size: sample.sample_size,
                    calculated_at: self.clock.now(),
                };
                self.store.put(&entry).await?;
                Ok(RefreshOutcome::Updated(entry))
            }
            None => {
                if self.store.remove(&workflow.id).await? {
                    Ok(RefreshOutcome::Cleared)
                } else {
                    Ok(RefreshOutcome::NoSamples)
                }
            }
        }
    }

    /// Run refresh cycles until `shutdown` flips to `true` or its sender is dropped
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_seconds = self.config.refresh_interval_seconds,
            initial_delay_seconds = self.config.initial_delay_seconds,
            "Starting MTTR refresher"
        );

        let initial_delay = self.config.initial_delay();
        if !initial_delay.is_zero() {
            tokio::select! {
                _ = tokio::time::sleep(initial_delay) => {}
                _ = shutdown.changed() => {
                    info!("MTTR refresher stopped before its first cycle");
                    return;
                }
            }
        }

        let mut interval_timer = interval(self.config.refresh_interval());
        interval_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval_timer.tick() => {}
                _ = shutdown.changed() => break,
            }

            if let Err(e) = self.refresh_cycle().await {
                error!(error = %e, "MTTR refresh cycle failed");
            }

            if *shutdown.borrow() {
                break;
            }
        }

        info!("MTTR refresher stopped");
    }

    /// Spawn [`run`](Self::run) on the current runtime
    pub fn spawn(self: Arc<Self>) -> MttrRefresherHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let join = tokio::spawn(async move { self.run(shutdown_rx).await });

        MttrRefresherHandle { shutdown_tx, join }
    }
}

/// Owner of a spawned refresher
#[derive(Debug)]
pub struct MttrRefresherHandle {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl MttrRefresherHandle {
    /// Signal shutdown and wait for an in-progress cycle to finish
    pub async fn shutdown(self) -> Result<()> {
        // The task may already have exited; nothing is listening then
        let _ = self.shutdown_tx.send(true);
        self.join
            .await
            .map_err(|e| HealthError::Refresh(format!("MTTR refresher task failed: {e}")))
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}
