//! MTTR refresher against SQLite: readers keep getting the last complete
//! value while a cycle is running.

mod common;

use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use tokio::sync::Notify;
use workflow_health::config::MttrCacheConfig;
use workflow_health::constants::RunStatus;
use workflow_health::database::RunRepository;
use workflow_health::error::Result;
use workflow_health::models::{MetricsSelection, Run, Workflow};
use workflow_health::mttr::{MttrCacheStore, MttrRefresher, RunHistorySource};

use common::{RunHistoryBuilder, TestDb};

/// Pauses inside `runs_for_workflow` for one workflow until released
struct GatedHistory {
    inner: Arc<RunRepository>,
    gated_workflow: String,
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl RunHistorySource for GatedHistory {
    async fn list_workflows(&self) -> Result<Vec<Workflow>> {
        self.inner.list_workflows().await
    }

    async fn runs_for_workflow(&self, workflow_id: &str) -> Result<Vec<Run>> {
        if workflow_id == self.gated_workflow {
            self.entered.notify_one();
            self.release.notified().await;
        }
        self.inner.runs_for_workflow(workflow_id).await
    }
}

/// One recovery of an hour, then (in the second half) one of half an hour
fn two_recoveries(workflow_id: &str) -> Vec<Run> {
    let start = Utc.with_ymd_and_hms(2024, 5, 20, 9, 0, 0).unwrap();
    RunHistoryBuilder::new(workflow_id, start)
        .completed(RunStatus::Failure, 1)
        .completed(RunStatus::Success, 1)
        .with_gap(Duration::minutes(30))
        .completed(RunStatus::Failure, 1)
        .completed(RunStatus::Success, 1)
        .build()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_reads_during_cycle_return_previous_value() {
    let test_db = TestDb::new().await;
    let alpha = Workflow::new("alpha", "octo/app", "Alpha");
    let beta = Workflow::new("beta", "octo/app", "Beta");
    let alpha_runs = two_recoveries("alpha");
    let beta_runs = two_recoveries("beta");

    test_db.seed(&alpha, &alpha_runs[..2]).await;
    test_db.seed(&beta, &beta_runs[..2]).await;
    test_db.refresher().refresh_cycle().await.unwrap();

    let before = test_db.mttr_store.get("beta").await.unwrap().unwrap();
    assert_eq!(before.mttr_seconds, 3600.0);
    assert_eq!(before.sample_size, 1);

    test_db.runs.upsert_runs_batch(&alpha_runs[2..]).await.unwrap();
    test_db.runs.upsert_runs_batch(&beta_runs[2..]).await.unwrap();

    let history = Arc::new(GatedHistory {
        inner: test_db.runs.clone(),
        gated_workflow: "beta".to_string(),
        entered: Notify::new(),
        release: Notify::new(),
    });
    let refresher = Arc::new(MttrRefresher::new(
        history.clone(),
        test_db.mttr_store.clone(),
        Arc::new(test_db.clock.clone()),
        MttrCacheConfig::for_test(),
    ));

    let cycle = tokio::spawn({
        let refresher = refresher.clone();
        async move { refresher.refresh_cycle().await }
    });
    history.entered.notified().await;

    // Mid-cycle: alpha is already refreshed, beta still serves the previous entry
    let queries = test_db.metrics_queries();
    let during = tokio::time::timeout(StdDuration::from_secs(2), async {
        (
            test_db.mttr_store.get("alpha").await,
            test_db.mttr_store.get("beta").await,
            queries
                .cached_mttr(&MetricsSelection::workflow("octo/app", "beta", 30))
                .await,
        )
    })
    .await
    .expect("reads must not wait for the refresh cycle");

    assert_eq!(during.0.unwrap().unwrap().mttr_seconds, 2700.0);
    assert_eq!(during.1.unwrap(), Some(before.clone()));
    assert_eq!(during.2.unwrap(), Some(3600.0));

    history.release.notify_one();
    let summary = cycle.await.unwrap().unwrap();
    assert_eq!(summary.refreshed, 2);
    assert_eq!(summary.failed, 0);

    let after = test_db.mttr_store.get("beta").await.unwrap().unwrap();
    assert_eq!(after.mttr_seconds, 2700.0);
    assert_eq!(after.sample_size, 2);
}

#[tokio::test]
async fn test_unrecovered_and_in_flight_runs_add_no_samples() {
    let test_db = TestDb::new().await;
    let workflow = Workflow::new("deploy", "octo/app", "Deploy");
    let start = Utc.with_ymd_and_hms(2024, 5, 25, 12, 0, 0).unwrap();
    let runs = RunHistoryBuilder::new("deploy", start)
        .completed(RunStatus::Success, 2)
        .completed(RunStatus::Cancelled, 1)
        .completed(RunStatus::Failure, 2)
        .in_flight(RunStatus::Success)
        .build();
    test_db.seed(&workflow, &runs).await;

    let refresher = test_db.refresher();
    let summary = refresher.refresh_cycle().await.unwrap();

    assert_eq!(summary.refreshed, 0);
    assert_eq!(summary.cleared, 0);
    assert_eq!(test_db.mttr_store.get("deploy").await.unwrap(), None);

    // The in-flight run finishing recovers both failures
    let finished = Run::new(
        runs[5].id.clone(),
        "deploy",
        RunStatus::Success,
        runs[5].started_at,
        Some(runs[5].started_at + Duration::minutes(10)),
    );
    test_db.runs.upsert_runs_batch(&[finished]).await.unwrap();
    refresher.refresh_cycle().await.unwrap();

    let entry = test_db.mttr_store.get("deploy").await.unwrap().unwrap();
    assert_eq!(entry.sample_size, 2);
    // failures completed at +3h10m and +4h10m, recovery completed at +5h10m
    assert_eq!(entry.mttr_seconds, 5400.0);
    assert_eq!(entry.calculated_at, common::test_now());
}

#[tokio::test]
async fn test_spawned_refresher_populates_cache_and_stops() {
    let test_db = TestDb::new().await;
    test_db
        .seed(&Workflow::new("ci", "octo/app", "CI"), &two_recoveries("ci"))
        .await;

    let handle = Arc::new(test_db.refresher()).spawn();
    for _ in 0..100 {
        if test_db.mttr_store.get("ci").await.unwrap().is_some() {
            break;
        }
        tokio::time::sleep(StdDuration::from_millis(10)).await;
    }
    assert!(!handle.is_finished());
    handle.shutdown().await.unwrap();

    let entry = test_db.mttr_store.get("ci").await.unwrap().unwrap();
    assert_eq!(entry.mttr_seconds, 2700.0);
}
