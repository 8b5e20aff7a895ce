//! # Workflow Health Report
//!
//! Command-line entry point: loads configuration, opens run storage, keeps
//! the MTTR aggregate cache fresh and prints health reports.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use workflow_health::clock::{Clock, SystemClock};
use workflow_health::config::cache_config::log_cache_configuration;
use workflow_health::config::ConfigManager;
use workflow_health::database::{DatabaseConnection, RunRepository, SqlMetricsQueries, SqliteMttrStore};
use workflow_health::logging::init_structured_logging;
use workflow_health::models::MetricsSelection;
use workflow_health::mttr::MttrRefresher;
use workflow_health::services::{HealthReport, HealthScoreService};
use workflow_health::utils::{format_duration, format_mttr};

#[derive(Parser)]
#[command(name = "health-report")]
#[command(about = "Score CI/CD workflow health from recorded run history")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Environment to load (development, test, production)
    #[arg(short, long)]
    env: Option<String>,

    /// Configuration directory path (default: config)
    #[arg(short, long)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print health reports for one repository or all of them
    Report {
        /// Repository as owner/name; every stored repository when omitted
        #[arg(short, long)]
        repository: Option<String>,

        /// Restrict the report to a single workflow id
        #[arg(short, long, requires = "repository")]
        workflow: Option<String>,

        /// Rolling window in days
        #[arg(short, long, default_value_t = 30)]
        days: u32,

        /// Recompute MTTR aggregates before reporting
        #[arg(long)]
        refresh_once: bool,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Run a single MTTR refresh cycle and exit
    Refresh,

    /// Keep the MTTR aggregate cache fresh until interrupted
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let manager = match &cli.env {
        Some(env) => ConfigManager::load_from_directory_with_env(cli.config_dir.clone(), env),
        None => ConfigManager::load_from_directory(cli.config_dir.clone()),
    }
    .context("failed to load configuration")?;
    let config = manager.config();

    init_structured_logging(&config.logging);
    info!(environment = manager.environment(), "Configuration loaded");
    log_cache_configuration(&config.mttr_cache, &config.read_cache);

    let db = DatabaseConnection::connect(&config.database)
        .await
        .context("failed to open run storage")?;
    if !db.health_check().await? {
        anyhow::bail!("run storage failed its health check");
    }
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let runs = Arc::new(RunRepository::new(db.pool().clone()));
    let store = Arc::new(SqliteMttrStore::new(db.pool().clone()));
    let refresher = Arc::new(MttrRefresher::new(
        runs.clone(),
        store.clone(),
        clock.clone(),
        config.mttr_cache.clone(),
    ));

    match cli.command {
        Commands::Refresh => {
            let summary = refresher.refresh_cycle().await?;
            println!(
                "refreshed {} workflows, cleared {}, failed {} in {}ms",
                summary.refreshed,
                summary.cleared,
                summary.failed,
                summary.duration.as_millis()
            );
        }
        Commands::Watch => {
            let handle = refresher.spawn();
            tokio::signal::ctrl_c()
                .await
                .context("failed to listen for shutdown signal")?;
            info!("Shutdown requested");
            handle.shutdown().await?;
        }
        Commands::Report {
            repository,
            workflow,
            days,
            refresh_once,
            json,
        } => {
            if refresh_once {
                refresher.refresh_cycle().await?;
            }

            let queries = Arc::new(SqlMetricsQueries::new(db.pool().clone(), store, clock.clone()));
            let service = HealthScoreService::new(config, queries, clock)?;

            let selections = match (repository, workflow) {
                (Some(repository), Some(workflow)) => {
                    vec![MetricsSelection::workflow(repository, workflow, days)]
                }
                (Some(repository), None) => selections_for(&runs, &repository, days).await?,
                (None, _) => {
                    let mut selections = Vec::new();
                    for repository in runs.repositories().await? {
                        selections.extend(selections_for(&runs, &repository, days).await?);
                    }
                    selections
                }
            };

            let mut reports = Vec::with_capacity(selections.len());
            for selection in &selections {
                reports.push(service.health_report(selection).await);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                reports.iter().for_each(print_report);
            }
        }
    }

    db.close().await;
    Ok(())
}

/// Repository-wide selection followed by one per workflow
async fn selections_for(
    runs: &RunRepository,
    repository: &str,
    days: u32,
) -> Result<Vec<MetricsSelection>> {
    let mut selections = vec![MetricsSelection::repository(repository, days)];
    for workflow in runs.workflows_for_repository(repository).await? {
        selections.push(MetricsSelection::workflow(repository, workflow.id, days));
    }
    Ok(selections)
}

fn print_report(report: &HealthReport) {
    let result = &report.result;
    let raw = &report.raw_metrics;
    let success = raw
        .success_rate
        .map_or_else(|| "N/A".to_string(), |rate| format!("{rate:.2}%"));

    println!(
        "{:<40} {:>5.1} {:<9} quality={:<12} success={} ({}) mttr={} duration={} runs={}",
        report.selection.to_string(),
        result.overall_score,
        result.health_class.as_str(),
        result.data_quality.as_str(),
        success,
        report.success_rate_band.as_str(),
        format_mttr(raw.mttr_seconds),
        format_duration(raw.avg_duration_seconds),
        raw.total_runs,
    );
    for warning in &result.warnings {
        println!("    warning: {warning}");
    }
    for error in &result.errors {
        println!("    error: {error}");
    }
}
