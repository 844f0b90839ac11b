// crates/orchestrator/src/main.rs
//! Batch orchestration binary.
//!
//! `generate` turns a profile plus dimension overrides into YAML config
//! files; `run` executes a config against the external plotting runner with
//! bounded parallelism, a per-job timeout, and background resource sampling,
//! then persists the run report.

mod config;
mod dispatcher;
mod monitor;
mod report;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use plotgrid_core::{DimensionOverrides, Profile, RunReport, RunSummary};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::dispatcher::{run_batch, DispatchOptions, DEFAULT_JOB_TIMEOUT};
use crate::monitor::{MonitorConfig, ResourceMonitor};

#[derive(Parser)]
#[command(name = "plotgrid-batch", version, about = "Batch plot generation orchestrator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate orchestration config files from the job catalog
    Generate {
        /// Configuration profile: minimal, test, medium, or full
        #[arg(long, default_value = "test")]
        profile: String,

        /// Directory for the generated YAML files
        #[arg(long, default_value = "orchestration_configs")]
        output_dir: PathBuf,

        /// Override the profile's city list (comma-separated)
        #[arg(long, value_delimiter = ',')]
        cities: Option<Vec<String>>,

        /// Override the profile's scenario list (comma-separated)
        #[arg(long, value_delimiter = ',')]
        scenarios: Option<Vec<String>>,

        /// Override the profile's outcome list (comma-separated)
        #[arg(long, value_delimiter = ',')]
        outcomes: Option<Vec<String>>,

        /// Override the profile's statistic list (comma-separated)
        #[arg(long, value_delimiter = ',')]
        statistics: Option<Vec<String>>,

        /// Override the profile's facet list (comma-separated)
        #[arg(long, value_delimiter = ',')]
        facets: Option<Vec<String>>,
    },

    /// Execute a batch from a config file
    Run {
        /// Path to a master or single-job config YAML file
        config: PathBuf,

        /// Maximum number of parallel runner processes
        #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u64).range(1..))]
        max_parallel: u64,

        /// Disable background resource monitoring
        #[arg(long)]
        no_monitoring: bool,

        /// Path to the external plotting executable
        #[arg(long)]
        runner: PathBuf,

        /// Working directory for runner processes
        #[arg(long, default_value = ".")]
        working_dir: PathBuf,

        /// API gateway id passed through to the runner
        #[arg(long, default_value = "ogavekpfi5")]
        api_gateway_id: String,

        /// Directory for the persisted run report
        #[arg(long, default_value = "results")]
        results_dir: PathBuf,
    },
}

fn generate(
    profile: &str,
    output_dir: &PathBuf,
    overrides: DimensionOverrides,
) -> Result<()> {
    let profile: Profile = profile.parse()?;
    let (master, master_path) = config::write_configs(profile, &overrides, output_dir)?;

    tracing::info!(
        config_type = master.config_type,
        total_jobs = master.total_jobs,
        total_expected_plots = master.total_expected_plots,
        sequential_hours = master.estimated_total_hours,
        parallel_hours = master.estimated_parallel_hours,
        master_config = %master_path.display(),
        "Generated orchestration configuration"
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn run(
    config_path: PathBuf,
    max_parallel: usize,
    no_monitoring: bool,
    runner: PathBuf,
    working_dir: PathBuf,
    api_gateway_id: String,
    results_dir: PathBuf,
) -> Result<bool> {
    let batch = config::load_batch(&config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    let config_type = batch.config_type.clone().unwrap_or_else(|| "unknown".to_string());
    let total_expected: usize = batch.jobs.iter().map(|j| j.expected_plots).sum();

    tracing::info!(
        jobs = batch.jobs.len(),
        expected_plots = total_expected,
        max_parallel,
        estimated_parallel_hours = ?batch.estimated_parallel_hours,
        "Starting orchestration"
    );

    let monitor = (!no_monitoring).then(|| ResourceMonitor::start(MonitorConfig::default()));

    let options = DispatchOptions {
        runner,
        working_dir,
        max_parallel,
        api_gateway_id,
        job_timeout: DEFAULT_JOB_TIMEOUT,
    };

    let pb = ProgressBar::new(batch.jobs.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} jobs {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let batch_started = Instant::now();
    let started_at = Utc::now();
    let results = run_batch(batch.jobs, options, |result, completed, total| {
        pb.inc(1);
        if result.success {
            tracing::info!(
                city = %result.city,
                expected_plots = result.expected_plots,
                duration_mins = result.duration_secs / 60.0,
                completed,
                total,
                "Job succeeded"
            );
        } else {
            tracing::error!(
                city = %result.city,
                return_code = result.return_code,
                error = result.error.as_deref().unwrap_or("unknown error"),
                stderr = result.stderr.as_deref().unwrap_or(""),
                completed,
                total,
                "Job failed"
            );
        }
        if completed < total {
            let avg = batch_started.elapsed().as_secs_f64() / completed as f64;
            let remaining = Duration::from_secs_f64(avg * (total - completed) as f64);
            pb.set_message(format!("~{:.1}h remaining", remaining.as_secs_f64() / 3600.0));
        }
    })
    .await?;
    let finished_at = Utc::now();
    pb.finish_and_clear();

    if let Some(monitor) = monitor {
        monitor.stop().await;
    }

    let summary = RunSummary::compute(
        &config_path.display().to_string(),
        &config_type,
        &results,
        started_at,
        finished_at,
        max_parallel,
    );
    tracing::info!(
        total_duration_hours = summary.total_duration_hours,
        successful_jobs = summary.successful_jobs,
        failed_jobs = summary.failed_jobs,
        successful_plots = summary.successful_plots,
        total_expected_plots = summary.total_expected_plots,
        average_seconds_per_plot = ?summary.average_seconds_per_plot,
        full_scale_estimate_hours = ?summary.full_scale_estimate_hours,
        "Orchestration complete"
    );

    let all_succeeded = summary.all_succeeded();
    let report = RunReport {
        orchestration_summary: summary,
        job_results: results,
    };
    let report_path = report::save_report(&results_dir, &report)?;
    tracing::info!(path = %report_path.display(), "Run report saved");

    Ok(all_succeeded)
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    match cli.command {
        Command::Generate {
            profile,
            output_dir,
            cities,
            scenarios,
            outcomes,
            statistics,
            facets,
        } => {
            let overrides = DimensionOverrides {
                cities,
                scenarios,
                outcomes,
                statistics,
                facets,
            };
            generate(&profile, &output_dir, overrides)?;
        }
        Command::Run {
            config,
            max_parallel,
            no_monitoring,
            runner,
            working_dir,
            api_gateway_id,
            results_dir,
        } => {
            let all_succeeded = run(
                config,
                max_parallel as usize,
                no_monitoring,
                runner,
                working_dir,
                api_gateway_id,
                results_dir,
            )
            .await?;
            if !all_succeeded {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
