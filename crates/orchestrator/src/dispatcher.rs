// crates/orchestrator/src/dispatcher.rs
//! Job dispatch: fans a batch of jobs out to the external plotting
//! executable with bounded parallelism and a per-job timeout.
//!
//! Every failure mode lands in the job's `JobResult`: spawn errors, nonzero
//! exits, and timeouts never abort the rest of the batch. Timed-out children
//! are reported failed but left running; the runner checkpoints its own
//! progress and a kill would lose the partial upload.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use plotgrid_core::{JobDescriptor, JobResult};
use thiserror::Error;
use tokio::process::Command;
use tokio::sync::{mpsc, Semaphore};

/// Per-job wall-clock limit.
pub const DEFAULT_JOB_TIMEOUT: Duration = Duration::from_secs(2 * 60 * 60);

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no jobs found in configuration")]
    EmptyBatch,

    #[error("max_parallel must be at least 1")]
    InvalidParallelism,
}

/// How a batch is executed.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// Path to the external plotting executable.
    pub runner: PathBuf,
    /// Working directory for the child processes.
    pub working_dir: PathBuf,
    /// Maximum number of concurrently live children.
    pub max_parallel: usize,
    /// API gateway id passed through to the runner.
    pub api_gateway_id: String,
    /// Per-job wall-clock limit.
    pub job_timeout: Duration,
}

/// Serialize one job into the runner's argument list.
pub fn job_args(job: &JobDescriptor, api_gateway_id: &str) -> Vec<String> {
    vec![
        "--city".to_string(),
        job.city.clone(),
        "--scenarios".to_string(),
        job.scenarios.join(","),
        "--outcomes".to_string(),
        job.outcomes.join(","),
        "--statistics".to_string(),
        job.statistics.join(","),
        "--facets".to_string(),
        job.facets.join(","),
        "--upload-s3".to_string(),
        "--register-db".to_string(),
        "--api-gateway-id".to_string(),
        api_gateway_id.to_string(),
        "--skip-existing".to_string(),
    ]
}

fn failed_result(job: JobDescriptor, duration_secs: f64, error: String) -> JobResult {
    let city = job.city.clone();
    let expected_plots = job.expected_plots;
    JobResult {
        job,
        city,
        success: false,
        duration_secs,
        expected_plots,
        stdout: None,
        stderr: None,
        error: Some(error),
        return_code: -1,
    }
}

/// Execute one job and capture its outcome.
pub async fn execute_job(options: &DispatchOptions, job: JobDescriptor) -> JobResult {
    let started = Instant::now();
    tracing::info!(city = %job.city, expected_plots = job.expected_plots, "Starting job");

    let child = Command::new(&options.runner)
        .args(job_args(&job, &options.api_gateway_id))
        .current_dir(&options.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(false)
        .spawn();

    let child = match child {
        Ok(child) => child,
        Err(e) => {
            return failed_result(
                job,
                started.elapsed().as_secs_f64(),
                format!("failed to spawn runner: {e}"),
            );
        }
    };

    match tokio::time::timeout(options.job_timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => {
            let return_code = output.status.code().unwrap_or(-1);
            let city = job.city.clone();
            let expected_plots = job.expected_plots;
            JobResult {
                job,
                city,
                success: output.status.success(),
                duration_secs: started.elapsed().as_secs_f64(),
                expected_plots,
                stdout: Some(String::from_utf8_lossy(&output.stdout).into_owned()),
                stderr: Some(String::from_utf8_lossy(&output.stderr).into_owned()),
                error: None,
                return_code,
            }
        }
        Ok(Err(e)) => failed_result(
            job,
            started.elapsed().as_secs_f64(),
            format!("failed to collect runner output: {e}"),
        ),
        Err(_) => {
            let hours = options.job_timeout.as_secs_f64() / 3600.0;
            failed_result(
                job,
                started.elapsed().as_secs_f64(),
                format!("Job timeout ({hours} hours)"),
            )
        }
    }
}

/// Run a batch of jobs with at most `max_parallel` live children.
///
/// Results arrive in completion order; `on_complete` is invoked once per job
/// with the result and the completed/total counts.
pub async fn run_batch<F>(
    jobs: Vec<JobDescriptor>,
    options: DispatchOptions,
    mut on_complete: F,
) -> Result<Vec<JobResult>, DispatchError>
where
    F: FnMut(&JobResult, usize, usize),
{
    if jobs.is_empty() {
        return Err(DispatchError::EmptyBatch);
    }
    // A zero-permit semaphore would park every worker forever.
    if options.max_parallel == 0 {
        return Err(DispatchError::InvalidParallelism);
    }

    let total = jobs.len();
    let options = Arc::new(options);
    let semaphore = Arc::new(Semaphore::new(options.max_parallel));
    let (tx, mut rx) = mpsc::channel(total);

    for job in jobs {
        let options = options.clone();
        let semaphore = semaphore.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return;
            };
            let result = execute_job(&options, job).await;
            let _ = tx.send(result).await;
        });
    }
    drop(tx);

    let mut results = Vec::with_capacity(total);
    let mut completed = 0;
    while let Some(result) = rx.recv().await {
        completed += 1;
        on_complete(&result, completed, total);
        results.push(result);
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    fn job(city: &str) -> JobDescriptor {
        JobDescriptor {
            city: city.to_string(),
            scenarios: vec!["cessation".to_string(), "brief_interruption".to_string()],
            outcomes: vec!["incidence".to_string()],
            statistics: vec!["mean.and.interval".to_string()],
            facets: vec!["none".to_string(), "sex".to_string()],
            expected_plots: 4,
            estimated_hours: 0.0,
        }
    }

    fn options(runner: PathBuf, working_dir: &Path, max_parallel: usize) -> DispatchOptions {
        DispatchOptions {
            runner,
            working_dir: working_dir.to_path_buf(),
            max_parallel,
            api_gateway_id: "ogavekpfi5".to_string(),
            job_timeout: DEFAULT_JOB_TIMEOUT,
        }
    }

    #[test]
    fn test_job_args_serialization() {
        let args = job_args(&job("C.12580"), "ogavekpfi5");
        assert_eq!(
            args,
            vec![
                "--city",
                "C.12580",
                "--scenarios",
                "cessation,brief_interruption",
                "--outcomes",
                "incidence",
                "--statistics",
                "mean.and.interval",
                "--facets",
                "none,sex",
                "--upload-s3",
                "--register-db",
                "--api-gateway-id",
                "ogavekpfi5",
                "--skip-existing",
            ]
        );
    }

    #[tokio::test]
    async fn test_successful_job_captures_output() {
        let dir = tempfile::tempdir().unwrap();
        let runner = script(dir.path(), "runner.sh", "echo generated; echo warn >&2");

        let result = execute_job(&options(runner, dir.path(), 1), job("C.12580")).await;

        assert!(result.success);
        assert_eq!(result.return_code, 0);
        assert_eq!(result.city, "C.12580");
        assert!(result.stdout.as_deref().unwrap().contains("generated"));
        assert!(result.stderr.as_deref().unwrap().contains("warn"));
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_failure_with_code() {
        let dir = tempfile::tempdir().unwrap();
        let runner = script(dir.path(), "runner.sh", "echo broken >&2; exit 3");

        let result = execute_job(&options(runner, dir.path(), 1), job("C.12580")).await;

        assert!(!result.success);
        assert_eq!(result.return_code, 3);
        assert!(result.stderr.as_deref().unwrap().contains("broken"));
    }

    #[tokio::test]
    async fn test_spawn_failure_is_captured() {
        let dir = tempfile::tempdir().unwrap();
        let result = execute_job(
            &options(dir.path().join("does_not_exist.sh"), dir.path(), 1),
            job("C.12580"),
        )
        .await;

        assert!(!result.success);
        assert_eq!(result.return_code, -1);
        assert!(result.error.as_deref().unwrap().contains("spawn"));
    }

    #[tokio::test]
    async fn test_timeout_marks_job_failed_promptly() {
        let dir = tempfile::tempdir().unwrap();
        let runner = script(dir.path(), "runner.sh", "sleep 5");
        let mut opts = options(runner, dir.path(), 1);
        opts.job_timeout = Duration::from_millis(200);

        let started = Instant::now();
        let result = execute_job(&opts, job("C.12580")).await;

        assert!(!result.success);
        assert_eq!(result.return_code, -1);
        assert!(result.error.as_deref().unwrap().contains("timeout"));
        assert!(
            started.elapsed() < Duration::from_secs(3),
            "timeout should not wait for the child"
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_batch_collects_all_results() {
        let dir = tempfile::tempdir().unwrap();
        let runner = script(
            dir.path(),
            "runner.sh",
            // Fail only the second city
            r#"case "$2" in C.12940) exit 1;; esac"#,
        );

        let jobs: Vec<_> = ["C.12580", "C.12940", "C.14460"]
            .iter()
            .map(|c| job(c))
            .collect();
        let mut seen = Vec::new();
        let results = run_batch(jobs, options(runner, dir.path(), 2), |r, done, total| {
            seen.push((r.city.clone(), done, total));
        })
        .await
        .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[2].1, 3);
        assert_eq!(seen[2].2, 3);

        let failed: Vec<_> = results.iter().filter(|r| !r.success).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].city, "C.12940");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_parallelism_is_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let runner = script(dir.path(), "runner.sh", "sleep 0.3");
        let jobs: Vec<_> = (0..4).map(|i| job(&format!("C.{i}"))).collect();

        let started = Instant::now();
        let results = run_batch(jobs, options(runner, dir.path(), 2), |_, _, _| {})
            .await
            .unwrap();
        let elapsed = started.elapsed();

        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| r.success));
        // 4 jobs of 300ms at parallelism 2 need at least two waves
        assert!(
            elapsed >= Duration::from_millis(550),
            "batch finished too fast for parallelism 2: {elapsed:?}"
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_parallelism_runs_jobs_concurrently() {
        let dir = tempfile::tempdir().unwrap();
        let runner = script(dir.path(), "runner.sh", "sleep 0.3");
        let jobs: Vec<_> = (0..4).map(|i| job(&format!("C.{i}"))).collect();

        let started = Instant::now();
        let results = run_batch(jobs, options(runner, dir.path(), 4), |_, _, _| {})
            .await
            .unwrap();
        let elapsed = started.elapsed();

        assert_eq!(results.len(), 4);
        // All four children run in one wave, well under the sequential 1.2s
        assert!(
            elapsed < Duration::from_millis(1100),
            "batch appears to have serialized: {elapsed:?}"
        );
    }

    #[tokio::test]
    async fn test_zero_parallelism_is_rejected_not_hung() {
        let dir = tempfile::tempdir().unwrap();
        let runner = script(dir.path(), "runner.sh", "exit 0");

        let batch = run_batch(
            vec![job("C.12580")],
            options(runner, dir.path(), 0),
            |_, _, _| {},
        );
        let err = tokio::time::timeout(Duration::from_secs(2), batch)
            .await
            .expect("zero parallelism must fail fast, not stall the batch")
            .unwrap_err();
        assert!(matches!(err, DispatchError::InvalidParallelism));
    }

    #[tokio::test]
    async fn test_empty_batch_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let runner = script(dir.path(), "runner.sh", "exit 0");
        let err = run_batch(vec![], options(runner, dir.path(), 2), |_, _, _| {})
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::EmptyBatch));
    }
}
