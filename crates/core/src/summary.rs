// crates/core/src/summary.rs
//! Run-summary aggregation for one dispatch invocation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::full_scale_plot_count;
use crate::types::JobResult;

/// Write-once aggregate of all job results for one dispatch invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub config_file: String,
    pub config_type: String,
    pub start_time: String,
    pub end_time: String,
    pub total_duration_hours: f64,
    pub total_jobs: usize,
    pub successful_jobs: usize,
    pub failed_jobs: usize,
    pub total_expected_plots: usize,
    pub successful_plots: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_seconds_per_plot: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_scale_estimate_hours: Option<f64>,
    pub max_parallel: usize,
}

/// The persisted run record: summary plus every per-job result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub orchestration_summary: RunSummary,
    pub job_results: Vec<JobResult>,
}

impl RunSummary {
    /// Aggregate job results into a summary.
    ///
    /// The average seconds-per-plot is wall-clock batch duration divided by
    /// successfully produced plots; the full-scale estimate extrapolates that
    /// rate to the complete catalog.
    pub fn compute(
        config_file: &str,
        config_type: &str,
        results: &[JobResult],
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        max_parallel: usize,
    ) -> Self {
        let total_duration_secs = (finished_at - started_at)
            .to_std()
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        let successful_jobs = results.iter().filter(|r| r.success).count();
        let total_expected_plots: usize = results.iter().map(|r| r.expected_plots).sum();
        let successful_plots: usize = results
            .iter()
            .filter(|r| r.success)
            .map(|r| r.expected_plots)
            .sum();

        let average_seconds_per_plot = if successful_plots > 0 {
            Some(total_duration_secs / successful_plots as f64)
        } else {
            None
        };
        let full_scale_estimate_hours = average_seconds_per_plot
            .map(|avg| full_scale_plot_count() as f64 * avg / 3600.0);

        Self {
            config_file: config_file.to_string(),
            config_type: config_type.to_string(),
            start_time: started_at.to_rfc3339(),
            end_time: finished_at.to_rfc3339(),
            total_duration_hours: total_duration_secs / 3600.0,
            total_jobs: results.len(),
            successful_jobs,
            failed_jobs: results.len() - successful_jobs,
            total_expected_plots,
            successful_plots,
            average_seconds_per_plot,
            full_scale_estimate_hours,
            max_parallel,
        }
    }

    /// Whether every job in the batch succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.failed_jobs == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JobDescriptor;
    use chrono::TimeZone;

    fn result(city: &str, success: bool, plots: usize) -> JobResult {
        JobResult {
            job: JobDescriptor {
                city: city.to_string(),
                scenarios: vec!["cessation".to_string()],
                outcomes: vec!["incidence".to_string()],
                statistics: vec!["mean.and.interval".to_string()],
                facets: vec!["none".to_string()],
                expected_plots: plots,
                estimated_hours: 0.0,
            },
            city: city.to_string(),
            success,
            duration_secs: 10.0,
            expected_plots: plots,
            stdout: None,
            stderr: None,
            error: if success {
                None
            } else {
                Some("exit code 1".to_string())
            },
            return_code: if success { 0 } else { 1 },
        }
    }

    fn span_secs(secs: i64) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = Utc.with_ymd_and_hms(2025, 6, 10, 20, 0, 0).unwrap();
        (start, start + chrono::Duration::seconds(secs))
    }

    #[test]
    fn test_compute_counts() {
        let results = vec![
            result("C.12580", true, 27),
            result("C.12940", false, 27),
            result("C.14460", true, 27),
        ];
        let (start, end) = span_secs(540);
        let summary = RunSummary::compute("cfg.yaml", "test", &results, start, end, 2);

        assert_eq!(summary.total_jobs, 3);
        assert_eq!(summary.successful_jobs, 2);
        assert_eq!(summary.failed_jobs, 1);
        assert_eq!(summary.total_expected_plots, 81);
        assert_eq!(summary.successful_plots, 54);
        assert!(!summary.all_succeeded());
        // 540s over 54 plots -> 10s per plot
        assert_eq!(summary.average_seconds_per_plot, Some(10.0));
    }

    #[test]
    fn test_compute_full_scale_extrapolation() {
        let results = vec![result("C.12580", true, 100)];
        let (start, end) = span_secs(405);
        let summary = RunSummary::compute("cfg.yaml", "medium", &results, start, end, 1);

        // 4.05s per plot extrapolated over the whole catalog
        let avg = summary.average_seconds_per_plot.unwrap();
        assert!((avg - 4.05).abs() < 1e-9);
        let expected = full_scale_plot_count() as f64 * 4.05 / 3600.0;
        assert!((summary.full_scale_estimate_hours.unwrap() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_compute_no_successes_has_no_rate() {
        let results = vec![result("C.12580", false, 27)];
        let (start, end) = span_secs(60);
        let summary = RunSummary::compute("cfg.yaml", "test", &results, start, end, 1);

        assert_eq!(summary.average_seconds_per_plot, None);
        assert_eq!(summary.full_scale_estimate_hours, None);
        assert!(!summary.all_succeeded());
    }

    #[test]
    fn test_summary_json_shape() {
        let (start, end) = span_secs(60);
        let summary = RunSummary::compute("cfg.yaml", "minimal", &[], start, end, 2);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["config_type"], "minimal");
        assert_eq!(json["total_jobs"], 0);
        assert_eq!(json["max_parallel"], 2);
        // No successes: rate fields are omitted entirely
        assert!(json.get("average_seconds_per_plot").is_none());
    }
}
