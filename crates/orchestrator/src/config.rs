// crates/orchestrator/src/config.rs
//! Orchestration config files: generation from the catalog and loading for a
//! batch run. One master YAML describes the whole batch; one single-job YAML
//! per city allows re-running an individual city by hand.

use std::path::{Path, PathBuf};

use plotgrid_core::catalog::{
    estimated_parallel_hours, estimated_total_hours, generate_jobs, total_expected_plots,
};
use plotgrid_core::{DimensionOverrides, JobDescriptor, Profile};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("yaml error at {path}: {message}")]
    Yaml { path: PathBuf, message: String },
}

fn io_err(path: &Path, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// The master batch configuration, serialized to
/// `master_config_<profile>.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterConfig {
    pub strategy: String,
    pub config_type: String,
    pub total_jobs: usize,
    pub total_expected_plots: usize,
    pub estimated_total_hours: f64,
    pub estimated_parallel_hours: f64,
    pub jobs: Vec<JobDescriptor>,
}

/// A loaded batch config. Tolerant of hand-edited files: only `jobs` matters
/// for execution, everything else is advisory.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    #[serde(default)]
    pub config_type: Option<String>,
    #[serde(default)]
    pub estimated_parallel_hours: Option<f64>,
    #[serde(default)]
    pub jobs: Vec<JobDescriptor>,
}

/// Wrapper for the single-job files, `job_<profile>_<NN>_<city>.yaml`.
#[derive(Debug, Serialize, Deserialize)]
struct SingleJobConfig {
    jobs: Vec<JobDescriptor>,
}

/// Generate the master config plus one single-job file per city.
///
/// Returns the master config and the path it was written to.
pub fn write_configs(
    profile: Profile,
    overrides: &DimensionOverrides,
    output_dir: &Path,
) -> Result<(MasterConfig, PathBuf), ConfigError> {
    let jobs = generate_jobs(profile, overrides);
    let master = MasterConfig {
        strategy: "city_based_chunking".to_string(),
        config_type: profile.as_str().to_string(),
        total_jobs: jobs.len(),
        total_expected_plots: total_expected_plots(&jobs),
        estimated_total_hours: estimated_total_hours(&jobs),
        estimated_parallel_hours: estimated_parallel_hours(&jobs),
        jobs,
    };

    std::fs::create_dir_all(output_dir).map_err(|e| io_err(output_dir, e))?;

    let master_path = output_dir.join(format!("master_config_{}.yaml", master.config_type));
    write_yaml(&master_path, &master)?;

    for (i, job) in master.jobs.iter().enumerate() {
        let job_path = output_dir.join(format!(
            "job_{}_{:02}_{}.yaml",
            master.config_type,
            i + 1,
            job.city
        ));
        write_yaml(
            &job_path,
            &SingleJobConfig {
                jobs: vec![job.clone()],
            },
        )?;
    }

    Ok((master, master_path))
}

fn write_yaml<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    let yaml = serde_yaml::to_string(value).map_err(|e| ConfigError::Yaml {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    std::fs::write(path, yaml).map_err(|e| io_err(path, e))
}

/// Load a batch config (master or single-job file) for execution.
pub fn load_batch(path: &Path) -> Result<BatchConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    serde_yaml::from_str(&text).map_err(|e| ConfigError::Yaml {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
