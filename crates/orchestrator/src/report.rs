// crates/orchestrator/src/report.rs
//! Persisting the run report after a batch completes.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use plotgrid_core::RunReport;

/// Write the report as pretty-printed JSON under `results_dir`, stamped with
/// the local completion time. Returns the written path.
pub fn save_report(results_dir: &Path, report: &RunReport) -> Result<PathBuf> {
    std::fs::create_dir_all(results_dir)
        .with_context(|| format!("creating results dir {}", results_dir.display()))?;

    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = results_dir.join(format!("orchestration_results_{stamp}.json"));

    let json = serde_json::to_vec_pretty(report).context("serializing run report")?;
    std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;

    Ok(path)
}
