// crates/core/src/types.rs
//! Domain types shared by the catalog, the dispatcher, and the HTTP surface.

use serde::{Deserialize, Serialize};

/// One unit of work for the external plotting executable.
///
/// A descriptor covers a single city with the full cross-product of the other
/// dimensions, so one invocation can reuse the loaded simulation for that
/// city. `expected_plots` always equals the product of the dimension-list
/// lengths; descriptors are immutable once generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescriptor {
    pub city: String,
    pub scenarios: Vec<String>,
    pub outcomes: Vec<String>,
    pub statistics: Vec<String>,
    pub facets: Vec<String>,
    pub expected_plots: usize,
    pub estimated_hours: f64,
}

/// Outcome of one dispatched job, recorded in completion order.
///
/// A job never raises past its own boundary: spawn failures, nonzero exits,
/// and timeouts all land here as `success = false` with the error preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResult {
    pub job: JobDescriptor,
    pub city: String,
    pub success: bool,
    pub duration_secs: f64,
    pub expected_plots: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub return_code: i32,
}

/// One registered plot artifact in the metadata table.
///
/// `city_scenario` is the partition key and `outcome_stat_facet` the sort
/// key; re-registering the same pair overwrites the record (last write wins).
/// `file_size` is a `serde_json::Number` so that fixed-point values read back
/// from the store serialize as a plain integer when whole and a float
/// otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotRecord {
    pub city_scenario: String,
    pub outcome_stat_facet: String,
    pub outcome: String,
    pub statistic_type: String,
    pub facet_choice: String,
    pub s3_key: String,
    pub file_size: serde_json::Number,
    pub created_at: String,
}
