// crates/core/src/lib.rs
//! Core domain logic for plotgrid: the job catalog, composite-key rules,
//! and run-summary math. No I/O lives here; the store and orchestrator
//! crates layer DynamoDB/S3 access and process execution on top.

pub mod catalog;
pub mod error;
pub mod keys;
pub mod summary;
pub mod types;

pub use catalog::{generate_jobs, DimensionOverrides, Profile, SECONDS_PER_PLOT};
pub use error::CatalogError;
pub use keys::{composite_key, normalize_plot_key, sort_key, split_composite_key};
pub use summary::{RunReport, RunSummary};
pub use types::{JobDescriptor, JobResult, PlotRecord};
