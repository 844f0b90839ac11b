// crates/store/src/lib.rs
//! Store access layer: the DynamoDB metadata index and the S3 artifact
//! bucket, each behind a trait so handlers and tests never touch the SDK
//! directly. Configuration is an explicit struct built once at process start;
//! nothing in this crate reads the environment after that.

pub mod artifacts;
pub mod attrs;
pub mod config;
pub mod error;
pub mod memory;
pub mod metadata;

pub use artifacts::{ArtifactStore, S3ArtifactStore, StorageProbe};
pub use config::StoreConfig;
pub use error::StoreError;
pub use memory::{InMemoryArtifactStore, InMemoryMetadataStore};
pub use metadata::{DynamoMetadataStore, MetadataStore};
