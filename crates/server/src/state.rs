// crates/server/src/state.rs
//! Application state for the Axum server.

use std::sync::Arc;
use std::time::Instant;

use plotgrid_store::{ArtifactStore, MetadataStore, StoreConfig};

/// Shared application state accessible from all route handlers.
pub struct AppState {
    /// Server start time for uptime tracking.
    pub start_time: Instant,
    /// Resolved store configuration, read once from the environment in `main`.
    pub config: StoreConfig,
    /// Metadata index handle (DynamoDB in production, in-memory in tests).
    pub metadata: Arc<dyn MetadataStore>,
    /// Artifact store handle (S3 in production, in-memory in tests).
    pub artifacts: Arc<dyn ArtifactStore>,
}

impl AppState {
    /// Create a new application state wrapped in an Arc for sharing.
    pub fn new(
        config: StoreConfig,
        metadata: Arc<dyn MetadataStore>,
        artifacts: Arc<dyn ArtifactStore>,
    ) -> Arc<Self> {
        Arc::new(Self {
            start_time: Instant::now(),
            config,
            metadata,
            artifacts,
        })
    }

    /// Seconds since the server started.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotgrid_store::{InMemoryArtifactStore, InMemoryMetadataStore};

    #[test]
    fn test_uptime_starts_at_zero() {
        let state = AppState::new(
            StoreConfig::default(),
            Arc::new(InMemoryMetadataStore::new()),
            Arc::new(InMemoryArtifactStore::new()),
        );
        assert_eq!(state.uptime_secs(), 0);
    }
}
