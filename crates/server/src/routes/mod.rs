//! API route handlers for the plotgrid server.

pub mod cities;
pub mod health;
pub mod plot;
pub mod register;
pub mod search;
pub mod status;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Create the combined API router with all routes under /api prefix.
///
/// Routes:
/// - GET /api/health - Health check
/// - GET /api/plots/search - Query plot metadata for a city/scenario pair
/// - POST /api/plots/register - Register one plot's metadata
/// - GET /api/cities - List cities and their available scenarios
/// - GET /api/plot - Fetch one plot artifact by key
/// - GET /api/status/storage - Artifact store connectivity probe
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", health::router())
        .nest("/api", search::router())
        .nest("/api", register::router())
        .nest("/api", cities::router())
        .nest("/api", plot::router())
        .nest("/api", status::router())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotgrid_store::{InMemoryArtifactStore, InMemoryMetadataStore, StoreConfig};

    #[tokio::test]
    async fn test_api_routes_creation() {
        let state = AppState::new(
            StoreConfig::default(),
            Arc::new(InMemoryMetadataStore::new()),
            Arc::new(InMemoryArtifactStore::new()),
        );
        let _router = api_routes(state);
    }
}
