// crates/server/src/routes/health.rs
//! Health check endpoint for the API.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Response for the health check endpoint.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    /// Metadata table this instance is configured against.
    pub table: String,
    /// Artifact bucket this instance is configured against.
    pub bucket: String,
}

/// GET /api/health - Health check endpoint.
///
/// Reports liveness plus the table and bucket names this instance resolved
/// at startup, so a misconfigured deployment is visible from one request.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.uptime_secs(),
        table: state.config.table_name.clone(),
        bucket: state.config.bucket_name.clone(),
    })
}

/// Create the health routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "ok".to_string(),
            version: "0.3.0".to_string(),
            uptime_secs: 42,
            table: "plot-metadata-local".to_string(),
            bucket: "prerun-plots-bucket-local".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"uptime_secs\":42"));
        assert!(json.contains("\"table\":\"plot-metadata-local\""));
        assert!(json.contains("\"bucket\":\"prerun-plots-bucket-local\""));
    }
}
