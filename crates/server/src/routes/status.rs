// crates/server/src/routes/status.rs
//! Storage connectivity status endpoint.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::error::ApiResult;
use crate::state::AppState;

/// Response for the storage status endpoint.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct StorageStatusResponse {
    pub status: String,
    pub bucket: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub object_count: usize,
}

/// GET /api/status/storage - Probe the artifact store.
///
/// Lists the configured bucket and reports how many objects it holds; a
/// working response means credentials, endpoint, and bucket all line up.
pub async fn storage_status(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<StorageStatusResponse>> {
    let probe = state.artifacts.probe().await?;
    Ok(Json(StorageStatusResponse {
        status: "ok".to_string(),
        bucket: probe.bucket,
        endpoint: state.config.s3_endpoint.clone(),
        object_count: probe.object_count,
    }))
}

/// Create the status routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/status/storage", get(storage_status))
}
