// crates/server/src/routes/plot.rs
//! Plot artifact fetch endpoint.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use plotgrid_core::normalize_plot_key;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Query parameters for the plot fetch endpoint.
#[derive(Debug, Deserialize)]
pub struct PlotParams {
    #[serde(rename = "plotKey")]
    pub plot_key: Option<String>,
}

/// GET /api/plot - Fetch one plot artifact by its storage key.
///
/// Keys ending in `_metadata.json` are rewritten to `.json` before lookup,
/// so callers holding a metadata key still get the plot payload. The stored
/// body must be valid JSON and is returned verbatim.
pub async fn fetch_plot(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PlotParams>,
) -> ApiResult<impl IntoResponse> {
    let raw_key = params
        .plot_key
        .filter(|k| !k.is_empty())
        .ok_or_else(|| ApiError::MissingParameters("plotKey".to_string()))?;
    let key = normalize_plot_key(&raw_key);

    let body = match state.artifacts.fetch(&key).await {
        Ok(body) => body,
        Err(plotgrid_store::StoreError::NotFound { .. }) => {
            return Err(ApiError::PlotNotFound(key));
        }
        Err(err) => return Err(err.into()),
    };

    serde_json::from_slice::<serde::de::IgnoredAny>(&body)
        .map_err(|e| ApiError::Internal(format!("stored plot {key} is not valid JSON: {e}")))?;

    tracing::debug!(key = %key, bytes = body.len(), "Plot fetched");

    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}

/// Create the plot routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/plot", get(fetch_plot))
}
