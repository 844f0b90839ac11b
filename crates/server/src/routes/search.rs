// crates/server/src/routes/search.rs
//! Plot metadata search endpoint.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use plotgrid_core::{composite_key, PlotRecord};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Query parameters for the search endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub city: Option<String>,
    pub scenario: Option<String>,
    /// Optional comma-separated outcome allow-list.
    pub outcomes: Option<String>,
}

/// One plot in a search response. Projects the stored record down to its
/// dimension fields and artifact details; the composite table keys stay
/// internal.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct PlotSummary {
    pub outcome: String,
    pub statistic_type: String,
    pub facet_choice: String,
    pub s3_key: String,
    pub file_size: serde_json::Number,
    pub created_at: String,
}

impl From<PlotRecord> for PlotSummary {
    fn from(record: PlotRecord) -> Self {
        Self {
            outcome: record.outcome,
            statistic_type: record.statistic_type,
            facet_choice: record.facet_choice,
            s3_key: record.s3_key,
            file_size: record.file_size,
            created_at: record.created_at,
        }
    }
}

/// Response for the search endpoint.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct SearchResponse {
    pub city: String,
    pub scenario: String,
    pub total_plots: usize,
    pub plots: Vec<PlotSummary>,
}

/// GET /api/plots/search - Query registered plots for one city/scenario pair.
///
/// Requires `city` and `scenario`; an optional comma-separated `outcomes`
/// list narrows the result after the partition query.
pub async fn search_plots(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<SearchResponse>> {
    let mut missing = Vec::new();
    if params.city.as_deref().unwrap_or("").is_empty() {
        missing.push("city");
    }
    if params.scenario.as_deref().unwrap_or("").is_empty() {
        missing.push("scenario");
    }
    if !missing.is_empty() {
        return Err(ApiError::MissingParameters(missing.join(", ")));
    }
    let city = params.city.unwrap_or_default();
    let scenario = params.scenario.unwrap_or_default();

    let partition = composite_key(&city, &scenario);
    let mut plots = state.metadata.query_plots(&partition).await?;

    if let Some(allow_list) = &params.outcomes {
        let wanted: Vec<&str> = allow_list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if !wanted.is_empty() {
            plots.retain(|p| wanted.contains(&p.outcome.as_str()));
        }
    }

    tracing::debug!(
        city = %city,
        scenario = %scenario,
        total = plots.len(),
        "Plot search"
    );

    let plots: Vec<PlotSummary> = plots.into_iter().map(PlotSummary::from).collect();
    Ok(Json(SearchResponse {
        city,
        scenario,
        total_plots: plots.len(),
        plots,
    }))
}

/// Create the search routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/plots/search", get(search_plots))
}
