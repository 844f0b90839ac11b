// crates/server/src/routes/cities.rs
//! City listing endpoint.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use plotgrid_core::split_composite_key;
use serde::Serialize;

use crate::error::ApiResult;
use crate::state::AppState;

/// Response for the city listing endpoint.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct CitiesResponse {
    /// City code to sorted, de-duplicated scenario list.
    pub cities: BTreeMap<String, Vec<String>>,
    pub total_cities: usize,
}

/// GET /api/cities - List every city with registered plots and its scenarios.
///
/// Scans the partition keys of the whole table and splits each on the first
/// `#`. Keys without a separator are skipped.
pub async fn list_cities(State(state): State<Arc<AppState>>) -> ApiResult<Json<CitiesResponse>> {
    let keys = state.metadata.scan_partition_keys().await?;

    let mut cities: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for key in &keys {
        let Some((city, scenario)) = split_composite_key(key) else {
            tracing::warn!(key = %key, "Skipping malformed partition key");
            continue;
        };
        let scenarios = cities.entry(city.to_string()).or_default();
        if !scenarios.iter().any(|s| s == scenario) {
            scenarios.push(scenario.to_string());
        }
    }
    for scenarios in cities.values_mut() {
        scenarios.sort();
    }

    let total_cities = cities.len();
    Ok(Json(CitiesResponse {
        cities,
        total_cities,
    }))
}

/// Create the cities routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/cities", get(list_cities))
}
