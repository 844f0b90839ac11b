// crates/server/src/routes/register.rs
//! Plot metadata registration endpoint.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use plotgrid_core::{composite_key, sort_key, PlotRecord};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// JSON body for the register endpoint. All fields optional at the serde
/// level so that missing ones can be reported together in one 400.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub city: Option<String>,
    pub scenario: Option<String>,
    pub outcome: Option<String>,
    pub statistic_type: Option<String>,
    pub facet_choice: Option<String>,
    pub s3_key: Option<String>,
    pub file_size: Option<serde_json::Number>,
    pub created_at: Option<String>,
}

/// Response for a successful registration.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct RegisterResponse {
    pub message: String,
    pub city_scenario: String,
    pub outcome_stat_facet: String,
    pub s3_key: String,
}

fn require<'a>(
    field: &'static str,
    value: &'a Option<String>,
    missing: &mut Vec<&'static str>,
) -> &'a str {
    match value.as_deref().filter(|v| !v.is_empty()) {
        Some(v) => v,
        None => {
            missing.push(field);
            ""
        }
    }
}

/// POST /api/plots/register - Upsert one plot's metadata record.
///
/// Derives the partition and sort keys from the dimension fields. Re-posting
/// the same keys overwrites the previous record (last write wins). An
/// unparseable body is a structured 400, not axum's plain-text rejection.
pub async fn register_plot(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let Json(body) = body.map_err(|rejection| {
        ApiError::BadRequest(format!("Invalid JSON in request body: {rejection}"))
    })?;

    let mut missing = Vec::new();
    let city = require("city", &body.city, &mut missing);
    let scenario = require("scenario", &body.scenario, &mut missing);
    let outcome = require("outcome", &body.outcome, &mut missing);
    let statistic_type = require("statistic_type", &body.statistic_type, &mut missing);
    let facet_choice = require("facet_choice", &body.facet_choice, &mut missing);
    let s3_key = require("s3_key", &body.s3_key, &mut missing);
    if !missing.is_empty() {
        return Err(ApiError::MissingParameters(missing.join(", ")));
    }

    let record = PlotRecord {
        city_scenario: composite_key(city, scenario),
        outcome_stat_facet: sort_key(outcome, statistic_type, facet_choice),
        outcome: outcome.to_string(),
        statistic_type: statistic_type.to_string(),
        facet_choice: facet_choice.to_string(),
        s3_key: s3_key.to_string(),
        file_size: body.file_size.unwrap_or_else(|| serde_json::Number::from(0u64)),
        created_at: body
            .created_at
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
    };

    let response = RegisterResponse {
        message: "Plot registered successfully".to_string(),
        city_scenario: record.city_scenario.clone(),
        outcome_stat_facet: record.outcome_stat_facet.clone(),
        s3_key: record.s3_key.clone(),
    };

    state.metadata.put_plot(record).await?;

    tracing::info!(
        city_scenario = %response.city_scenario,
        outcome_stat_facet = %response.outcome_stat_facet,
        "Plot registered"
    );

    Ok((StatusCode::CREATED, Json(response)))
}

/// Create the register routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/plots/register", post(register_plot))
}
