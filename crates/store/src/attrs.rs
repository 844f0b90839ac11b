// crates/store/src/attrs.rs
//! DynamoDB attribute conversion for plot records.
//!
//! DynamoDB numbers come back as fixed-point decimal strings; they are
//! normalized to a plain integer when whole and a float otherwise, so JSON
//! responses never carry decimal artifacts like `32768.0`.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use plotgrid_core::PlotRecord;

use crate::error::StoreError;

/// Normalize a DynamoDB decimal string to an integer-or-float JSON number.
pub fn normalize_number(raw: &str) -> Result<serde_json::Number, StoreError> {
    if let Ok(whole) = raw.parse::<i64>() {
        return Ok(serde_json::Number::from(whole));
    }
    let value: f64 = raw
        .parse()
        .map_err(|_| StoreError::malformed(format!("non-numeric attribute: {raw}")))?;
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        return Ok(serde_json::Number::from(value as i64));
    }
    serde_json::Number::from_f64(value)
        .ok_or_else(|| StoreError::malformed(format!("non-finite attribute: {raw}")))
}

fn string_attr(item: &HashMap<String, AttributeValue>, name: &str) -> String {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .unwrap_or_default()
}

/// Convert a stored item into a [`PlotRecord`].
///
/// String fields absent from the item come back empty rather than erroring,
/// matching how the handlers have always tolerated sparse legacy rows; only
/// an unparseable number is rejected.
pub fn item_to_record(
    item: &HashMap<String, AttributeValue>,
) -> Result<PlotRecord, StoreError> {
    let file_size = match item.get("file_size") {
        Some(AttributeValue::N(raw)) => normalize_number(raw)?,
        _ => serde_json::Number::from(0u64),
    };

    Ok(PlotRecord {
        city_scenario: string_attr(item, "city_scenario"),
        outcome_stat_facet: string_attr(item, "outcome_stat_facet"),
        outcome: string_attr(item, "outcome"),
        statistic_type: string_attr(item, "statistic_type"),
        facet_choice: string_attr(item, "facet_choice"),
        s3_key: string_attr(item, "s3_key"),
        file_size,
        created_at: string_attr(item, "created_at"),
    })
}

/// Convert a [`PlotRecord`] into a DynamoDB item map.
pub fn record_to_item(record: &PlotRecord) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::new();
    item.insert(
        "city_scenario".to_string(),
        AttributeValue::S(record.city_scenario.clone()),
    );
    item.insert(
        "outcome_stat_facet".to_string(),
        AttributeValue::S(record.outcome_stat_facet.clone()),
    );
    item.insert(
        "outcome".to_string(),
        AttributeValue::S(record.outcome.clone()),
    );
    item.insert(
        "statistic_type".to_string(),
        AttributeValue::S(record.statistic_type.clone()),
    );
    item.insert(
        "facet_choice".to_string(),
        AttributeValue::S(record.facet_choice.clone()),
    );
    item.insert(
        "s3_key".to_string(),
        AttributeValue::S(record.s3_key.clone()),
    );
    item.insert(
        "file_size".to_string(),
        AttributeValue::N(record.file_size.to_string()),
    );
    item.insert(
        "created_at".to_string(),
        AttributeValue::S(record.created_at.clone()),
    );
    item
}
