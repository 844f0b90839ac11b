// crates/store/src/metadata.rs
//! The plot metadata index.
//!
//! `MetadataStore` is the seam between handlers and the backing table. The
//! production implementation is DynamoDB; tests use the in-memory store. The
//! full-table scan behind city listing is linear in table size; if the
//! catalog outgrows it, a maintained secondary index can replace it behind
//! this trait.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use plotgrid_core::PlotRecord;

use crate::attrs::{item_to_record, record_to_item};
use crate::error::StoreError;

#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// All records under one `city#scenario` partition key.
    async fn query_plots(&self, city_scenario: &str) -> Result<Vec<PlotRecord>, StoreError>;

    /// Upsert a record; last write wins on matching keys.
    async fn put_plot(&self, record: PlotRecord) -> Result<(), StoreError>;

    /// Every partition key in the table (full scan, projected).
    async fn scan_partition_keys(&self) -> Result<Vec<String>, StoreError>;
}

/// DynamoDB-backed metadata index.
#[derive(Debug, Clone)]
pub struct DynamoMetadataStore {
    client: aws_sdk_dynamodb::Client,
    table_name: String,
}

impl DynamoMetadataStore {
    pub fn new(client: aws_sdk_dynamodb::Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl MetadataStore for DynamoMetadataStore {
    async fn query_plots(&self, city_scenario: &str) -> Result<Vec<PlotRecord>, StoreError> {
        let response = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("city_scenario = :pk")
            .expression_attribute_values(":pk", AttributeValue::S(city_scenario.to_string()))
            .send()
            .await
            .map_err(|e| StoreError::metadata(e.to_string()))?;

        response
            .items
            .unwrap_or_default()
            .iter()
            .map(item_to_record)
            .collect()
    }

    async fn put_plot(&self, record: PlotRecord) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(record_to_item(&record)))
            .send()
            .await
            .map_err(|e| StoreError::metadata(e.to_string()))?;
        Ok(())
    }

    async fn scan_partition_keys(&self) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        let mut exclusive_start_key = None;

        loop {
            let response = self
                .client
                .scan()
                .table_name(&self.table_name)
                .projection_expression("city_scenario")
                .set_exclusive_start_key(exclusive_start_key)
                .send()
                .await
                .map_err(|e| StoreError::metadata(e.to_string()))?;

            for item in response.items.unwrap_or_default() {
                if let Some(key) = item.get("city_scenario").and_then(|v| v.as_s().ok()) {
                    keys.push(key.clone());
                }
            }

            match response.last_evaluated_key {
                Some(last_key) if !last_key.is_empty() => {
                    exclusive_start_key = Some(last_key);
                }
                _ => break,
            }
        }

        tracing::debug!(table = %self.table_name, keys = keys.len(), "Scanned partition keys");
        Ok(keys)
    }
}
