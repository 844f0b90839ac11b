// crates/store/src/memory.rs
//! In-memory store implementations, the test seam for the HTTP handlers.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;
use plotgrid_core::PlotRecord;

use crate::artifacts::{ArtifactStore, StorageProbe};
use crate::error::StoreError;
use crate::metadata::MetadataStore;

/// Metadata index over a `BTreeMap` keyed by (partition, sort) key.
#[derive(Debug, Default)]
pub struct InMemoryMetadataStore {
    records: RwLock<BTreeMap<(String, String), PlotRecord>>,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MetadataStore for InMemoryMetadataStore {
    async fn query_plots(&self, city_scenario: &str) -> Result<Vec<PlotRecord>, StoreError> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        Ok(records
            .values()
            .filter(|r| r.city_scenario == city_scenario)
            .cloned()
            .collect())
    }

    async fn put_plot(&self, record: PlotRecord) -> Result<(), StoreError> {
        let key = (record.city_scenario.clone(), record.outcome_stat_facet.clone());
        self.records
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, record);
        Ok(())
    }

    async fn scan_partition_keys(&self) -> Result<Vec<String>, StoreError> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        Ok(records.values().map(|r| r.city_scenario.clone()).collect())
    }
}

/// Artifact store over a `BTreeMap` of key to payload.
#[derive(Debug, Default)]
pub struct InMemoryArtifactStore {
    objects: RwLock<BTreeMap<String, Bytes>>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: impl Into<String>, payload: impl Into<Bytes>) {
        self.objects
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.into(), payload.into());
    }
}

#[async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn fetch(&self, key: &str) -> Result<Bytes, StoreError> {
        let objects = self.objects.read().unwrap_or_else(|e| e.into_inner());
        objects.get(key).cloned().ok_or_else(|| StoreError::NotFound {
            key: key.to_string(),
        })
    }

    async fn probe(&self) -> Result<StorageProbe, StoreError> {
        let objects = self.objects.read().unwrap_or_else(|e| e.into_inner());
        Ok(StorageProbe {
            bucket: "in-memory".to_string(),
            object_count: objects.len(),
        })
    }
}
