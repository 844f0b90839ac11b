// crates/store/src/artifacts.rs
//! The plot artifact store.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreError;

/// Connectivity probe result for the artifact store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageProbe {
    pub bucket: String,
    pub object_count: usize,
}

#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Fetch one artifact verbatim. Absent keys are `StoreError::NotFound`.
    async fn fetch(&self, key: &str) -> Result<Bytes, StoreError>;

    /// Cheap connectivity check: list the bucket and count objects.
    async fn probe(&self) -> Result<StorageProbe, StoreError>;
}

/// S3-backed artifact store.
#[derive(Debug, Clone)]
pub struct S3ArtifactStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ArtifactStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl ArtifactStore for S3ArtifactStore {
    async fn fetch(&self, key: &str) -> Result<Bytes, StoreError> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    return Err(StoreError::NotFound {
                        key: key.to_string(),
                    });
                }
                return Err(StoreError::artifact(service_err.to_string()));
            }
        };

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| StoreError::artifact(e.to_string()))?;
        Ok(data.into_bytes())
    }

    async fn probe(&self) -> Result<StorageProbe, StoreError> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| StoreError::artifact(e.to_string()))?;

        Ok(StorageProbe {
            bucket: self.bucket.clone(),
            object_count: output.key_count().unwrap_or(0) as usize,
        })
    }
}
