// crates/store/src/config.rs
//! Store configuration, resolved once from the environment at process start
//! and passed by reference afterwards.

use aws_config::{BehaviorVersion, Region};

/// Endpoints, names, and credentials for the metadata table and artifact
/// bucket. Defaults point at a local emulated environment (LocalStack-style
/// endpoints, `test`/`test` credentials).
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Endpoint override for DynamoDB; `None` uses real endpoint resolution.
    pub dynamodb_endpoint: Option<String>,
    pub table_name: String,
    /// Endpoint override for S3; `None` uses real endpoint resolution.
    pub s3_endpoint: Option<String>,
    pub bucket_name: String,
    pub region: String,
    /// Static credentials, applied only when an endpoint override is set.
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dynamodb_endpoint: None,
            table_name: "plot-metadata-local".to_string(),
            s3_endpoint: None,
            bucket_name: "prerun-plots-bucket-local".to_string(),
            region: "us-east-1".to_string(),
            access_key_id: "test".to_string(),
            secret_access_key: "test".to_string(),
        }
    }
}

/// Read an env var, treating unset and blank the same way.
fn env_nonblank(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl StoreConfig {
    /// Build the configuration from the environment. Call once in `main`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            dynamodb_endpoint: env_nonblank("DYNAMODB_ENDPOINT_URL"),
            table_name: env_nonblank("DYNAMODB_TABLE_NAME").unwrap_or(defaults.table_name),
            s3_endpoint: env_nonblank("S3_ENDPOINT_URL"),
            bucket_name: env_nonblank("S3_BUCKET_NAME").unwrap_or(defaults.bucket_name),
            region: env_nonblank("AWS_REGION").unwrap_or(defaults.region),
            access_key_id: env_nonblank("AWS_ACCESS_KEY_ID").unwrap_or(defaults.access_key_id),
            secret_access_key: env_nonblank("AWS_SECRET_ACCESS_KEY")
                .unwrap_or(defaults.secret_access_key),
        }
    }

    /// Build a DynamoDB client for this configuration.
    pub async fn dynamodb_client(&self) -> aws_sdk_dynamodb::Client {
        let shared = self.shared_config().await;
        let mut builder = aws_sdk_dynamodb::config::Builder::from(&shared);
        if let Some(endpoint) = &self.dynamodb_endpoint {
            builder = builder
                .endpoint_url(endpoint)
                .credentials_provider(self.static_credentials());
        }
        aws_sdk_dynamodb::Client::from_conf(builder.build())
    }

    /// Build an S3 client for this configuration.
    ///
    /// Endpoint overrides force path-style addressing, which local emulators
    /// require (virtual-hosted buckets don't resolve against localhost).
    pub async fn s3_client(&self) -> aws_sdk_s3::Client {
        let shared = self.shared_config().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &self.s3_endpoint {
            builder = builder
                .endpoint_url(endpoint)
                .force_path_style(true)
                .credentials_provider(self.static_credentials());
        }
        aws_sdk_s3::Client::from_conf(builder.build())
    }

    async fn shared_config(&self) -> aws_config::SdkConfig {
        aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()))
            .load()
            .await
    }

    fn static_credentials(&self) -> aws_sdk_dynamodb::config::Credentials {
        aws_sdk_dynamodb::config::Credentials::from_keys(
            self.access_key_id.clone(),
            self.secret_access_key.clone(),
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_local_names() {
        let config = StoreConfig::default();
        assert_eq!(config.table_name, "plot-metadata-local");
        assert_eq!(config.bucket_name, "prerun-plots-bucket-local");
        assert_eq!(config.region, "us-east-1");
        assert!(config.dynamodb_endpoint.is_none());
        assert!(config.s3_endpoint.is_none());
    }
}
