// crates/store/src/error.rs
use thiserror::Error;

/// Errors surfaced by the metadata and artifact stores.
///
/// Backend failures keep their store of origin so handlers can report a
/// store-specific message instead of a generic one.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Plot not found: {key}")]
    NotFound { key: String },

    #[error("DynamoDB error: {message}")]
    Metadata { message: String },

    #[error("S3 error: {message}")]
    Artifact { message: String },

    #[error("Malformed record: {message}")]
    Malformed { message: String },
}

impl StoreError {
    pub fn metadata(message: impl Into<String>) -> Self {
        Self::Metadata {
            message: message.into(),
        }
    }

    pub fn artifact(message: impl Into<String>) -> Self {
        Self::Artifact {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_the_store() {
        assert!(StoreError::metadata("timed out")
            .to_string()
            .starts_with("DynamoDB error"));
        assert!(StoreError::artifact("timed out")
            .to_string()
            .starts_with("S3 error"));
    }

    #[test]
    fn test_not_found_includes_key() {
        let err = StoreError::NotFound {
            key: "plots/x.json".to_string(),
        };
        assert_eq!(err.to_string(), "Plot not found: plots/x.json");
    }
}
