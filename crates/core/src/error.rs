// crates/core/src/error.rs
use thiserror::Error;

/// Errors produced while building the job catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unknown profile: {name} (expected minimal, test, medium, or full)")]
    UnknownProfile { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_profile_display() {
        let err = CatalogError::UnknownProfile {
            name: "huge".to_string(),
        };
        assert!(err.to_string().contains("huge"));
        assert!(err.to_string().contains("minimal"));
    }
}
