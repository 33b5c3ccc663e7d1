//! Provider payload codec errors

use thiserror::Error;

/// Errors returned when encoding or decoding provider payloads.
///
/// Field-level validation is left to the actuator, so every failure here is
/// a (de)serialization failure.
#[derive(Debug, Error)]
pub enum ProviderApiError {
    /// JSON payload is malformed or misses a required field
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML payload is malformed or misses a required field
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result of a codec operation
pub type Result<T> = std::result::Result<T, ProviderApiError>;
