//! Encoding and decoding of provider payloads
//!
//! Provider payloads travel as raw embedded objects (`RawExtension`) inside a
//! Machine, or as standalone JSON/YAML documents. Every function here is a thin
//! wrapper over serde that logs the payload type and maps errors into
//! [`ProviderApiError`](crate::ProviderApiError).

use crate::error::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::any::type_name;
use tracing::debug;

/// Encode a payload into the raw object stored in a Machine
pub fn to_raw_extension<T: Serialize>(payload: &T) -> Result<serde_json::Value> {
    let value = serde_json::to_value(payload)?;
    debug!(payload = type_name::<T>(), "Encoded provider payload to raw extension");
    Ok(value)
}

/// Decode a payload from the raw object stored in a Machine
pub fn from_raw_extension<T: DeserializeOwned>(value: &serde_json::Value) -> Result<T> {
    let payload = T::deserialize(value).map_err(|e| {
        debug!(payload = type_name::<T>(), error = %e, "Failed to decode raw extension");
        e
    })?;
    debug!(payload = type_name::<T>(), "Decoded provider payload from raw extension");
    Ok(payload)
}

/// Encode a payload as a JSON document
pub fn to_json<T: Serialize>(payload: &T) -> Result<String> {
    let json = serde_json::to_string(payload)?;
    debug!(payload = type_name::<T>(), bytes = json.len(), "Encoded provider payload to JSON");
    Ok(json)
}

/// Decode a payload from a JSON document
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T> {
    debug!(payload = type_name::<T>(), bytes = json.len(), "Decoding provider payload from JSON");
    Ok(serde_json::from_str(json)?)
}

/// Encode a payload as a YAML document
pub fn to_yaml<T: Serialize>(payload: &T) -> Result<String> {
    let yaml = serde_yaml::to_string(payload)?;
    debug!(payload = type_name::<T>(), bytes = yaml.len(), "Encoded provider payload to YAML");
    Ok(yaml)
}

/// Decode a payload from a YAML document
pub fn from_yaml<T: DeserializeOwned>(yaml: &str) -> Result<T> {
    debug!(payload = type_name::<T>(), bytes = yaml.len(), "Decoding provider payload from YAML");
    Ok(serde_yaml::from_str(yaml)?)
}
