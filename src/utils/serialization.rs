// JSON layer shared by the CLI, config loader and fixtures
use crate::error::{ArtError, Result};
use serde::{Deserialize, Serialize};

/// Serialize data to indented JSON for display
pub fn serialize_pretty<T: Serialize>(data: &T) -> Result<String> {
    serde_json::to_string_pretty(data)
        .map_err(|e| ArtError::Serialization(format!("Serialization failed: {e}")))
}

/// Deserialize data from JSON
pub fn deserialize<T>(text: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    serde_json::from_str(text)
        .map_err(|e| ArtError::Serialization(format!("Deserialization failed: {e}")))
}
