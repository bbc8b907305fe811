//! Error handling for the generation pipeline
//!
//! Every fallible operation in the crate returns [`Result`]. A generation pass
//! either succeeds completely or returns one of these errors; there are no
//! partial attribute sets.

use std::fmt;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, ArtError>;

/// Error types for block parsing, entropy and attribute generation
#[derive(Debug, Clone, PartialEq)]
pub enum ArtError {
    /// Malformed numeric or hex field
    Parse(String),
    /// Block is structurally unusable
    InvalidBlock(String),
    /// An entropy stream could not produce another value
    EntropyExhausted(String),
    /// Configuration errors (modifiers, colors, style names)
    Config(String),
    /// Serialization/deserialization errors
    Serialization(String),
    /// File I/O errors
    Io(String),
    /// Metadata was requested from a non-deterministic preview
    PreviewExport,
}

impl fmt::Display for ArtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtError::Parse(msg) => write!(f, "Parse error: {msg}"),
            ArtError::InvalidBlock(msg) => write!(f, "Invalid block: {msg}"),
            ArtError::EntropyExhausted(msg) => write!(f, "Entropy exhausted: {msg}"),
            ArtError::Config(msg) => write!(f, "Configuration error: {msg}"),
            ArtError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            ArtError::Io(msg) => write!(f, "I/O error: {msg}"),
            ArtError::PreviewExport => {
                write!(f, "Preview output is not reproducible and cannot be exported")
            }
        }
    }
}

impl std::error::Error for ArtError {}

impl From<std::io::Error> for ArtError {
    fn from(err: std::io::Error) -> Self {
        ArtError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ArtError {
    fn from(err: serde_json::Error) -> Self {
        ArtError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for ArtError {
    fn from(err: toml::de::Error) -> Self {
        ArtError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            ArtError::Parse("bad digit".to_string()).to_string(),
            "Parse error: bad digit"
        );
        assert_eq!(
            ArtError::Config("mod1 out of range".to_string()).to_string(),
            "Configuration error: mod1 out of range"
        );
        assert!(ArtError::PreviewExport.to_string().contains("cannot be exported"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<u32>("not json").unwrap_err();
        let converted: ArtError = err.into();
        assert!(matches!(converted, ArtError::Serialization(_)));
    }
}
