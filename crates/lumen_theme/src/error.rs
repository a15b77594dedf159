//! Theme error types

use thiserror::Error;

/// Durable storage errors
///
/// These never reach widget code: the preference store logs them and falls
/// back to in-memory state.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Storage is disabled or not present in this environment
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode storage file: {0}")]
    Decode(#[from] toml::de::Error),

    #[error("failed to encode storage file: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;
