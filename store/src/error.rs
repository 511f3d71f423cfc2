//! Error types for store configuration and connections.
//!
//! Menu operations report [`CoreError`] like every other tool; this enum
//! covers what can go wrong before a session starts.

use sqlmenu_core::CoreError;
use thiserror::Error;

/// Errors raised while loading configuration or connecting.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Configuration value out of range or missing.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The database server could not be reached.
    #[error("error while connecting to MySQL: {0}")]
    ConnectionFailed(String),

    /// Failure inside a store operation.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience alias for results with [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;
