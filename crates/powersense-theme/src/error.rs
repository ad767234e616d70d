//! Error types.
//!
//! Controller operations never return these: storage failures are logged and
//! absorbed. They surface from the storage backends themselves and from
//! configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Error returned by a [`PreferenceStore`](crate::PreferenceStore) backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store cannot be used at all (disabled, private mode, no host).
    #[error("preference storage is unavailable")]
    Unavailable,

    /// The write would exceed the store's capacity.
    #[error("preference storage quota exceeded ({limit} bytes)")]
    QuotaExceeded { limit: usize },

    #[error("failed to access preference file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("preference file '{}' is malformed: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Error returned when loading or validating a [`ThemeConfig`](crate::ThemeConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config field '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Error returned when a string is not a recognizable preference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized theme preference '{0}' (expected dark or light)")]
pub struct ParsePreferenceError(pub String);
