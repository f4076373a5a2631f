//! Error types for the storage layer.
//!
//! The bridge itself reports [`galaxies_core::BridgeError`]; [`StorageError`]
//! covers the device settings file, which lives outside any save.

use std::path::PathBuf;

/// Errors that can occur reading or writing `client_settings.yaml`.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A filesystem operation failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Settings could not be encoded as YAML.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_yml::Error),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
