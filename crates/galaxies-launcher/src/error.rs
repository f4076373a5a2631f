//! Error types for the launcher binary.
//!
//! [`LauncherError`] wraps every failure mode of a launcher run so `main`
//! can propagate with `?`.

use std::path::PathBuf;

/// Top-level error for the launcher binary.
#[derive(Debug, thiserror::Error)]
pub enum LauncherError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: galaxies_core::ConfigError,
    },

    /// A config file was named on the command line but does not exist.
    #[error("config file not found: {}", path.display())]
    ConfigNotFound {
        /// The path that was given.
        path: PathBuf,
    },

    /// The save id argument is not a valid save id.
    #[error("invalid save id: {source}")]
    SaveId {
        /// The underlying validation error.
        #[from]
        source: galaxies_types::SaveIdError,
    },

    /// Creating, loading or listing saves failed.
    #[error("save error: {source}")]
    Lifecycle {
        /// The underlying lifecycle error.
        #[from]
        source: galaxies_core::LifecycleError,
    },

    /// Device settings were rejected or could not be applied.
    #[error("settings error: {source}")]
    Settings {
        /// The underlying settings error.
        #[from]
        source: galaxies_core::SettingsError,
    },

    /// The device settings file could not be read or written.
    #[error("storage error: {source}")]
    Storage {
        /// The underlying storage error.
        #[from]
        source: galaxies_storage::StorageError,
    },
}
