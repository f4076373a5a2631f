//! Configuration loading and typed config structures.
//!
//! The optional `galaxies-config.yaml` tunes the host-side behavior of the
//! save core: where saves live, what happens when a second lifecycle
//! operation arrives while one is in flight, how display commands are
//! retried, and the default log level. Every section and field has a
//! default, so an empty or missing file is valid.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GalaxiesConfig {
    /// Save storage location.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Save lifecycle behavior.
    #[serde(default)]
    pub lifecycle: LifecycleConfig,

    /// Display command delivery.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Logging defaults.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GalaxiesConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `GALAXIES_DATA_DIR` overrides `storage.data_dir`
    /// - `GALAXIES_LOG` overrides `logging.level`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, applying env overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Override values with environment variables when set.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`. Empty values are ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("GALAXIES_DATA_DIR")
            && !val.is_empty()
        {
            self.storage.data_dir = Some(PathBuf::from(val));
        }
        if let Some(val) = lookup("GALAXIES_LOG")
            && !val.is_empty()
        {
            self.logging.level = val;
        }
    }
}

/// Save storage location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Root directory for saves and client settings. `None` means the
    /// platform config directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// What to do when a lifecycle operation arrives while another is running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusyPolicy {
    /// Fail the second operation immediately with a busy error.
    #[default]
    Reject,
    /// Wait for the first operation to finish, then run.
    Queue,
}

/// Save lifecycle behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LifecycleConfig {
    /// Handling of overlapping create/load calls.
    #[serde(default)]
    pub busy_policy: BusyPolicy,
}

/// Display command delivery.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DisplayConfig {
    /// Attempts per display command, including the first (minimum 1).
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Delay between attempts in milliseconds.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            retry_attempts: default_retry_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Logging defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log filter used when `RUST_LOG` is unset (e.g. `info`,
    /// `galaxies_core=debug`).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (required by serde)
// ---------------------------------------------------------------------------

const fn default_retry_attempts() -> u32 {
    3
}

const fn default_retry_backoff_ms() -> u64 {
    50
}

fn default_log_level() -> String {
    "info".to_owned()
}
