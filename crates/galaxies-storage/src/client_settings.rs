//! Device settings persistence (`client_settings.yaml`).
//!
//! On first launch the default file is extracted from the [`TemplateSet`]
//! so players can edit it by hand. A file that no longer parses is not
//! fatal: the defaults are used and the problem is logged. The same goes
//! for an out-of-range master volume, which resets the audio group only.

use std::path::{Path, PathBuf};

use galaxies_core::validate_master_volume;
use galaxies_types::{AudioSettings, DeviceSettings};
use tracing::{info, warn};

use crate::error::StorageError;
use crate::templates::TemplateSet;

/// File name of the device settings inside the data directory.
pub const CLIENT_SETTINGS_FILE: &str = "client_settings.yaml";

/// Path of the device settings file.
pub fn client_settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CLIENT_SETTINGS_FILE)
}

/// Load device settings, extracting the default file first if absent.
///
/// # Errors
///
/// Returns [`StorageError::Io`] if the default file cannot be extracted or
/// the settings file cannot be read. Parse errors and invalid values fall
/// back to defaults.
pub async fn load_client_settings(
    data_dir: &Path,
    templates: &TemplateSet,
) -> Result<DeviceSettings, StorageError> {
    let path = client_settings_path(data_dir);

    let exists = tokio::fs::try_exists(&path)
        .await
        .map_err(|e| StorageError::io(&path, e))?;
    if !exists {
        info!(path = %path.display(), "First launch detected, extracting default client settings");
        tokio::fs::create_dir_all(data_dir)
            .await
            .map_err(|e| StorageError::io(data_dir, e))?;
        tokio::fs::write(&path, templates.client_settings())
            .await
            .map_err(|e| StorageError::io(&path, e))?;
    }

    let text = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| StorageError::io(&path, e))?;

    if text.trim().is_empty() {
        return Ok(DeviceSettings::default());
    }
    let mut settings: DeviceSettings = match serde_yml::from_str(&text) {
        Ok(settings) => settings,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Client settings unreadable, using defaults");
            return Ok(DeviceSettings::default());
        }
    };

    if let Err(err) = validate_master_volume(settings.audio.master_volume) {
        warn!(path = %path.display(), error = %err, "Client audio settings rejected, using defaults");
        settings.audio = AudioSettings::default();
    }
    Ok(settings)
}

/// Write device settings back to disk.
///
/// # Errors
///
/// Returns [`StorageError`] if the settings cannot be encoded or written.
pub async fn save_client_settings(
    data_dir: &Path,
    settings: &DeviceSettings,
) -> Result<(), StorageError> {
    let path = client_settings_path(data_dir);
    let text = serde_yml::to_string(settings)?;
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| StorageError::io(data_dir, e))?;
    tokio::fs::write(&path, text)
        .await
        .map_err(|e| StorageError::io(&path, e))?;
    info!(path = %path.display(), "Client settings saved");
    Ok(())
}
