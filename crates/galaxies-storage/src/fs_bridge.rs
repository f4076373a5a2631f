//! The filesystem backend bridge.
//!
//! Saves live under `<data_dir>/saves/<save_id>/`, one YAML file per
//! document. [`FsBridge`] creates them from a [`TemplateSet`], reads them
//! back as raw bundles and scans them for the load screen. Window commands
//! are recorded in a [`WindowState`]; driving an actual window is the
//! host's job.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use galaxies_core::{BackendBridge, BridgeError, RawBundle, hydrate_document};
use galaxies_types::{DisplayMode, DocumentKind, SaveId, SaveMeta, SaveState};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::templates::TemplateSet;

/// Directory name under the platform config directory.
pub const APP_DIR_NAME: &str = "GalaxiesBurnRate";

/// Subdirectory of the data directory holding one directory per save.
pub const SAVES_DIR_NAME: &str = "saves";

/// The default data directory: `<config dir>/GalaxiesBurnRate`.
///
/// Falls back to the working directory when the platform has no config
/// directory.
pub fn default_data_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| {
            warn!("No platform config directory, using the working directory");
            PathBuf::from(".")
        })
        .join(APP_DIR_NAME)
}

/// The last window state requested through the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowState {
    /// Whether the window covers the screen.
    pub fullscreen: bool,
    /// Window width in pixels.
    pub width: u32,
    /// Window height in pixels.
    pub height: u32,
    /// Whether the window was centered after its last resize.
    pub centered: bool,
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            fullscreen: false,
            width: 1280,
            height: 720,
            centered: false,
        }
    }
}

/// A [`BackendBridge`] backed by the local filesystem.
#[derive(Debug)]
pub struct FsBridge {
    data_dir: PathBuf,
    templates: TemplateSet,
    window: Mutex<WindowState>,
}

impl FsBridge {
    /// Create a bridge rooted at `data_dir`. Nothing is touched on disk
    /// until the first call.
    pub fn new(data_dir: impl Into<PathBuf>, templates: TemplateSet) -> Self {
        Self {
            data_dir: data_dir.into(),
            templates,
            window: Mutex::new(WindowState::default()),
        }
    }

    /// The root data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The directory holding every save.
    pub fn saves_dir(&self) -> PathBuf {
        self.data_dir.join(SAVES_DIR_NAME)
    }

    /// The directory of one save.
    pub fn save_dir(&self, save_id: &SaveId) -> PathBuf {
        self.saves_dir().join(save_id.as_str())
    }

    /// The templates new saves are created from.
    pub const fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    /// The last requested window state.
    pub async fn window_state(&self) -> WindowState {
        *self.window.lock().await
    }

    /// Write the templates and the initial state into a fresh directory.
    async fn populate_save(&self, dir: &Path, state: &SaveState) -> Result<(), BridgeError> {
        for kind in DocumentKind::TEMPLATED {
            let Some(text) = self.templates.get(kind) else {
                return Err(BridgeError::Unavailable {
                    message: format!("no template for {kind}"),
                });
            };
            let path = dir.join(kind.file_name());
            tokio::fs::write(&path, text)
                .await
                .map_err(|source| io_error(format!("writing {}", path.display()), source))?;
        }

        let path = dir.join(DocumentKind::SaveState.file_name());
        let text = serde_yml::to_string(state).map_err(|source| BridgeError::Yaml {
            context: String::from("encoding save_state"),
            source,
        })?;
        tokio::fs::write(&path, text)
            .await
            .map_err(|source| io_error(format!("writing {}", path.display()), source))
    }

    /// Summary of one save directory, or `None` if it is not a loadable save.
    async fn read_meta(&self, name: &str) -> Option<SaveMeta> {
        let Ok(save_id) = SaveId::parse(name) else {
            debug!(name, "Skipping directory with a non-save name");
            return None;
        };
        let path = self
            .save_dir(&save_id)
            .join(DocumentKind::SaveState.file_name());
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(err) => {
                debug!(save_id = %save_id, error = %err, "Skipping save without readable state");
                return None;
            }
        };
        match hydrate_document::<SaveState>(&text) {
            Ok(state) => Some(SaveMeta::from_state(save_id, &state)),
            Err(err) => {
                debug!(save_id = %save_id, error = %err, "Skipping save with malformed state");
                None
            }
        }
    }
}

#[async_trait]
impl BackendBridge for FsBridge {
    async fn create_new_game(
        &self,
        captain_name: &str,
        ship_name: &str,
    ) -> Result<String, BridgeError> {
        let captain_name = captain_name.trim();
        let ship_name = ship_name.trim();
        if captain_name.is_empty() || ship_name.is_empty() {
            return Err(BridgeError::InvalidInput {
                message: String::from("captain and ship names must not be blank"),
            });
        }

        let saves_dir = self.saves_dir();
        tokio::fs::create_dir_all(&saves_dir)
            .await
            .map_err(|source| io_error(format!("creating {}", saves_dir.display()), source))?;

        let save_id = SaveId::generate();
        let dir = self.save_dir(&save_id);
        tokio::fs::create_dir(&dir)
            .await
            .map_err(|source| io_error(format!("creating {}", dir.display()), source))?;

        let defaults = self.templates.player_defaults();
        let state = SaveState {
            captain_name: captain_name.to_owned(),
            ship_name: ship_name.to_owned(),
            credits: defaults.starting_credits,
            current_day: 1,
            current_location: defaults.starting_location,
            current_fuel: defaults.starting_fuel,
        };

        if let Err(err) = self.populate_save(&dir, &state).await {
            warn!(save_id = %save_id, error = %err, "Save creation failed, removing partial save");
            if let Err(cleanup) = tokio::fs::remove_dir_all(&dir).await {
                warn!(save_id = %save_id, error = %cleanup, "Could not remove partial save");
            }
            return Err(err);
        }

        info!(save_id = %save_id, captain_name, ship_name, "Save directory created");
        Ok(save_id.into_inner())
    }

    async fn load_game_data(&self, save_id: &SaveId) -> Result<RawBundle, BridgeError> {
        let dir = self.save_dir(save_id);
        let is_dir = tokio::fs::metadata(&dir)
            .await
            .map(|meta| meta.is_dir())
            .map_err(|source| io_error(format!("opening save {save_id}"), source))?;
        if !is_dir {
            return Err(BridgeError::InvalidInput {
                message: format!("save {save_id} is not a directory"),
            });
        }

        let mut bundle = RawBundle::new();
        for kind in DocumentKind::ALL {
            let path = dir.join(kind.file_name());
            match tokio::fs::read_to_string(&path).await {
                Ok(text) => {
                    let _ = bundle.insert(kind, text);
                }
                Err(err) => {
                    warn!(save_id = %save_id, document = %kind, error = %err, "Failed to read save file");
                }
            }
        }
        debug!(save_id = %save_id, documents = bundle.len(), "Save files read");
        Ok(bundle)
    }

    async fn available_saves(&self) -> Result<Vec<SaveMeta>, BridgeError> {
        let saves_dir = self.saves_dir();
        let mut entries = match tokio::fs::read_dir(&saves_dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(io_error(format!("scanning {}", saves_dir.display()), source));
            }
        };

        let mut saves = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| io_error(format!("scanning {}", saves_dir.display()), source))?
        {
            let is_dir = entry.file_type().await.is_ok_and(|ty| ty.is_dir());
            if !is_dir {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if let Some(meta) = self.read_meta(name).await {
                saves.push(meta);
            }
        }

        saves.sort_by(|a, b| a.save_id.cmp(&b.save_id));
        Ok(saves)
    }

    async fn set_display_mode(&self, mode: DisplayMode) -> Result<(), BridgeError> {
        let mut window = self.window.lock().await;
        window.fullscreen = mode.covers_screen();
        info!(mode = %mode, fullscreen = window.fullscreen, "Display mode set");
        Ok(())
    }

    async fn set_resolution(&self, width: u32, height: u32) -> Result<(), BridgeError> {
        if width == 0 || height == 0 {
            return Err(BridgeError::InvalidInput {
                message: format!("resolution {width}x{height} has a zero dimension"),
            });
        }
        let mut window = self.window.lock().await;
        window.width = width;
        window.height = height;
        window.centered = true;
        info!(width, height, "Window resized and centered");
        Ok(())
    }
}

fn io_error(context: String, source: std::io::Error) -> BridgeError {
    BridgeError::Io { context, source }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn bridge() -> (tempfile::TempDir, FsBridge) {
        let dir = tempfile::tempdir().unwrap();
        let bridge = FsBridge::new(dir.path(), TemplateSet::embedded());
        (dir, bridge)
    }

    #[tokio::test]
    async fn new_save_has_every_document() {
        let (_dir, bridge) = bridge();
        let raw = bridge.create_new_game("Ada Vex", "Burn Rate").await.unwrap();
        let save_id = SaveId::parse(raw).unwrap();

        let bundle = bridge.load_game_data(&save_id).await.unwrap();
        assert!(bundle.missing().is_empty());

        let state: SaveState =
            hydrate_document(bundle.get(DocumentKind::SaveState).unwrap()).unwrap();
        assert_eq!(state.captain_name, "Ada Vex");
        assert_eq!(state.current_day, 1);
        assert_eq!(state.credits, 5000);
        assert_eq!(state.current_location, "plt_prime");
        assert_eq!(state.current_fuel, 100);
    }

    #[tokio::test]
    async fn missing_template_fails_creation_and_leaves_no_save() {
        let dir = tempfile::tempdir().unwrap();
        let templates = TemplateSet::embedded().without_document(DocumentKind::Events);
        let bridge = FsBridge::new(dir.path(), templates);

        let err = bridge.create_new_game("Ada Vex", "Burn Rate").await.unwrap_err();

        assert!(matches!(
            err,
            BridgeError::Unavailable { ref message } if message.contains("events")
        ));
        assert!(bridge.available_saves().await.unwrap().is_empty());
        let mut entries = tokio::fs::read_dir(bridge.saves_dir()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn names_are_trimmed_and_blank_names_rejected() {
        let (_dir, bridge) = bridge();
        let err = bridge.create_new_game("   ", "Burn Rate").await.unwrap_err();
        assert!(matches!(err, BridgeError::InvalidInput { .. }));

        let raw = bridge.create_new_game("  Ada  ", " Burn Rate ").await.unwrap();
        let saves = bridge.available_saves().await.unwrap();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves.first().unwrap().save_id.as_str(), raw);
        assert_eq!(saves.first().unwrap().captain_name, "Ada");
    }

    #[tokio::test]
    async fn starting_values_follow_game_settings_template() {
        let dir = tempfile::tempdir().unwrap();
        let templates = TemplateSet::embedded().with_document(
            DocumentKind::GameSettings,
            "player_defaults:\n  starting_credits: 1200\n  starting_location: plt_kessel\n  starting_fuel: 60\n",
        );
        let bridge = FsBridge::new(dir.path(), templates);
        let raw = bridge.create_new_game("Ada", "Burn Rate").await.unwrap();
        let saves = bridge.available_saves().await.unwrap();
        let meta = saves.first().unwrap();

        assert_eq!(meta.save_id.as_str(), raw);
        assert_eq!(meta.credits, 1200);
        assert_eq!(meta.current_location, "plt_kessel");
        assert_eq!(meta.current_fuel, 60);
    }

    #[tokio::test]
    async fn unreadable_files_are_omitted_from_bundle() {
        let (_dir, bridge) = bridge();
        let save_id = SaveId::parse(bridge.create_new_game("Ada", "Burn Rate").await.unwrap())
            .unwrap();
        tokio::fs::remove_file(bridge.save_dir(&save_id).join("events.yaml"))
            .await
            .unwrap();

        let bundle = bridge.load_game_data(&save_id).await.unwrap();
        assert_eq!(bundle.missing(), vec![DocumentKind::Events]);
    }

    #[tokio::test]
    async fn unknown_save_is_an_io_error() {
        let (_dir, bridge) = bridge();
        let err = bridge
            .load_game_data(&SaveId::parse("save_missing").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::Io { .. }));
    }

    #[tokio::test]
    async fn listing_skips_foreign_and_broken_directories() {
        let (_dir, bridge) = bridge();
        let _ = bridge.create_new_game("Ada", "Burn Rate").await.unwrap();

        let saves_dir = bridge.saves_dir();
        tokio::fs::create_dir(saves_dir.join("save_empty")).await.unwrap();
        tokio::fs::create_dir(saves_dir.join("not a save")).await.unwrap();
        tokio::fs::create_dir(saves_dir.join("save_broken")).await.unwrap();
        tokio::fs::write(saves_dir.join("save_broken/save_state.yaml"), "credits: lots")
            .await
            .unwrap();
        tokio::fs::write(saves_dir.join("stray.txt"), "hello").await.unwrap();

        let saves = bridge.available_saves().await.unwrap();
        assert_eq!(saves.len(), 1);
    }

    #[tokio::test]
    async fn listing_without_saves_dir_is_empty() {
        let (_dir, bridge) = bridge();
        assert!(bridge.available_saves().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn window_commands_are_recorded() {
        let (_dir, bridge) = bridge();
        bridge.set_display_mode(DisplayMode::Borderless).await.unwrap();
        bridge.set_resolution(1920, 1080).await.unwrap();
        assert_eq!(
            bridge.window_state().await,
            WindowState {
                fullscreen: true,
                width: 1920,
                height: 1080,
                centered: true,
            }
        );

        bridge.set_display_mode(DisplayMode::Windowed).await.unwrap();
        assert!(!bridge.window_state().await.fullscreen);
        assert!(bridge.set_resolution(0, 600).await.is_err());
    }
}
