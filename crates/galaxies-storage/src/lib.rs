//! Filesystem storage for Galaxies: Burn Rate.
//!
//! Implements [`galaxies_core::BackendBridge`] on top of the local
//! filesystem and persists device settings.
//!
//! ```text
//! <data_dir>/
//!     client_settings.yaml
//!     saves/
//!         save_<uuid>/
//!             save_state.yaml
//!             planets.yaml  ... game_settings.yaml
//! ```
//!
//! # Modules
//!
//! - [`templates`] -- [`TemplateSet`], the embedded initial documents
//! - [`fs_bridge`] -- [`FsBridge`], saves on disk and recorded window state
//! - [`client_settings`] -- Load and save `client_settings.yaml`
//! - [`error`] -- [`StorageError`]

pub mod client_settings;
pub mod error;
pub mod fs_bridge;
pub mod templates;

pub use client_settings::{
    CLIENT_SETTINGS_FILE, client_settings_path, load_client_settings, save_client_settings,
};
pub use error::StorageError;
pub use fs_bridge::{APP_DIR_NAME, FsBridge, SAVES_DIR_NAME, WindowState, default_data_dir};
pub use templates::TemplateSet;
