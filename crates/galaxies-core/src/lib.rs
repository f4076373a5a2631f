//! Save lifecycle core for Galaxies: Burn Rate.
//!
//! This crate turns raw save documents into a typed [`GameState`] and
//! manages which save is live. It knows nothing about where saves are
//! stored: every host interaction goes through the [`BackendBridge`] trait.
//!
//! # Modules
//!
//! - [`bridge`] -- The [`BackendBridge`] trait and [`RawBundle`]
//! - [`hydrator`] -- Raw YAML into typed documents, all-or-nothing
//! - [`orchestrator`] -- [`SaveOrchestrator`]: create, load, publish status
//! - [`settings`] -- [`SettingsManager`]: device preferences and display commands
//! - [`theme`] -- Terminal colors into CSS values
//! - [`config`] -- [`GalaxiesConfig`] loaded from YAML
//!
//! [`GameState`]: galaxies_types::GameState

pub mod bridge;
pub mod config;
pub mod hydrator;
pub mod orchestrator;
pub mod settings;
pub mod theme;

pub use bridge::{BackendBridge, BridgeError, RawBundle};
pub use config::{
    BusyPolicy, ConfigError, DisplayConfig, GalaxiesConfig, LifecycleConfig, LoggingConfig,
    StorageConfig,
};
pub use hydrator::{GameDocument, HydrationError, ParseFailure, hydrate_bundle, hydrate_document};
pub use orchestrator::{LifecycleError, LoadFailure, SaveOrchestrator, SaveStatus};
pub use settings::{SettingsError, SettingsManager, validate_master_volume};
pub use theme::{Rgb, derive_theme_css, parse_hex_color};
