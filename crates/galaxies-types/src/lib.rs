//! Shared type definitions for Galaxies: Burn Rate save data.
//!
//! This crate is the single source of truth for the types that cross the
//! boundary between the save core, the backend bridge and the presentation
//! layer. Types flow downstream to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- [`SaveId`], the validated save directory name
//! - [`save`] -- [`SaveMeta`] load-screen summaries
//! - [`documents`] -- Schemas for the eight save documents and the
//!   [`GameState`] aggregate
//! - [`settings`] -- Local device preferences and derived theme CSS

pub mod documents;
pub mod ids;
pub mod save;
pub mod settings;

// Re-export all public types at crate root for convenience.
pub use documents::{
    Commodities, Commodity, CrewRole, CrewRoles, DocumentKind, Events, GameEvent, GameSettings,
    GameState, Modules, Planet, PlanetTrait, PlanetTraits, Planets, PlayerDefaults, SaveState,
    ShipModule,
};
pub use ids::{SAVE_ID_PREFIX, SaveId, SaveIdError};
pub use save::SaveMeta;
pub use settings::{
    AudioSettings, DebugSettings, DeviceSettings, DisplayMode, DisplaySettings, Resolution,
    ThemeCss, ThemeSettings,
};
