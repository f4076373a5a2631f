//! Typed schemas for the eight documents that make up one save.
//!
//! Every save directory holds exactly these documents, one YAML file each.
//! Seven of them are copied verbatim from the template set when a game is
//! created; `save_state` is written fresh from the captain and ship names.
//!
//! Schemas are closed (`deny_unknown_fields`) unless a field is documented
//! as open. Open maps carry data the core does not interpret, such as
//! module stats and event effects.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::SaveId;
use crate::save::SaveMeta;

// ---------------------------------------------------------------------------
// Document kinds
// ---------------------------------------------------------------------------

/// One of the eight fixed documents in a save bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Dynamic player state (captain, ship, credits, day).
    SaveState,
    /// Planet catalog.
    Planets,
    /// Planet trait catalog.
    PlanetTraits,
    /// Tradeable commodity catalog.
    Commodities,
    /// Ship module catalog.
    Modules,
    /// Random event catalog.
    Events,
    /// Crew role catalog.
    CrewRoles,
    /// Static game rules and player defaults.
    GameSettings,
}

impl DocumentKind {
    /// All document kinds, in hydration order.
    pub const ALL: [Self; 8] = [
        Self::SaveState,
        Self::Planets,
        Self::PlanetTraits,
        Self::Commodities,
        Self::Modules,
        Self::Events,
        Self::CrewRoles,
        Self::GameSettings,
    ];

    /// Documents copied from the template set into every new save.
    pub const TEMPLATED: [Self; 7] = [
        Self::Planets,
        Self::PlanetTraits,
        Self::Commodities,
        Self::Modules,
        Self::Events,
        Self::CrewRoles,
        Self::GameSettings,
    ];

    /// The bundle key for this document (e.g. `planet_traits`).
    pub const fn key(self) -> &'static str {
        match self {
            Self::SaveState => "save_state",
            Self::Planets => "planets",
            Self::PlanetTraits => "planet_traits",
            Self::Commodities => "commodities",
            Self::Modules => "modules",
            Self::Events => "events",
            Self::CrewRoles => "crew_roles",
            Self::GameSettings => "game_settings",
        }
    }

    /// The file name of this document inside a save directory.
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::SaveState => "save_state.yaml",
            Self::Planets => "planets.yaml",
            Self::PlanetTraits => "planet_traits.yaml",
            Self::Commodities => "commodities.yaml",
            Self::Modules => "modules.yaml",
            Self::Events => "events.yaml",
            Self::CrewRoles => "crew_roles.yaml",
            Self::GameSettings => "game_settings.yaml",
        }
    }

    /// Look up a kind by bundle key or file name.
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.strip_suffix(".yaml").unwrap_or(key);
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

impl core::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// save_state
// ---------------------------------------------------------------------------

/// Dynamic player state stored in `save_state.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(deny_unknown_fields)]
pub struct SaveState {
    /// Name of the player's captain.
    pub captain_name: String,
    /// Name of the player's ship.
    pub ship_name: String,
    /// Credits on hand.
    pub credits: u64,
    /// Current in-game day (day 1 is the first day of a new game).
    pub current_day: u32,
    /// Planet id the ship is docked at.
    pub current_location: String,
    /// Fuel units in the tank.
    pub current_fuel: u32,
}

// ---------------------------------------------------------------------------
// Catalogs
// ---------------------------------------------------------------------------

/// Planet catalog stored in `planets.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(deny_unknown_fields)]
pub struct Planets {
    /// Every planet in the galaxy.
    pub planets: Vec<Planet>,
}

/// A single planet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(deny_unknown_fields)]
pub struct Planet {
    /// Stable identifier (e.g. `plt_prime`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Flavor text.
    #[serde(default)]
    pub description: String,
    /// Ids of the [`PlanetTrait`]s that apply to this planet.
    #[serde(default)]
    pub traits: Vec<String>,
    /// Danger rating from 0 (safe) upwards.
    #[serde(default)]
    pub danger_level: u8,
}

/// Planet trait catalog stored in `planet_traits.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(deny_unknown_fields)]
pub struct PlanetTraits {
    /// Every trait a planet can carry.
    pub traits: Vec<PlanetTrait>,
}

/// A trait that modifies a planet's market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(deny_unknown_fields)]
pub struct PlanetTrait {
    /// Stable identifier (e.g. `trt_mining`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Flavor text.
    #[serde(default)]
    pub description: String,
    /// Price multipliers keyed by commodity id.
    #[serde(default)]
    pub price_modifiers: BTreeMap<String, f64>,
}

/// Commodity catalog stored in `commodities.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(deny_unknown_fields)]
pub struct Commodities {
    /// Every tradeable commodity.
    pub commodities: Vec<Commodity>,
}

/// A tradeable good.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(deny_unknown_fields)]
pub struct Commodity {
    /// Stable identifier (e.g. `com_water`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Base price in credits before planet modifiers.
    pub base_price: u64,
    /// Relative day-to-day price swing (0.0 = fixed price).
    #[serde(default)]
    pub volatility: f64,
    /// Whether trading this commodity is illegal.
    #[serde(default)]
    pub illegal: bool,
}

/// Ship module catalog stored in `modules.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(deny_unknown_fields)]
pub struct Modules {
    /// Every installable ship module.
    pub modules: Vec<ShipModule>,
}

/// An installable ship module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(deny_unknown_fields)]
pub struct ShipModule {
    /// Stable identifier (e.g. `mod_cargo_1`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Slot the module occupies (e.g. `engine`, `cargo`).
    pub slot: String,
    /// Purchase cost in credits.
    pub cost: u64,
    /// Open map of stat adjustments, keyed by stat name.
    #[serde(default)]
    pub stats: BTreeMap<String, i64>,
}

/// Random event catalog stored in `events.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(deny_unknown_fields)]
pub struct Events {
    /// Every event that can fire during play.
    pub events: Vec<GameEvent>,
}

/// A random event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(deny_unknown_fields)]
pub struct GameEvent {
    /// Stable identifier (e.g. `evt_pirates`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Text shown when the event fires.
    #[serde(default)]
    pub description: String,
    /// Relative selection weight.
    pub weight: u32,
    /// Open map of effects, interpreted by gameplay code.
    #[serde(default)]
    pub effects: BTreeMap<String, serde_json::Value>,
}

/// Crew role catalog stored in `crew_roles.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(deny_unknown_fields)]
pub struct CrewRoles {
    /// Every hireable crew role.
    pub roles: Vec<CrewRole>,
}

/// A hireable crew role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(deny_unknown_fields)]
pub struct CrewRole {
    /// Stable identifier (e.g. `crw_pilot`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// What the role does aboard.
    #[serde(default)]
    pub description: String,
    /// Daily salary in credits.
    pub salary: u64,
    /// Open map of bonuses granted while the role is filled.
    #[serde(default)]
    pub bonuses: BTreeMap<String, f64>,
}

// ---------------------------------------------------------------------------
// game_settings
// ---------------------------------------------------------------------------

/// Static game rules stored in `game_settings.yaml`.
///
/// The top level is open: sections other than `player_defaults` are kept
/// as-is in [`GameSettings::sections`] for gameplay code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameSettings {
    /// Values used to seed `save_state` for a new game.
    pub player_defaults: PlayerDefaults,
    /// Every other top-level section, keyed by name.
    #[serde(flatten)]
    #[ts(skip)]
    pub sections: BTreeMap<String, serde_json::Value>,
}

/// Starting values for a new game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(deny_unknown_fields)]
pub struct PlayerDefaults {
    /// Credits a new captain starts with.
    pub starting_credits: u64,
    /// Planet id a new game starts at.
    pub starting_location: String,
    /// Fuel a new ship starts with.
    pub starting_fuel: u32,
}

impl Default for PlayerDefaults {
    fn default() -> Self {
        Self {
            starting_credits: 5000,
            starting_location: "plt_prime".to_owned(),
            starting_fuel: 100,
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

/// The fully hydrated state of one save.
///
/// A `GameState` only exists when all eight documents parsed; there is no
/// partially populated form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameState {
    /// The save these documents were read from.
    pub save_id: SaveId,
    /// Captain, ship, credits and day.
    pub save_state: SaveState,
    /// Planet catalog.
    pub planets: Planets,
    /// Planet trait catalog.
    pub planet_traits: PlanetTraits,
    /// Commodity catalog.
    pub commodities: Commodities,
    /// Ship module catalog.
    pub modules: Modules,
    /// Random event catalog.
    pub events: Events,
    /// Crew role catalog.
    pub crew_roles: CrewRoles,
    /// Static rules and defaults.
    pub game_settings: GameSettings,
}

impl GameState {
    /// Summary of this save for the load screen.
    pub fn meta(&self) -> SaveMeta {
        SaveMeta::from_state(self.save_id.clone(), &self.save_state)
    }

    /// Find a planet by id.
    pub fn planet(&self, id: &str) -> Option<&Planet> {
        self.planets.planets.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn keys_and_file_names_line_up() {
        for kind in DocumentKind::ALL {
            assert_eq!(kind.file_name(), format!("{}.yaml", kind.key()));
            assert_eq!(DocumentKind::from_key(kind.key()), Some(kind));
            assert_eq!(DocumentKind::from_key(kind.file_name()), Some(kind));
        }
        assert_eq!(DocumentKind::from_key("saves"), None);
    }

    #[test]
    fn templated_kinds_exclude_save_state() {
        assert!(!DocumentKind::TEMPLATED.contains(&DocumentKind::SaveState));
        assert_eq!(
            DocumentKind::TEMPLATED.len().saturating_add(1),
            DocumentKind::ALL.len()
        );
    }

    #[test]
    fn kind_serializes_as_bundle_key() {
        let json = serde_json::to_string(&DocumentKind::PlanetTraits).unwrap();
        assert_eq!(json, "\"planet_traits\"");
    }

    #[test]
    fn save_state_rejects_unknown_fields() {
        let yaml = "captain_name: Vex\nship_name: Rustbucket\ncredits: 10\n\
                    current_day: 1\ncurrent_location: plt_prime\ncurrent_fuel: 5\nhull: 3\n";
        let parsed: Result<SaveState, _> = serde_yml::from_str(yaml);
        assert!(parsed.is_err());
    }

    #[test]
    fn game_settings_top_level_is_open() {
        let yaml = "player_defaults:\n  starting_credits: 1\n  starting_location: x\n  \
                    starting_fuel: 2\neconomy:\n  inflation: 0.1\n";
        let parsed: GameSettings = serde_yml::from_str(yaml).unwrap();
        assert_eq!(parsed.player_defaults.starting_credits, 1);
    }

    #[test]
    fn player_defaults_fallback_values() {
        let defaults = PlayerDefaults::default();
        assert_eq!(defaults.starting_credits, 5000);
        assert_eq!(defaults.starting_location, "plt_prime");
        assert_eq!(defaults.starting_fuel, 100);
    }
}
