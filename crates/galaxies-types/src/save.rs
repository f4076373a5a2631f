//! Load-screen summary of a save.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::documents::SaveState;
use crate::ids::SaveId;

/// Summary data shown for one save on the load screen.
///
/// Built by the backend from the save's `save_state` document. `credits`
/// and `current_day` change as the game is played; `save_id` never does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SaveMeta {
    /// Directory name of the save.
    pub save_id: SaveId,
    /// Name of the player's captain.
    pub captain_name: String,
    /// Name of the player's ship.
    pub ship_name: String,
    /// Credits on hand.
    pub credits: u64,
    /// Current in-game day.
    pub current_day: u32,
    /// Planet id the ship is docked at.
    pub current_location: String,
    /// Fuel units in the tank.
    pub current_fuel: u32,
}

impl SaveMeta {
    /// Build a summary from a parsed `save_state` document.
    pub fn from_state(save_id: SaveId, state: &SaveState) -> Self {
        Self {
            save_id,
            captain_name: state.captain_name.clone(),
            ship_name: state.ship_name.clone(),
            credits: state.credits,
            current_day: state.current_day,
            current_location: state.current_location.clone(),
            current_fuel: state.current_fuel,
        }
    }
}
