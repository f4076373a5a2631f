//! The canonical initial documents, embedded at compile time.
//!
//! Every new save starts as a copy of these seven catalog documents plus a
//! generated `save_state.yaml`. The default `client_settings.yaml` is
//! extracted to the config directory on first launch.

use std::collections::BTreeMap;

use galaxies_core::{RawBundle, hydrate_document};
use galaxies_types::{DocumentKind, GameSettings, PlayerDefaults};
use tracing::warn;

const PLANETS: &str = include_str!("../game_data/planets.yaml");
const PLANET_TRAITS: &str = include_str!("../game_data/planet_traits.yaml");
const COMMODITIES: &str = include_str!("../game_data/commodities.yaml");
const MODULES: &str = include_str!("../game_data/modules.yaml");
const EVENTS: &str = include_str!("../game_data/events.yaml");
const CREW_ROLES: &str = include_str!("../game_data/crew_roles.yaml");
const GAME_SETTINGS: &str = include_str!("../game_data/game_settings.yaml");
const CLIENT_SETTINGS: &str = include_str!("../game_data/client_settings.yaml");

/// A set of template documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSet {
    documents: BTreeMap<DocumentKind, String>,
    client_settings: String,
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self::embedded()
    }
}

impl TemplateSet {
    /// The templates shipped with the game.
    pub fn embedded() -> Self {
        let documents = [
            (DocumentKind::Planets, PLANETS),
            (DocumentKind::PlanetTraits, PLANET_TRAITS),
            (DocumentKind::Commodities, COMMODITIES),
            (DocumentKind::Modules, MODULES),
            (DocumentKind::Events, EVENTS),
            (DocumentKind::CrewRoles, CREW_ROLES),
            (DocumentKind::GameSettings, GAME_SETTINGS),
        ]
        .into_iter()
        .map(|(kind, text)| (kind, text.to_owned()))
        .collect();

        Self {
            documents,
            client_settings: CLIENT_SETTINGS.to_owned(),
        }
    }

    /// Replace one template. `save_state` is generated per save and cannot
    /// be templated; it is ignored here.
    #[must_use]
    pub fn with_document(mut self, kind: DocumentKind, text: impl Into<String>) -> Self {
        if kind == DocumentKind::SaveState {
            warn!("save_state is generated per save, ignoring template override");
        } else {
            let _ = self.documents.insert(kind, text.into());
        }
        self
    }

    /// Drop one template.
    #[cfg(test)]
    #[must_use]
    pub(crate) fn without_document(mut self, kind: DocumentKind) -> Self {
        let _ = self.documents.remove(&kind);
        self
    }

    /// Replace the default client settings.
    #[must_use]
    pub fn with_client_settings(mut self, text: impl Into<String>) -> Self {
        self.client_settings = text.into();
        self
    }

    /// Template text for one document.
    pub fn get(&self, kind: DocumentKind) -> Option<&str> {
        self.documents.get(&kind).map(String::as_str)
    }

    /// Default `client_settings.yaml` text.
    pub fn client_settings(&self) -> &str {
        &self.client_settings
    }

    /// The seven catalog templates as a bundle (no `save_state`).
    pub fn catalog_bundle(&self) -> RawBundle {
        RawBundle::from_named(
            self.documents
                .iter()
                .map(|(kind, text)| (kind.key(), text.clone())),
        )
    }

    /// Starting values for a new captain, read from the `game_settings`
    /// template. Falls back to 5000 credits at `plt_prime` with 100 fuel
    /// when the template is missing or malformed.
    pub fn player_defaults(&self) -> PlayerDefaults {
        let Some(text) = self.get(DocumentKind::GameSettings) else {
            warn!("game_settings template missing, using built-in player defaults");
            return PlayerDefaults::default();
        };
        match hydrate_document::<GameSettings>(text) {
            Ok(settings) => settings.player_defaults,
            Err(err) => {
                warn!(error = %err, "game_settings template unreadable, using built-in player defaults");
                PlayerDefaults::default()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use galaxies_types::{Commodities, Planets};

    use super::*;

    #[test]
    fn embedded_set_has_every_templated_document() {
        let templates = TemplateSet::embedded();
        for kind in DocumentKind::TEMPLATED {
            assert!(templates.get(kind).is_some(), "missing {kind}");
        }
        assert!(templates.get(DocumentKind::SaveState).is_none());
        assert_eq!(templates.catalog_bundle().missing(), vec![DocumentKind::SaveState]);
    }

    #[test]
    fn embedded_catalogs_hydrate() {
        let templates = TemplateSet::embedded();
        let planets: Planets =
            hydrate_document(templates.get(DocumentKind::Planets).unwrap()).unwrap();
        assert!(planets.planets.iter().any(|p| p.id == "plt_prime"));
        let commodities: Commodities =
            hydrate_document(templates.get(DocumentKind::Commodities).unwrap()).unwrap();
        assert!(commodities.commodities.iter().any(|c| c.illegal));
    }

    #[test]
    fn player_defaults_come_from_game_settings() {
        let templates = TemplateSet::embedded().with_document(
            DocumentKind::GameSettings,
            "player_defaults:\n  starting_credits: 250\n  starting_location: plt_gutter\n  starting_fuel: 40\n",
        );
        let defaults = templates.player_defaults();
        assert_eq!(defaults.starting_credits, 250);
        assert_eq!(defaults.starting_location, "plt_gutter");
        assert_eq!(defaults.starting_fuel, 40);
    }

    #[test]
    fn broken_game_settings_fall_back() {
        let templates =
            TemplateSet::embedded().with_document(DocumentKind::GameSettings, "player_defaults: [");
        assert_eq!(templates.player_defaults(), PlayerDefaults::default());
    }

    #[test]
    fn save_state_cannot_be_templated() {
        let templates =
            TemplateSet::embedded().with_document(DocumentKind::SaveState, "captain_name: x");
        assert!(templates.get(DocumentKind::SaveState).is_none());
    }
}
