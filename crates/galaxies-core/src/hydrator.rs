//! Document hydration: raw YAML text into typed save documents.
//!
//! Hydration is pure and deterministic. Each document kind has exactly one
//! schema (see [`galaxies_types::documents`]); text that does not match it
//! is rejected with a [`ParseFailure`] naming the document. Nothing is
//! coerced: a quoted `"5000"` is not a number and a missing required field
//! is an error, not a default.
//!
//! [`hydrate_bundle`] assembles a complete [`GameState`] or nothing.

use std::collections::BTreeSet;

use galaxies_types::{
    Commodities, CrewRoles, DocumentKind, Events, GameSettings, GameState, Modules, PlanetTraits,
    Planets, SaveId, SaveState,
};
use serde::de::DeserializeOwned;

use crate::bridge::RawBundle;

/// One document's raw text did not match its schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to parse {document}: {message}")]
pub struct ParseFailure {
    /// The document that failed.
    pub document: DocumentKind,
    /// What was wrong with it.
    pub message: String,
}

/// Errors that can occur while hydrating a whole bundle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HydrationError {
    /// A document was present but malformed.
    #[error(transparent)]
    Parse(#[from] ParseFailure),

    /// A document was absent from the bundle.
    #[error("document {document} missing from bundle")]
    MissingDocument {
        /// The absent document.
        document: DocumentKind,
    },
}

impl HydrationError {
    /// The document that caused the failure.
    pub const fn document(&self) -> DocumentKind {
        match self {
            Self::Parse(failure) => failure.document,
            Self::MissingDocument { document } => *document,
        }
    }
}

/// A typed save document with a fixed [`DocumentKind`].
pub trait GameDocument: DeserializeOwned {
    /// Which bundle entry this type is parsed from.
    const KIND: DocumentKind;

    /// Checks that go beyond the shape of the YAML.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated rule.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

impl GameDocument for SaveState {
    const KIND: DocumentKind = DocumentKind::SaveState;

    fn validate(&self) -> Result<(), String> {
        if self.captain_name.trim().is_empty() {
            return Err("captain_name is blank".to_owned());
        }
        if self.ship_name.trim().is_empty() {
            return Err("ship_name is blank".to_owned());
        }
        if self.current_location.trim().is_empty() {
            return Err("current_location is blank".to_owned());
        }
        Ok(())
    }
}

impl GameDocument for Planets {
    const KIND: DocumentKind = DocumentKind::Planets;

    fn validate(&self) -> Result<(), String> {
        ensure_unique_ids("planet", self.planets.iter().map(|p| p.id.as_str()))
    }
}

impl GameDocument for PlanetTraits {
    const KIND: DocumentKind = DocumentKind::PlanetTraits;

    fn validate(&self) -> Result<(), String> {
        ensure_unique_ids("planet trait", self.traits.iter().map(|t| t.id.as_str()))
    }
}

impl GameDocument for Commodities {
    const KIND: DocumentKind = DocumentKind::Commodities;

    fn validate(&self) -> Result<(), String> {
        ensure_unique_ids("commodity", self.commodities.iter().map(|c| c.id.as_str()))
    }
}

impl GameDocument for Modules {
    const KIND: DocumentKind = DocumentKind::Modules;

    fn validate(&self) -> Result<(), String> {
        ensure_unique_ids("module", self.modules.iter().map(|m| m.id.as_str()))
    }
}

impl GameDocument for Events {
    const KIND: DocumentKind = DocumentKind::Events;

    fn validate(&self) -> Result<(), String> {
        ensure_unique_ids("event", self.events.iter().map(|e| e.id.as_str()))
    }
}

impl GameDocument for CrewRoles {
    const KIND: DocumentKind = DocumentKind::CrewRoles;

    fn validate(&self) -> Result<(), String> {
        ensure_unique_ids("crew role", self.roles.iter().map(|r| r.id.as_str()))
    }
}

impl GameDocument for GameSettings {
    const KIND: DocumentKind = DocumentKind::GameSettings;
}

/// Catalog ids must be non-empty and unique within their document.
fn ensure_unique_ids<'a>(what: &str, ids: impl Iterator<Item = &'a str>) -> Result<(), String> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(format!("{what} with blank id"));
        }
        if !seen.insert(id) {
            return Err(format!("duplicate {what} id `{id}`"));
        }
    }
    Ok(())
}

/// Parse one document.
///
/// # Errors
///
/// Returns [`ParseFailure`] if the text is blank, is not valid YAML, does
/// not match the schema of `D`, or fails `D`'s validation rules.
pub fn hydrate_document<D: GameDocument>(raw: &str) -> Result<D, ParseFailure> {
    let fail = |message: String| ParseFailure {
        document: D::KIND,
        message,
    };

    if raw.trim().is_empty() {
        return Err(fail("document is empty".to_owned()));
    }
    let document: D = serde_yml::from_str(raw).map_err(|e| fail(e.to_string()))?;
    document.validate().map_err(fail)?;
    Ok(document)
}

fn hydrate_entry<D: GameDocument>(bundle: &RawBundle) -> Result<D, HydrationError> {
    let raw = bundle
        .get(D::KIND)
        .ok_or(HydrationError::MissingDocument { document: D::KIND })?;
    Ok(hydrate_document::<D>(raw)?)
}

/// Hydrate all eight documents of a bundle into a [`GameState`].
///
/// Documents are processed in [`DocumentKind::ALL`] order and hydration
/// stops at the first failure, so the error always names the first bad
/// document in that order.
///
/// # Errors
///
/// Returns [`HydrationError`] for the first missing or malformed document.
pub fn hydrate_bundle(save_id: SaveId, bundle: &RawBundle) -> Result<GameState, HydrationError> {
    Ok(GameState {
        save_id,
        save_state: hydrate_entry(bundle)?,
        planets: hydrate_entry(bundle)?,
        planet_traits: hydrate_entry(bundle)?,
        commodities: hydrate_entry(bundle)?,
        modules: hydrate_entry(bundle)?,
        events: hydrate_entry(bundle)?,
        crew_roles: hydrate_entry(bundle)?,
        game_settings: hydrate_entry(bundle)?,
    })
}
