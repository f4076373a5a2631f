//! The backend bridge: everything the core asks of the host application.
//!
//! The core never touches the filesystem or the window directly. Save
//! directories, template extraction and window resizing all live behind
//! [`BackendBridge`]. The `galaxies-storage` crate provides the filesystem
//! implementation; tests provide scripted ones.
//!
//! Every call is awaited and acknowledged. Display commands that fail with
//! a [`BridgeError::Transient`] error may be retried by the caller.

use std::collections::BTreeMap;

use async_trait::async_trait;
use galaxies_types::{DisplayMode, DocumentKind, SaveId, SaveMeta};
use tracing::debug;

/// Errors reported by a backend bridge.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// A filesystem operation failed.
    #[error("{context}: {source}")]
    Io {
        /// What the bridge was doing.
        context: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A document could not be encoded or decoded.
    #[error("{context}: {source}")]
    Yaml {
        /// What the bridge was doing.
        context: String,
        /// The underlying YAML error.
        source: serde_yml::Error,
    },

    /// The request itself was invalid (blank names, malformed id).
    #[error("invalid request: {message}")]
    InvalidInput {
        /// Description of the problem.
        message: String,
    },

    /// A temporary failure; the same call may succeed if retried.
    #[error("transient bridge failure: {message}")]
    Transient {
        /// Description of the failure.
        message: String,
    },

    /// The host side is not available (window closed, runtime gone).
    #[error("bridge unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },
}

impl BridgeError {
    /// Whether retrying the same call could succeed.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

/// The raw documents of one save, keyed by [`DocumentKind`].
///
/// A bundle returned by a well-behaved bridge holds all eight documents.
/// Missing entries are not an error here; the hydrator reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBundle {
    documents: BTreeMap<DocumentKind, String>,
}

impl RawBundle {
    /// Create an empty bundle.
    pub const fn new() -> Self {
        Self {
            documents: BTreeMap::new(),
        }
    }

    /// Build a bundle from `(name, text)` pairs as sent over the wire.
    ///
    /// Names may be bundle keys (`planets`) or file names
    /// (`planets.yaml`). Entries with unknown names are dropped.
    pub fn from_named<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut bundle = Self::new();
        for (name, text) in entries {
            match DocumentKind::from_key(name.as_ref()) {
                Some(kind) => {
                    bundle.insert(kind, text);
                }
                None => debug!(name = name.as_ref(), "ignoring unknown bundle entry"),
            }
        }
        bundle
    }

    /// Insert or replace one document, returning the previous text.
    pub fn insert(&mut self, kind: DocumentKind, text: impl Into<String>) -> Option<String> {
        self.documents.insert(kind, text.into())
    }

    /// Raw text of one document, if present.
    pub fn get(&self, kind: DocumentKind) -> Option<&str> {
        self.documents.get(&kind).map(String::as_str)
    }

    /// Number of documents present.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the bundle holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Kinds that are absent from this bundle, in hydration order.
    pub fn missing(&self) -> Vec<DocumentKind> {
        DocumentKind::ALL
            .into_iter()
            .filter(|kind| !self.documents.contains_key(kind))
            .collect()
    }

    /// Iterate over `(kind, text)` pairs in hydration order.
    pub fn iter(&self) -> impl Iterator<Item = (DocumentKind, &str)> {
        self.documents
            .iter()
            .map(|(kind, text)| (*kind, text.as_str()))
    }
}

/// Host services consumed by the save core and the settings manager.
///
/// Implementations must be safe to share across tasks. The core holds the
/// bridge as `Arc<dyn BackendBridge>`.
#[async_trait]
pub trait BackendBridge: Send + Sync {
    /// Create a new save directory from the template set.
    ///
    /// Returns the new save id. An empty string means creation failed.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError`] if the call itself could not be completed.
    async fn create_new_game(&self, captain_name: &str, ship_name: &str)
    -> Result<String, BridgeError>;

    /// Read the raw documents of one save.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError`] if the save cannot be read at all.
    async fn load_game_data(&self, save_id: &SaveId) -> Result<RawBundle, BridgeError>;

    /// List the saves available for loading.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError`] if the save location cannot be scanned.
    async fn available_saves(&self) -> Result<Vec<SaveMeta>, BridgeError>;

    /// Switch the window between windowed and fullscreen presentation.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError`] if the host did not acknowledge the command.
    async fn set_display_mode(&self, mode: DisplayMode) -> Result<(), BridgeError>;

    /// Resize the window.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError`] if the host did not acknowledge the command.
    async fn set_resolution(&self, width: u32, height: u32) -> Result<(), BridgeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_named_accepts_keys_and_file_names() {
        let bundle = RawBundle::from_named([
            ("planets", "a"),
            ("events.yaml", "b"),
            ("not_a_document", "c"),
        ]);
        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle.get(DocumentKind::Planets), Some("a"));
        assert_eq!(bundle.get(DocumentKind::Events), Some("b"));
    }

    #[test]
    fn missing_lists_absent_kinds_in_order() {
        let mut bundle = RawBundle::new();
        for kind in DocumentKind::TEMPLATED {
            let _ = bundle.insert(kind, "x");
        }
        assert_eq!(bundle.missing(), vec![DocumentKind::SaveState]);
        let _ = bundle.insert(DocumentKind::SaveState, "y");
        assert!(bundle.missing().is_empty());
    }

    #[test]
    fn only_transient_errors_are_retryable() {
        let transient = BridgeError::Transient {
            message: String::from("window busy"),
        };
        let gone = BridgeError::Unavailable {
            message: String::from("runtime stopped"),
        };
        assert!(transient.is_transient());
        assert!(!gone.is_transient());
    }
}
