//! Save identifiers.
//!
//! A [`SaveId`] names exactly one save directory. Ids are generated by the
//! backend when a new game is created and never change afterwards. New ids
//! use UUID v7 (time-ordered) so two saves created within the same second
//! still get distinct names, and a plain directory listing sorts them by
//! creation time.

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Prefix shared by every generated save id.
pub const SAVE_ID_PREFIX: &str = "save_";

/// Longest accepted save id, in bytes.
const MAX_SAVE_ID_LEN: usize = 128;

/// Reasons a string cannot be used as a [`SaveId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SaveIdError {
    /// The id was empty (the backend's "creation failed" signal).
    #[error("save id is empty")]
    Empty,

    /// The id is longer than the accepted maximum.
    #[error("save id is {len} bytes long (max {max})")]
    TooLong {
        /// Actual length in bytes.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// The id contains a character that is not allowed in a directory name.
    #[error("save id contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Unique identifier of one persisted save.
///
/// Only ASCII letters, digits, `_` and `-` are accepted, which keeps an id
/// safe to use as a single path component.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SaveId(String);

impl SaveId {
    /// Generate a fresh, globally unique save id (`save_<uuid v7 hex>`).
    pub fn generate() -> Self {
        Self(format!("{SAVE_ID_PREFIX}{}", Uuid::now_v7().simple()))
    }

    /// Validate an id received from the backend or the presentation layer.
    ///
    /// # Errors
    ///
    /// Returns [`SaveIdError`] if the string is empty, too long, or contains
    /// characters outside `[A-Za-z0-9_-]`.
    pub fn parse(raw: impl Into<String>) -> Result<Self, SaveIdError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(SaveIdError::Empty);
        }
        if raw.len() > MAX_SAVE_ID_LEN {
            return Err(SaveIdError::TooLong {
                len: raw.len(),
                max: MAX_SAVE_ID_LEN,
            });
        }
        if let Some(bad) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(SaveIdError::InvalidCharacter(bad));
        }
        Ok(Self(raw))
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the id and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for SaveId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SaveId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SaveId {
    type Error = SaveIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for SaveId {
    type Error = SaveIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl<'de> Deserialize<'de> for SaveId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(raw).map_err(serde::de::Error::custom)
    }
}
