//! Local device preferences.
//!
//! These settings belong to the machine, not to a save: display, theme,
//! audio and debug toggles. They are persisted as `client_settings.yaml`
//! in the user's config directory. Every section falls back to its
//! defaults when missing, so older settings files keep loading.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Window presentation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Decorated window at the configured resolution.
    Windowed,
    /// Exclusive fullscreen.
    Fullscreen,
    /// Borderless fullscreen window.
    Borderless,
}

impl DisplayMode {
    /// All accepted modes.
    pub const ALL: [Self; 3] = [Self::Windowed, Self::Fullscreen, Self::Borderless];

    /// The lowercase name used in settings files and bridge calls.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Windowed => "windowed",
            Self::Fullscreen => "fullscreen",
            Self::Borderless => "borderless",
        }
    }

    /// Parse a mode name. Matching is exact: `"Fullscreen"` is rejected.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.as_str() == name)
    }

    /// Whether the window covers the whole screen in this mode.
    pub const fn covers_screen(self) -> bool {
        matches!(self, Self::Fullscreen | Self::Borderless)
    }
}

impl core::fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Window size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Resolution {
    /// Width in pixels. Must be positive.
    pub width: u32,
    /// Height in pixels. Must be positive.
    pub height: u32,
}

/// Display preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DisplaySettings {
    /// Window size.
    #[serde(default = "default_resolution")]
    pub resolution: Resolution,

    /// Mode name as edited by the UI. Validated against [`DisplayMode`]
    /// when the settings are applied, not when they are stored.
    #[serde(default = "default_mode")]
    pub mode: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
            mode: default_mode(),
        }
    }
}

/// Terminal-style color theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ThemeSettings {
    /// Background color as six hex digits, optionally prefixed with `#`.
    #[serde(default = "default_background")]
    pub background: String,

    /// Text color as six hex digits, optionally prefixed with `#`.
    #[serde(default = "default_text")]
    pub text: String,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            background: default_background(),
            text: default_text(),
        }
    }
}

/// Audio preferences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AudioSettings {
    /// Master volume in `[0.0, 1.0]`.
    #[serde(default = "default_master_volume")]
    pub master_volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: default_master_volume(),
        }
    }
}

/// Developer toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DebugSettings {
    /// Skip the splash screen on launch.
    #[serde(default)]
    pub skip_splash: bool,

    /// Enable developer tooling in the UI.
    #[serde(default = "default_true")]
    pub dev_mode: bool,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            skip_splash: false,
            dev_mode: true,
        }
    }
}

/// All device preferences; the shape of `client_settings.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DeviceSettings {
    /// Display preferences.
    #[serde(default)]
    pub display: DisplaySettings,
    /// Color theme.
    #[serde(default)]
    pub theme: ThemeSettings,
    /// Audio preferences.
    #[serde(default)]
    pub audio: AudioSettings,
    /// Developer toggles.
    #[serde(default)]
    pub debug: DebugSettings,
}

/// CSS values derived from [`ThemeSettings`] for the presentation layer.
///
/// Recomputed on demand and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ThemeCss {
    /// Value for `--bg-color` (`#rrggbb`).
    pub background_css: String,
    /// Value for `--text-color` (`#rrggbb`).
    pub text_css: String,
    /// Value for `--text-glow` (a `text-shadow` descriptor).
    pub glow_css: String,
}

// ---------------------------------------------------------------------------
// Default value functions (required by serde)
// ---------------------------------------------------------------------------

const fn default_resolution() -> Resolution {
    Resolution {
        width: 1280,
        height: 720,
    }
}

fn default_mode() -> String {
    DisplayMode::Windowed.as_str().to_owned()
}

fn default_background() -> String {
    "#000000".to_owned()
}

fn default_text() -> String {
    "#33ff33".to_owned()
}

const fn default_master_volume() -> f32 {
    0.8
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_first_launch_values() {
        let settings = DeviceSettings::default();
        assert_eq!(settings.display.resolution.width, 1280);
        assert_eq!(settings.display.resolution.height, 720);
        assert_eq!(settings.display.mode, "windowed");
        assert_eq!(settings.theme.background, "#000000");
        assert_eq!(settings.theme.text, "#33ff33");
        assert_eq!(settings.audio.master_volume, 0.8);
        assert!(!settings.debug.skip_splash);
        assert!(settings.debug.dev_mode);
    }

    #[test]
    fn display_mode_names_are_exact() {
        assert_eq!(DisplayMode::from_name("fullscreen"), Some(DisplayMode::Fullscreen));
        assert_eq!(DisplayMode::from_name("borderless"), Some(DisplayMode::Borderless));
        assert_eq!(DisplayMode::from_name("Fullscreen"), None);
        assert_eq!(DisplayMode::from_name("ultra-wide"), None);
    }

    #[test]
    fn only_windowed_leaves_screen_uncovered() {
        assert!(!DisplayMode::Windowed.covers_screen());
        assert!(DisplayMode::Fullscreen.covers_screen());
        assert!(DisplayMode::Borderless.covers_screen());
    }

    #[test]
    fn partial_settings_file_uses_defaults() {
        let yaml = "display:\n  mode: borderless\naudio:\n  master_volume: 0.25\n";
        let settings: DeviceSettings = serde_yml::from_str(yaml).unwrap();
        assert_eq!(settings.display.mode, "borderless");
        assert_eq!(settings.display.resolution.width, 1280);
        assert_eq!(settings.audio.master_volume, 0.25);
        assert_eq!(settings.theme, ThemeSettings::default());
        assert!(settings.debug.dev_mode);
    }
}
