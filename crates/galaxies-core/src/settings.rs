//! The settings manager: device preferences and their side effects.
//!
//! [`SettingsManager`] owns the [`DeviceSettings`] for this machine. Values
//! are validated when set; applying display settings sends acknowledged
//! commands to the backend bridge, retrying transient failures a bounded
//! number of times. Theme derivation is pure.
//!
//! Mutation takes `&mut self`, so ownership serializes access.

use std::sync::Arc;
use std::time::Duration;

use galaxies_types::{
    AudioSettings, DebugSettings, DeviceSettings, DisplayMode, DisplaySettings, Resolution,
    ThemeCss, ThemeSettings,
};
use tracing::{debug, info, warn};

use crate::bridge::{BackendBridge, BridgeError};
use crate::config::DisplayConfig;
use crate::theme::derive_theme_css;

/// Errors raised by the settings manager.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// A value is outside what the setting accepts. Raised before any
    /// bridge call is made.
    #[error("invalid setting {setting}: {reason}")]
    InvalidSetting {
        /// Dotted setting path (e.g. `display.mode`).
        setting: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A display command was not acknowledged by the bridge.
    #[error("display command {command} failed after {attempts} attempt(s): {source}")]
    DisplayCommandFailed {
        /// The bridge command (`set_resolution` or `set_display_mode`).
        command: &'static str,
        /// How many times it was sent.
        attempts: u32,
        /// The last bridge error.
        source: BridgeError,
    },
}

/// A validated display command.
#[derive(Debug, Clone, Copy)]
enum DisplayCommand {
    Resolution(Resolution),
    Mode(DisplayMode),
}

impl DisplayCommand {
    const fn name(self) -> &'static str {
        match self {
            Self::Resolution(_) => "set_resolution",
            Self::Mode(_) => "set_display_mode",
        }
    }
}

/// Owner of the local device preferences.
pub struct SettingsManager {
    bridge: Arc<dyn BackendBridge>,
    settings: DeviceSettings,
    retry: DisplayConfig,
}

impl core::fmt::Debug for SettingsManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SettingsManager")
            .field("settings", &self.settings)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl SettingsManager {
    /// Create a manager holding the first-launch defaults.
    pub fn new(bridge: Arc<dyn BackendBridge>, retry: DisplayConfig) -> Self {
        Self::with_settings(bridge, DeviceSettings::default(), retry)
    }

    /// Create a manager from settings loaded from disk.
    ///
    /// An out-of-range master volume is replaced by the default. Display
    /// and theme values are checked when they are applied.
    pub fn with_settings(
        bridge: Arc<dyn BackendBridge>,
        mut settings: DeviceSettings,
        retry: DisplayConfig,
    ) -> Self {
        if let Err(err) = validate_master_volume(settings.audio.master_volume) {
            warn!(error = %err, "Stored audio settings rejected, using defaults");
            settings.audio = AudioSettings::default();
        }
        Self {
            bridge,
            settings,
            retry,
        }
    }

    /// Display preferences.
    pub const fn display(&self) -> &DisplaySettings {
        &self.settings.display
    }

    /// Color theme.
    pub const fn theme(&self) -> &ThemeSettings {
        &self.settings.theme
    }

    /// Audio preferences.
    pub const fn audio(&self) -> AudioSettings {
        self.settings.audio
    }

    /// Developer toggles.
    pub const fn debug(&self) -> DebugSettings {
        self.settings.debug
    }

    /// A copy of every setting, for persisting.
    pub fn snapshot(&self) -> DeviceSettings {
        self.settings.clone()
    }

    // -----------------------------------------------------------------------
    // Mutators
    // -----------------------------------------------------------------------

    /// Change the window size. Takes effect on the next [`Self::apply_display`].
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidSetting`] if either dimension is zero.
    pub fn set_resolution(&mut self, width: u32, height: u32) -> Result<(), SettingsError> {
        let resolution = Resolution { width, height };
        validate_resolution(resolution)?;
        self.settings.display.resolution = resolution;
        Ok(())
    }

    /// Change the display mode by name.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidSetting`] if `mode` is not one of
    /// `windowed`, `fullscreen` or `borderless`.
    pub fn set_display_mode(&mut self, mode: &str) -> Result<DisplayMode, SettingsError> {
        let parsed = parse_mode(mode)?;
        parsed.as_str().clone_into(&mut self.settings.display.mode);
        Ok(parsed)
    }

    /// Replace the color theme.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidSetting`] if either color is
    /// malformed. The previous theme is kept.
    pub fn set_theme(&mut self, theme: ThemeSettings) -> Result<ThemeCss, SettingsError> {
        let css = derive_theme_css(&theme)?;
        self.settings.theme = theme;
        Ok(css)
    }

    /// Change the master volume.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidSetting`] unless `volume` is within
    /// `[0.0, 1.0]`.
    pub fn set_master_volume(&mut self, volume: f32) -> Result<(), SettingsError> {
        validate_master_volume(volume)?;
        self.settings.audio.master_volume = volume;
        Ok(())
    }

    /// Replace the developer toggles.
    pub const fn set_debug(&mut self, debug: DebugSettings) {
        self.settings.debug = debug;
    }

    // -----------------------------------------------------------------------
    // Apply
    // -----------------------------------------------------------------------

    /// Check the stored display settings without sending anything.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidSetting`] for an unknown mode or a
    /// zero dimension.
    pub fn validate_display(&self) -> Result<(Resolution, DisplayMode), SettingsError> {
        let display = &self.settings.display;
        let mode = parse_mode(&display.mode)?;
        validate_resolution(display.resolution)?;
        Ok((display.resolution, mode))
    }

    /// Push the display settings to the host window.
    ///
    /// Validation happens first; nothing is sent if it fails. The
    /// resolution and the mode are then sent as two independent commands,
    /// each retried on transient failures. Both are attempted even if the
    /// first fails; the first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidSetting`] before any bridge call, or
    /// [`SettingsError::DisplayCommandFailed`] if a command was not
    /// acknowledged.
    pub async fn apply_display(&self) -> Result<(), SettingsError> {
        let (resolution, mode) = self.validate_display()?;

        let resized = self.deliver(DisplayCommand::Resolution(resolution)).await;
        let switched = self.deliver(DisplayCommand::Mode(mode)).await;

        resized.and(switched)?;
        info!(
            width = resolution.width,
            height = resolution.height,
            mode = %mode,
            "Display settings applied"
        );
        Ok(())
    }

    /// Derive the CSS values for the stored theme.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidSetting`] if a stored color is
    /// malformed.
    pub fn apply_theme(&self) -> Result<ThemeCss, SettingsError> {
        derive_theme_css(&self.settings.theme)
    }

    /// Send one command, retrying transient failures.
    async fn deliver(&self, command: DisplayCommand) -> Result<(), SettingsError> {
        let max_attempts = self.retry.retry_attempts.max(1);
        let backoff = Duration::from_millis(self.retry.retry_backoff_ms);
        let mut attempt: u32 = 0;

        loop {
            attempt = attempt.saturating_add(1);
            let result = match command {
                DisplayCommand::Resolution(r) => self.bridge.set_resolution(r.width, r.height).await,
                DisplayCommand::Mode(mode) => self.bridge.set_display_mode(mode).await,
            };

            match result {
                Ok(()) => {
                    debug!(command = command.name(), attempt, "Display command acknowledged");
                    return Ok(());
                }
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    debug!(command = command.name(), attempt, error = %err, "Retrying display command");
                    tokio::time::sleep(backoff).await;
                }
                Err(source) => {
                    warn!(command = command.name(), attempt, error = %source, "Display command failed");
                    return Err(SettingsError::DisplayCommandFailed {
                        command: command.name(),
                        attempts: attempt,
                        source,
                    });
                }
            }
        }
    }
}

/// Check a master volume value. NaN is rejected.
///
/// # Errors
///
/// Returns [`SettingsError::InvalidSetting`] unless `volume` is within
/// `[0.0, 1.0]`.
pub fn validate_master_volume(volume: f32) -> Result<(), SettingsError> {
    if (0.0..=1.0).contains(&volume) {
        Ok(())
    } else {
        Err(SettingsError::InvalidSetting {
            setting: "audio.master_volume",
            reason: format!("{volume} is outside 0.0..=1.0"),
        })
    }
}

fn parse_mode(mode: &str) -> Result<DisplayMode, SettingsError> {
    DisplayMode::from_name(mode).ok_or_else(|| SettingsError::InvalidSetting {
        setting: "display.mode",
        reason: format!("`{mode}` is not one of windowed, fullscreen, borderless"),
    })
}

fn validate_resolution(resolution: Resolution) -> Result<(), SettingsError> {
    if resolution.width == 0 || resolution.height == 0 {
        return Err(SettingsError::InvalidSetting {
            setting: "display.resolution",
            reason: format!("{}x{} has a zero dimension", resolution.width, resolution.height),
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use galaxies_types::{SaveId, SaveMeta};

    use super::*;
    use crate::bridge::RawBundle;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Resolution(u32, u32),
        Mode(DisplayMode),
    }

    /// Records display calls. Mode commands fail transiently
    /// `transient_mode_failures` times, or always when `mode_unavailable`.
    #[derive(Default)]
    struct RecordingBridge {
        calls: Mutex<Vec<Call>>,
        transient_mode_failures: AtomicU32,
        mode_unavailable: bool,
        resolution_unavailable: bool,
    }

    impl RecordingBridge {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BackendBridge for RecordingBridge {
        async fn create_new_game(&self, _: &str, _: &str) -> Result<String, BridgeError> {
            Ok(String::new())
        }

        async fn load_game_data(&self, _: &SaveId) -> Result<RawBundle, BridgeError> {
            Ok(RawBundle::new())
        }

        async fn available_saves(&self) -> Result<Vec<SaveMeta>, BridgeError> {
            Ok(Vec::new())
        }

        async fn set_display_mode(&self, mode: DisplayMode) -> Result<(), BridgeError> {
            self.calls.lock().unwrap().push(Call::Mode(mode));
            if self.mode_unavailable {
                return Err(BridgeError::Unavailable {
                    message: String::from("window closed"),
                });
            }
            let remaining = self.transient_mode_failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.transient_mode_failures
                    .store(remaining.saturating_sub(1), Ordering::SeqCst);
                return Err(BridgeError::Transient {
                    message: String::from("window busy"),
                });
            }
            Ok(())
        }

        async fn set_resolution(&self, width: u32, height: u32) -> Result<(), BridgeError> {
            self.calls.lock().unwrap().push(Call::Resolution(width, height));
            if self.resolution_unavailable {
                return Err(BridgeError::Unavailable {
                    message: String::from("window closed"),
                });
            }
            Ok(())
        }
    }

    fn fast_retry() -> DisplayConfig {
        DisplayConfig {
            retry_attempts: 3,
            retry_backoff_ms: 0,
        }
    }

    fn manager(bridge: &Arc<RecordingBridge>) -> SettingsManager {
        SettingsManager::new(Arc::clone(bridge) as Arc<dyn BackendBridge>, fast_retry())
    }

    #[tokio::test]
    async fn fullscreen_is_forwarded() {
        let bridge = Arc::new(RecordingBridge::default());
        let mut settings = manager(&bridge);
        settings.set_display_mode("fullscreen").unwrap();
        settings.apply_display().await.unwrap();

        assert_eq!(
            bridge.calls(),
            vec![Call::Resolution(1280, 720), Call::Mode(DisplayMode::Fullscreen)]
        );
    }

    #[tokio::test]
    async fn unknown_mode_is_rejected_before_any_call() {
        let bridge = Arc::new(RecordingBridge::default());
        let mut stored = DeviceSettings::default();
        stored.display.mode = String::from("ultra-wide");
        let settings = SettingsManager::with_settings(
            Arc::clone(&bridge) as Arc<dyn BackendBridge>,
            stored,
            fast_retry(),
        );

        let err = settings.apply_display().await.unwrap_err();
        assert!(matches!(
            err,
            SettingsError::InvalidSetting {
                setting: "display.mode",
                ..
            }
        ));
        assert!(bridge.calls().is_empty());
    }

    #[tokio::test]
    async fn zero_resolution_is_rejected_before_any_call() {
        let bridge = Arc::new(RecordingBridge::default());
        let mut stored = DeviceSettings::default();
        stored.display.resolution.height = 0;
        let settings = SettingsManager::with_settings(
            Arc::clone(&bridge) as Arc<dyn BackendBridge>,
            stored,
            fast_retry(),
        );

        assert!(settings.apply_display().await.is_err());
        assert!(bridge.calls().is_empty());
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let bridge = Arc::new(RecordingBridge {
            transient_mode_failures: AtomicU32::new(2),
            ..RecordingBridge::default()
        });
        let settings = manager(&bridge);
        settings.apply_display().await.unwrap();

        let mode_calls = bridge
            .calls()
            .into_iter()
            .filter(|call| matches!(call, Call::Mode(_)))
            .count();
        assert_eq!(mode_calls, 3);
    }

    #[tokio::test]
    async fn retries_are_bounded() {
        let bridge = Arc::new(RecordingBridge {
            transient_mode_failures: AtomicU32::new(10),
            ..RecordingBridge::default()
        });
        let settings = manager(&bridge);
        let err = settings.apply_display().await.unwrap_err();

        assert!(matches!(
            err,
            SettingsError::DisplayCommandFailed {
                command: "set_display_mode",
                attempts: 3,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn permanent_failure_is_not_retried() {
        let bridge = Arc::new(RecordingBridge {
            mode_unavailable: true,
            ..RecordingBridge::default()
        });
        let settings = manager(&bridge);
        let err = settings.apply_display().await.unwrap_err();

        assert!(matches!(
            err,
            SettingsError::DisplayCommandFailed { attempts: 1, .. }
        ));
        assert_eq!(bridge.calls().len(), 2);
    }

    #[tokio::test]
    async fn mode_is_sent_even_if_resize_fails() {
        let bridge = Arc::new(RecordingBridge {
            resolution_unavailable: true,
            ..RecordingBridge::default()
        });
        let settings = manager(&bridge);
        let err = settings.apply_display().await.unwrap_err();

        assert!(matches!(
            err,
            SettingsError::DisplayCommandFailed {
                command: "set_resolution",
                ..
            }
        ));
        assert_eq!(
            bridge.calls(),
            vec![Call::Resolution(1280, 720), Call::Mode(DisplayMode::Windowed)]
        );
    }

    #[test]
    fn stored_volume_out_of_range_falls_back_to_default() {
        let bridge = Arc::new(RecordingBridge::default());
        for volume in [7.5, -0.1, f32::NAN] {
            let mut stored = DeviceSettings::default();
            stored.audio.master_volume = volume;
            stored.debug.skip_splash = true;

            let settings = SettingsManager::with_settings(
                Arc::clone(&bridge) as Arc<dyn BackendBridge>,
                stored,
                fast_retry(),
            );

            assert_eq!(settings.audio(), AudioSettings::default());
            assert!(settings.debug().skip_splash);
        }
    }

    #[test]
    fn stored_volume_in_range_is_kept() {
        let bridge = Arc::new(RecordingBridge::default());
        let mut stored = DeviceSettings::default();
        stored.audio.master_volume = 0.25;

        let settings = SettingsManager::with_settings(
            Arc::clone(&bridge) as Arc<dyn BackendBridge>,
            stored,
            fast_retry(),
        );

        assert_eq!(settings.audio().master_volume, 0.25);
    }

    #[test]
    fn setters_validate() {
        let bridge = Arc::new(RecordingBridge::default());
        let mut settings = manager(&bridge);

        assert!(settings.set_resolution(0, 1080).is_err());
        assert!(settings.set_display_mode("Fullscreen").is_err());
        assert!(settings.set_master_volume(1.5).is_err());
        assert!(settings.set_master_volume(f32::NAN).is_err());
        assert!(
            settings
                .set_theme(ThemeSettings {
                    background: String::from("#000000"),
                    text: String::from("lime"),
                })
                .is_err()
        );

        // Rejected values leave the defaults in place.
        assert_eq!(settings.snapshot(), DeviceSettings::default());

        settings.set_resolution(1920, 1080).unwrap();
        assert_eq!(
            settings.set_display_mode("borderless").unwrap(),
            DisplayMode::Borderless
        );
        settings.set_master_volume(0.0).unwrap();
        settings.set_debug(DebugSettings {
            skip_splash: true,
            dev_mode: false,
        });

        let snapshot = settings.snapshot();
        assert_eq!(snapshot.display.resolution.width, 1920);
        assert_eq!(snapshot.display.mode, "borderless");
        assert_eq!(snapshot.audio.master_volume, 0.0);
        assert!(snapshot.debug.skip_splash);
    }

    #[test]
    fn apply_theme_uses_stored_colors() {
        let bridge = Arc::new(RecordingBridge::default());
        let mut settings = manager(&bridge);
        let css = settings
            .set_theme(ThemeSettings {
                background: String::from("101010"),
                text: String::from("ffb000"),
            })
            .unwrap();

        assert_eq!(settings.apply_theme().unwrap(), css);
        assert_eq!(css.glow_css, "0 0 5px rgba(255, 176, 0, 0.5)");
        assert!(bridge.calls().is_empty());
    }
}
