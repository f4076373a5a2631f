//! Theme derivation: terminal colors into CSS custom property values.
//!
//! The presentation layer sets `--bg-color`, `--text-color` and
//! `--text-glow` from a [`ThemeCss`]. The glow is the text color at half
//! opacity with a 5px blur.

use galaxies_types::{ThemeCss, ThemeSettings};

use crate::settings::SettingsError;

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    /// Red component.
    pub r: u8,
    /// Green component.
    pub g: u8,
    /// Blue component.
    pub b: u8,
}

impl Rgb {
    /// The normalized `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// A `text-shadow` descriptor glowing in this color.
    pub fn glow_css(self) -> String {
        format!("0 0 5px rgba({}, {}, {}, 0.5)", self.r, self.g, self.b)
    }
}

/// Parse a six-digit hex color, with or without a leading `#`.
///
/// Returns `None` for anything else: short forms, alpha channels, signs,
/// whitespace or non-hex digits.
pub fn parse_hex_color(value: &str) -> Option<Rgb> {
    let digits = value.strip_prefix('#').unwrap_or(value);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let component = |range: core::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
    };
    Some(Rgb {
        r: component(0..2)?,
        g: component(2..4)?,
        b: component(4..6)?,
    })
}

/// Derive the CSS values for a theme.
///
/// # Errors
///
/// Returns [`SettingsError::InvalidSetting`] if either color is not a
/// six-digit hex value.
pub fn derive_theme_css(theme: &ThemeSettings) -> Result<ThemeCss, SettingsError> {
    let background = parse_color("theme.background", &theme.background)?;
    let text = parse_color("theme.text", &theme.text)?;
    Ok(ThemeCss {
        background_css: background.to_hex(),
        text_css: text.to_hex(),
        glow_css: text.glow_css(),
    })
}

fn parse_color(setting: &'static str, value: &str) -> Result<Rgb, SettingsError> {
    parse_hex_color(value).ok_or_else(|| SettingsError::InvalidSetting {
        setting,
        reason: format!("`{value}` is not a six-digit hex color"),
    })
}
