//! Visual (appearance) preferences.
//!
//! Loaded separately from the timer settings, merged over the hardcoded
//! defaults, and written in full only when the user saves.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{parse_bounded, ValidationError};

/// Accepted main-window transparency.
pub const MAIN_TRANSPARENCY_RANGE: std::ops::RangeInclusive<f64> = 0.5..=1.0;

/// Accepted font sizes in points: any positive whole number.
pub const FONT_SIZE_RANGE: std::ops::RangeInclusive<u32> = 1..=u32::MAX;

fn default_color_theme() -> String {
    "blue".to_string()
}

fn default_font_family() -> String {
    "Helvetica".to_string()
}

fn default_font_size() -> u32 {
    24
}

fn default_transparency() -> f64 {
    0.97
}

fn default_alert_sound() -> bool {
    true
}

/// Clamps `value` into `range`, replacing non-finite values with `fallback`.
pub fn clamp_opacity(value: f64, range: &std::ops::RangeInclusive<f64>, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(*range.start(), *range.end())
    } else {
        fallback
    }
}

// ============================================================================
// Theme
// ============================================================================

/// Appearance mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

impl FromStr for Theme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(ValidationError::UnknownTheme(other.to_string())),
        }
    }
}

// ============================================================================
// Colors
// ============================================================================

/// The five named color roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    Primary,
    Secondary,
    Accent,
    Text,
    Warning,
}

impl ColorRole {
    /// All roles, in settings-window order.
    pub const ALL: [ColorRole; 5] = [
        ColorRole::Primary,
        ColorRole::Secondary,
        ColorRole::Accent,
        ColorRole::Text,
        ColorRole::Warning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorRole::Primary => "primary",
            ColorRole::Secondary => "secondary",
            ColorRole::Accent => "accent",
            ColorRole::Text => "text",
            ColorRole::Warning => "warning",
        }
    }
}

impl fmt::Display for ColorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ColorRole::ALL
            .into_iter()
            .find(|role| role.as_str() == wanted)
            .ok_or(ValidationError::UnknownColorRole(wanted))
    }
}

/// Hex colors per role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomColors {
    /// Main background
    pub primary: String,
    /// Secondary background
    pub secondary: String,
    /// Buttons and highlights
    pub accent: String,
    /// Label text
    pub text: String,
    /// Alert window background
    pub warning: String,
}

impl Default for CustomColors {
    fn default() -> Self {
        Self {
            primary: "#1A1B26".to_string(),
            secondary: "#24283B".to_string(),
            accent: "#7AA2F7".to_string(),
            text: "#A9B1D6".to_string(),
            warning: "#F7768E".to_string(),
        }
    }
}

impl CustomColors {
    /// Returns the color for `role`.
    pub fn get(&self, role: ColorRole) -> &str {
        match role {
            ColorRole::Primary => &self.primary,
            ColorRole::Secondary => &self.secondary,
            ColorRole::Accent => &self.accent,
            ColorRole::Text => &self.text,
            ColorRole::Warning => &self.warning,
        }
    }

    fn slot_mut(&mut self, role: ColorRole) -> &mut String {
        match role {
            ColorRole::Primary => &mut self.primary,
            ColorRole::Secondary => &mut self.secondary,
            ColorRole::Accent => &mut self.accent,
            ColorRole::Text => &mut self.text,
            ColorRole::Warning => &mut self.warning,
        }
    }
}

fn normalize_hex_color(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(format!("#{}", digits.to_ascii_uppercase()))
    } else {
        Err(ValidationError::InvalidColor(trimmed.to_string()))
    }
}

// ============================================================================
// VisualSettings
// ============================================================================

/// Appearance preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualSettings {
    /// Dark or light appearance
    #[serde(default)]
    pub theme: Theme,

    /// Name of the widget color theme
    #[serde(default = "default_color_theme")]
    pub color_theme: String,

    /// Font family for all labels
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Base font size in points
    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// Colors per role
    #[serde(default)]
    pub custom_colors: CustomColors,

    /// Main window opacity (0.5-1.0)
    #[serde(default = "default_transparency")]
    pub transparency: f64,

    /// Whether to play a sound when a work phase ends
    #[serde(default = "default_alert_sound")]
    pub alert_sound: bool,
}

impl Default for VisualSettings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            color_theme: default_color_theme(),
            font_family: default_font_family(),
            font_size: default_font_size(),
            custom_colors: CustomColors::default(),
            transparency: default_transparency(),
            alert_sound: default_alert_sound(),
        }
    }
}

impl VisualSettings {
    /// Brings loaded values back into their accepted ranges.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.transparency =
            clamp_opacity(self.transparency, &MAIN_TRANSPARENCY_RANGE, default_transparency());
        if !FONT_SIZE_RANGE.contains(&self.font_size) {
            self.font_size = default_font_size();
        }
        if self.font_family.trim().is_empty() {
            self.font_family = default_font_family();
        }
        for role in ColorRole::ALL {
            let slot = self.custom_colors.slot_mut(role);
            match normalize_hex_color(slot) {
                Ok(hex) => *slot = hex,
                Err(_) => *slot = CustomColors::default().get(role).to_string(),
            }
        }
        self
    }

    /// Sets the theme from user text.
    pub fn set_theme_input(&mut self, input: &str) -> Result<Theme, ValidationError> {
        let theme = input.parse()?;
        self.theme = theme;
        Ok(theme)
    }

    /// Sets one color role from user text.
    pub fn set_color(&mut self, role: ColorRole, input: &str) -> Result<(), ValidationError> {
        *self.custom_colors.slot_mut(role) = normalize_hex_color(input)?;
        Ok(())
    }

    /// Sets the font family.
    pub fn set_font_family(&mut self, family: &str) -> Result<(), ValidationError> {
        let family = family.trim();
        if family.is_empty() {
            return Err(ValidationError::EmptyFontFamily);
        }
        self.font_family = family.to_string();
        Ok(())
    }

    /// Sets the font size from user text.
    pub fn set_font_size_input(&mut self, input: &str) -> Result<u32, ValidationError> {
        let size = parse_bounded("font size", input, FONT_SIZE_RANGE)?;
        self.font_size = size;
        Ok(size)
    }

    /// Sets the main-window transparency, clamped into range.
    pub fn set_transparency(&mut self, value: f64) -> f64 {
        self.transparency = clamp_opacity(value, &MAIN_TRANSPARENCY_RANGE, self.transparency);
        self.transparency
    }
}
