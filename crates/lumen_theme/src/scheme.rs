//! Color scheme and theme preference
//!
//! [`ThemePreference`] is what the user chose (light, dark, or auto);
//! [`ColorScheme`] is what actually renders once auto has been resolved
//! against the ambient preference.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A concrete light or dark scheme
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    /// The opposite scheme
    pub fn toggle(self) -> Self {
        match self {
            ColorScheme::Light => ColorScheme::Dark,
            ColorScheme::Dark => ColorScheme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == ColorScheme::Dark
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown scheme or preference literal
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme `{0}` (expected light, dark or auto)")]
pub struct ParseSchemeError(pub String);

impl FromStr for ColorScheme {
    type Err = ParseSchemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ColorScheme::Light),
            "dark" => Ok(ColorScheme::Dark),
            _ => Err(ParseSchemeError(s.to_string())),
        }
    }
}

/// The user's theme choice
///
/// `Auto` is never stored: it is the absence of a stored value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    Auto,
}

impl ThemePreference {
    /// Resolve to the scheme that renders, given the ambient preference
    pub fn resolve(self, ambient: ColorScheme) -> ColorScheme {
        match self {
            ThemePreference::Auto => ambient,
            ThemePreference::Dark => ColorScheme::Dark,
            ThemePreference::Light => ColorScheme::Light,
        }
    }

    pub fn is_auto(self) -> bool {
        self == ThemePreference::Auto
    }

    /// The literal kept in durable storage; `None` means the key is absent
    pub fn stored_value(self) -> Option<&'static str> {
        match self {
            ThemePreference::Light => Some("light"),
            ThemePreference::Dark => Some("dark"),
            ThemePreference::Auto => None,
        }
    }

    /// Interpret a stored value; absent or unrecognized values mean `Auto`
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            None => ThemePreference::Auto,
            Some("light") => ThemePreference::Light,
            Some("dark") => ThemePreference::Dark,
            Some(other) => {
                tracing::warn!("ignoring unrecognized stored theme {:?}", other);
                ThemePreference::Auto
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        self.stored_value().unwrap_or("auto")
    }
}

impl From<ColorScheme> for ThemePreference {
    fn from(scheme: ColorScheme) -> Self {
        match scheme {
            ColorScheme::Light => ThemePreference::Light,
            ColorScheme::Dark => ThemePreference::Dark,
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = ParseSchemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(ThemePreference::Auto);
        }
        s.parse::<ColorScheme>().map(ThemePreference::from)
    }
}
