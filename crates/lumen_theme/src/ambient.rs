//! Ambient (system) color scheme
//!
//! The ambient preference belongs to the host environment. It is sampled on
//! demand; a source that cannot answer yields `None`, which resolves to
//! light.

use crate::scheme::ColorScheme;
use std::sync::{Arc, Mutex, PoisonError};

/// Environment variable consulted first by [`SystemAmbient`]
pub const SCHEME_ENV: &str = "LUMEN_COLOR_SCHEME";

/// A point-in-time query of the host's light/dark preference
pub trait AmbientSource: Send + Sync {
    /// The current ambient scheme, or `None` if it cannot be determined
    fn color_scheme(&self) -> Option<ColorScheme>;
}

/// Sample `source`, defaulting to light when it is unavailable
pub fn read_ambient(source: &dyn AmbientSource) -> ColorScheme {
    source.color_scheme().unwrap_or_else(|| {
        tracing::debug!("ambient color scheme unavailable, assuming light");
        ColorScheme::Light
    })
}

/// A settable ambient source; clones share the same value
///
/// Used by hosts that receive the preference from elsewhere (a media query
/// result pushed in from a webview, a settings portal) and by tests.
#[derive(Clone, Debug, Default)]
pub struct FixedAmbient {
    scheme: Arc<Mutex<Option<ColorScheme>>>,
}

impl FixedAmbient {
    pub fn new(scheme: ColorScheme) -> Self {
        Self {
            scheme: Arc::new(Mutex::new(Some(scheme))),
        }
    }

    /// A source that never knows the answer
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn set(&self, scheme: Option<ColorScheme>) {
        *self.scheme.lock().unwrap_or_else(PoisonError::into_inner) = scheme;
    }
}

impl AmbientSource for FixedAmbient {
    fn color_scheme(&self) -> Option<ColorScheme> {
        *self.scheme.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Reads the scheme from the process environment
///
/// `LUMEN_COLOR_SCHEME=light|dark` wins; otherwise a `GTK_THEME` with a
/// `:dark` variant (or a name containing "dark") means dark, any other
/// `GTK_THEME` means light. With neither set the scheme is unknown.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemAmbient;

impl AmbientSource for SystemAmbient {
    fn color_scheme(&self) -> Option<ColorScheme> {
        scheme_from_env(
            std::env::var(SCHEME_ENV).ok().as_deref(),
            std::env::var("GTK_THEME").ok().as_deref(),
        )
    }
}

fn scheme_from_env(explicit: Option<&str>, gtk_theme: Option<&str>) -> Option<ColorScheme> {
    if let Some(scheme) = explicit.and_then(|value| value.parse::<ColorScheme>().ok()) {
        return Some(scheme);
    }
    let gtk_theme = gtk_theme?.trim();
    if gtk_theme.is_empty() {
        return None;
    }
    if gtk_theme.to_ascii_lowercase().contains("dark") {
        Some(ColorScheme::Dark)
    } else {
        Some(ColorScheme::Light)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_defaults_to_light() {
        assert_eq!(read_ambient(&FixedAmbient::unavailable()), ColorScheme::Light);
    }

    #[test]
    fn test_fixed_ambient_is_shared() {
        let ambient = FixedAmbient::new(ColorScheme::Light);
        let handle = ambient.clone();
        handle.set(Some(ColorScheme::Dark));
        assert_eq!(read_ambient(&ambient), ColorScheme::Dark);
    }

    #[test]
    fn test_scheme_from_env() {
        assert_eq!(scheme_from_env(Some("dark"), None), Some(ColorScheme::Dark));
        assert_eq!(
            scheme_from_env(Some("light"), Some("Adwaita:dark")),
            Some(ColorScheme::Light)
        );
        assert_eq!(
            scheme_from_env(Some("nonsense"), Some("Adwaita:dark")),
            Some(ColorScheme::Dark)
        );
        assert_eq!(
            scheme_from_env(None, Some("Adwaita")),
            Some(ColorScheme::Light)
        );
        assert_eq!(scheme_from_env(None, Some("  ")), None);
        assert_eq!(scheme_from_env(None, None), None);
    }
}
