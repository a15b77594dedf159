//! Toggle configuration (lumen.toml)

use crate::error::ConfigError;
use crate::visual::TOGGLE_SPRING;
use lumen_animation::SpringConfig;
use lumen_core::gesture::DEFAULT_DOUBLE_CLICK_MS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Theme toggle configuration
///
/// Every field has a default, so an empty file is a valid config.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ToggleConfig {
    /// Durable storage key holding the explicit preference
    pub storage_key: String,
    /// Window in which two presses count as a double click
    pub double_click_ms: u64,
    /// Spring shared by every animated channel
    pub spring: SpringConfig,
    /// Base of the per-instance mask element id
    pub mask_prefix: String,
    /// Visually hidden label for assistive technology
    pub label: String,
    /// Attribute set on the ancestor scope to the effective scheme
    pub scope_attribute: String,
}

impl Default for ToggleConfig {
    fn default() -> Self {
        Self {
            storage_key: "theme".to_string(),
            double_click_ms: DEFAULT_DOUBLE_CLICK_MS,
            spring: TOGGLE_SPRING,
            mask_prefix: "theme-toggle-mask".to_string(),
            label: "Toggle theme".to_string(),
            scope_attribute: "data-theme".to_string(),
        }
    }
}

impl ToggleConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ToggleConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(invalid("storage_key", "must not be empty"));
        }
        if self.mask_prefix.trim().is_empty() {
            return Err(invalid("mask_prefix", "must not be empty"));
        }
        if !(self.spring.mass > 0.0) {
            return Err(invalid("spring.mass", "must be positive"));
        }
        if !(self.spring.stiffness > 0.0) {
            return Err(invalid("spring.tension", "must be positive"));
        }
        if !(self.spring.damping >= 0.0) {
            return Err(invalid("spring.friction", "must not be negative"));
        }
        let ratio = self.spring.damping_ratio();
        if ratio < 1.0 {
            tracing::debug!(
                "toggle spring is underdamped (ratio {:.2}), icon will overshoot",
                ratio
            );
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(
            ToggleConfig::from_toml_str("").unwrap(),
            ToggleConfig::default()
        );
    }

    #[test]
    fn test_default_spring_matches_toggle_feel() {
        let spring = ToggleConfig::default().spring;
        assert_eq!(spring.mass, 1.0);
        assert_eq!(spring.stiffness, 200.0);
        assert_eq!(spring.damping, 30.0);
    }

    #[test]
    fn test_partial_document() {
        let config = ToggleConfig::from_toml_str(
            r#"
            storage_key = "site-theme"
            double_click_ms = 250

            [spring]
            tension = 300.0
            friction = 20.0
            "#,
        )
        .unwrap();

        assert_eq!(config.storage_key, "site-theme");
        assert_eq!(config.double_click_ms, 250);
        assert_eq!(config.spring, SpringConfig::new(300.0, 20.0, 1.0));
        assert_eq!(config.label, "Toggle theme");
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            ToggleConfig::from_toml_str("storage_key = \"\""),
            Err(ConfigError::Invalid {
                field: "storage_key",
                ..
            })
        ));
        assert!(matches!(
            ToggleConfig::from_toml_str("[spring]\ntension = 200.0\nfriction = 30.0\nmass = 0.0"),
            Err(ConfigError::Invalid {
                field: "spring.mass",
                ..
            })
        ));
        assert!(matches!(
            ToggleConfig::from_toml_str("double_click_ms = \"soon\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = ToggleConfig::load(&dir.path().join("lumen.toml")).unwrap();
        assert_eq!(config, ToggleConfig::default());
    }
}
