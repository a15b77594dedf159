//! Theme context assembly from command-line arguments

use anyhow::{Context, Result};
use lumen_theme::{
    AmbientSource, AttributeScope, ColorScheme, FileStorage, FixedAmbient, PreferenceStorage,
    SystemAmbient, ThemeContext, ThemeToggle, ToggleConfig, UnavailableStorage,
};
use std::path::PathBuf;
use std::sync::Arc;

use crate::{AmbientArg, Args};

/// One CLI run's theme state
pub struct Session {
    pub ctx: ThemeContext,
    /// Durable slot location; `None` when storage is disabled
    pub store_path: Option<PathBuf>,
}

impl Session {
    pub fn open(args: &Args) -> Result<Self> {
        let config = ToggleConfig::load(&args.config)
            .with_context(|| format!("Failed to load config {}", args.config.display()))?;

        let (storage, store_path): (Box<dyn PreferenceStorage>, Option<PathBuf>) =
            if args.no_storage {
                (Box::new(UnavailableStorage), None)
            } else {
                (
                    Box::new(FileStorage::new(args.store.clone())),
                    Some(args.store.clone()),
                )
            };

        let ambient: Arc<dyn AmbientSource> = match args.ambient {
            AmbientArg::Light => Arc::new(FixedAmbient::new(ColorScheme::Light)),
            AmbientArg::Dark => Arc::new(FixedAmbient::new(ColorScheme::Dark)),
            AmbientArg::System => Arc::new(SystemAmbient),
        };

        tracing::debug!(
            "session: storage key {:?}, ambient {:?}",
            config.storage_key,
            args.ambient
        );

        let ctx = ThemeContext::new(config, storage, ambient, Box::new(AttributeScope::new()));
        Ok(Self { ctx, store_path })
    }

    pub fn mount(&self, label: Option<&str>) -> ThemeToggle {
        ThemeToggle::mount(&self.ctx, label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use lumen_core::Gesture;
    use lumen_theme::ThemePreference;

    fn args(dir: &std::path::Path, extra: &[&str]) -> Args {
        let config = dir.join("lumen.toml");
        let store = dir.join("storage.toml");
        let mut argv = vec![
            "lumen".to_string(),
            "--config".to_string(),
            config.display().to_string(),
            "--store".to_string(),
            store.display().to_string(),
            "--ambient".to_string(),
            "light".to_string(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        argv.push("status".to_string());
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_click_persists_between_runs() {
        let dir = tempfile::tempdir().unwrap();

        let session = Session::open(&args(dir.path(), &[])).unwrap();
        session.mount(None).handle_gesture(Gesture::Click);
        assert_eq!(session.ctx.preference(), ThemePreference::Dark);
        drop(session);

        let session = Session::open(&args(dir.path(), &[])).unwrap();
        assert_eq!(session.ctx.preference(), ThemePreference::Dark);
        assert!(dir.path().join("storage.toml").exists());
    }

    #[test]
    fn test_no_storage_runs_in_memory() {
        let dir = tempfile::tempdir().unwrap();

        let session = Session::open(&args(dir.path(), &["--no-storage"])).unwrap();
        session.mount(None).handle_gesture(Gesture::Click);
        assert!(session.ctx.store().is_degraded());
        assert!(session.store_path.is_none());
        assert!(!dir.path().join("storage.toml").exists());
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lumen.toml"), "storage_key = \"\"").unwrap();
        assert!(Session::open(&args(dir.path(), &[])).is_err());
    }
}
