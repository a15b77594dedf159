//! Lumen Theme
//!
//! Light/dark/auto theme handling for a page session:
//!
//! - **Preference store**: one durable slot (`"light"`, `"dark"` or absent for
//!   auto) with subscribers, degrading to memory when storage fails
//! - **Ambient scheme**: the OS/host preference, defaulting to light
//! - **Theme toggle**: a sun/moon control; click flips, double click returns
//!   to auto, and every change springs the icon to its new shape
//! - **Header navigation**: CMS-driven links followed by search and the toggle
//!
//! # Example
//!
//! ```rust
//! use lumen_theme::{ColorScheme, ThemeContext, ThemeToggle, ToggleConfig, ToggleMode};
//! use lumen_core::Gesture;
//!
//! let ctx = ThemeContext::in_memory(ToggleConfig::default());
//! let toggle = ThemeToggle::mount(&ctx, Some("desktop"));
//!
//! assert_eq!(toggle.mode(), ToggleMode::Auto);
//! toggle.handle_gesture(Gesture::Click);
//! assert_eq!(ctx.effective_theme(), ColorScheme::Dark);
//!
//! while toggle.advance(1.0 / 60.0) {}
//! ```

pub mod ambient;
pub mod config;
pub mod context;
pub mod error;
pub mod markup;
pub mod nav;
pub mod scheme;
pub mod storage;
pub mod store;
pub mod toggle;
pub mod visual;

pub use ambient::{AmbientSource, FixedAmbient, SystemAmbient};
pub use config::ToggleConfig;
pub use context::{AttributeScope, InstanceId, ThemeContext, ThemeScope};
pub use error::{ConfigError, StorageError};
pub use nav::{HeaderNav, HeaderTheme, LinkBehavior, LinkTarget, NavLink};
pub use scheme::{ColorScheme, ThemePreference};
pub use storage::{FileStorage, MemoryStorage, PreferenceStorage, UnavailableStorage};
pub use store::{PreferenceStore, SubscriptionId};
pub use toggle::{ThemeToggle, ToggleMode};
pub use visual::{Channel, ChannelState, ToggleAnimation, VisualParameterSet};
