//! Page-level theme context
//!
//! One [`ThemeContext`] lives for the page session and is handed to every
//! toggle instance. It bundles the preference store, the ambient source and
//! the ancestor scope that carries the effective scheme as an attribute.
//! Cloning the context clones a handle; all clones share the same state.

use crate::ambient::{read_ambient, AmbientSource, FixedAmbient};
use crate::config::ToggleConfig;
use crate::scheme::{ColorScheme, ThemePreference};
use crate::storage::{MemoryStorage, PreferenceStorage};
use crate::store::PreferenceStore;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// The element (or equivalent) whose attribute downstream styling keys off
pub trait ThemeScope: Send {
    fn set_attribute(&mut self, name: &str, value: &str);
}

/// A scope that records attributes in a shared map
#[derive(Clone, Debug, Default)]
pub struct AttributeScope {
    attributes: Arc<Mutex<FxHashMap<String, String>>>,
}

impl AttributeScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<String> {
        lock(&self.attributes).get(name).cloned()
    }
}

impl ThemeScope for AttributeScope {
    fn set_attribute(&mut self, name: &str, value: &str) {
        lock(&self.attributes).insert(name.to_string(), value.to_string());
    }
}

/// Identity of one mounted toggle
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InstanceId {
    key: String,
    mask_id: String,
}

impl InstanceId {
    /// Key unique among currently mounted instances
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Element id for the instance's mask, unique per page
    pub fn mask_id(&self) -> &str {
        &self.mask_id
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct ContextInner {
    config: ToggleConfig,
    store: PreferenceStore,
    ambient: Arc<dyn AmbientSource>,
    scope: Mutex<Box<dyn ThemeScope>>,
    instances: Mutex<FxHashSet<String>>,
    next_instance: AtomicU64,
}

impl ContextInner {
    fn effective_theme(&self) -> ColorScheme {
        self.store
            .preference()
            .resolve(read_ambient(self.ambient.as_ref()))
    }

    fn apply_scope(&self, preference: ThemePreference) {
        let scheme = preference.resolve(read_ambient(self.ambient.as_ref()));
        lock(&self.scope).set_attribute(&self.config.scope_attribute, scheme.as_str());
    }
}

/// Shared theme state for one page session
#[derive(Clone)]
pub struct ThemeContext {
    inner: Arc<ContextInner>,
}

impl ThemeContext {
    pub fn new(
        config: ToggleConfig,
        storage: Box<dyn PreferenceStorage>,
        ambient: Arc<dyn AmbientSource>,
        scope: Box<dyn ThemeScope>,
    ) -> Self {
        let inner = Arc::new_cyclic(|weak: &Weak<ContextInner>| {
            let store = PreferenceStore::new(config.storage_key.clone(), storage);
            let weak = weak.clone();
            store.subscribe(move |preference| {
                if let Some(inner) = weak.upgrade() {
                    inner.apply_scope(preference);
                }
            });
            ContextInner {
                config,
                store,
                ambient,
                scope: Mutex::new(scope),
                instances: Mutex::new(FxHashSet::default()),
                next_instance: AtomicU64::new(1),
            }
        });

        let context = Self { inner };
        context.refresh_scope();
        context
    }

    /// A context with in-memory storage, light ambient and a detached scope
    pub fn in_memory(config: ToggleConfig) -> Self {
        Self::new(
            config,
            Box::new(MemoryStorage::new()),
            Arc::new(FixedAmbient::new(ColorScheme::Light)),
            Box::new(AttributeScope::new()),
        )
    }

    pub fn config(&self) -> &ToggleConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &PreferenceStore {
        &self.inner.store
    }

    pub fn preference(&self) -> ThemePreference {
        self.inner.store.preference()
    }

    pub fn set_preference(&self, preference: ThemePreference) {
        self.inner.store.set_preference(preference);
    }

    /// Sample the ambient scheme now
    pub fn ambient(&self) -> ColorScheme {
        read_ambient(self.inner.ambient.as_ref())
    }

    pub fn ambient_source(&self) -> Arc<dyn AmbientSource> {
        self.inner.ambient.clone()
    }

    /// The scheme that renders: preference resolved against ambient
    pub fn effective_theme(&self) -> ColorScheme {
        self.inner.effective_theme()
    }

    /// Rewrite the scope attribute from the current state
    pub fn refresh_scope(&self) {
        self.inner.apply_scope(self.preference());
    }

    /// Hosts with a live ambient listener call this when the OS scheme flips
    ///
    /// Only matters in auto mode: subscribers are re-notified with `Auto` so
    /// every toggle and the scope re-derive. Storage is not touched.
    pub fn ambient_changed(&self) {
        let preference = self.preference();
        if preference.is_auto() {
            tracing::debug!("ambient color scheme changed to {}", self.ambient());
            self.inner.store.set_preference(preference);
        }
    }

    /// Reserve a unique instance identity
    ///
    /// `label` names the instance (e.g. "desktop", "mobile"). Without a label,
    /// or if the label is already mounted, a numeric suffix keeps ids unique.
    pub fn register_instance(&self, label: Option<&str>) -> InstanceId {
        let mut instances = lock(&self.inner.instances);
        let next = || self.inner.next_instance.fetch_add(1, Ordering::Relaxed);

        let mut key = match label.map(str::trim).filter(|l| !l.is_empty()) {
            Some(label) => label.to_string(),
            None => next().to_string(),
        };
        if instances.contains(&key) {
            tracing::warn!("theme toggle instance {:?} already mounted", key);
            let base = key.clone();
            while instances.contains(&key) {
                key = format!("{}-{}", base, next());
            }
        }
        instances.insert(key.clone());

        let mask_id = format!("{}-{}", self.inner.config.mask_prefix, key);
        InstanceId { key, mask_id }
    }

    /// Release an identity so it can be reused
    pub fn release_instance(&self, id: &InstanceId) {
        lock(&self.inner.instances).remove(&id.key);
    }

    pub fn instance_count(&self) -> usize {
        lock(&self.inner.instances).len()
    }
}
