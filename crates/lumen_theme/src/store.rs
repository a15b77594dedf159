//! Theme preference store
//!
//! Owns the single durable slot holding the explicit theme override and a
//! list of subscribers notified on every change.
//!
//! Storage failures never reach callers. The first failed read or write
//! switches the store to in-memory mode for the rest of the session, starting
//! from `Auto` if nothing was ever set.
//!
//! A change applied from elsewhere (see [`PreferenceStore::apply_external_change`])
//! is held in memory and reported by [`PreferenceStore::preference`] until the
//! next local write, so readers always see what subscribers were told.

use crate::scheme::ThemePreference;
use crate::storage::PreferenceStorage;
use slotmap::{new_key_type, SlotMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

new_key_type! {
    /// Handle returned by [`PreferenceStore::subscribe`]
    pub struct SubscriptionId;
}

/// Subscriber callback, receives the new preference
pub type Listener = Arc<dyn Fn(ThemePreference) + Send + Sync>;

#[derive(Debug, Default)]
struct StoreState {
    /// Last known preference, authoritative once degraded or external
    current: ThemePreference,
    /// Durable storage failed; stop touching it
    degraded: bool,
    /// `current` came from an external change and storage may lag behind it
    external: bool,
}

/// Page-lifetime preference store
pub struct PreferenceStore {
    key: String,
    storage: Box<dyn PreferenceStorage>,
    state: Mutex<StoreState>,
    listeners: Mutex<SlotMap<SubscriptionId, Listener>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PreferenceStore {
    pub fn new(key: impl Into<String>, storage: Box<dyn PreferenceStorage>) -> Self {
        Self {
            key: key.into(),
            storage,
            state: Mutex::new(StoreState::default()),
            listeners: Mutex::new(SlotMap::with_key()),
        }
    }

    /// The durable key this store owns
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether storage failed and the store runs in memory only
    pub fn is_degraded(&self) -> bool {
        lock(&self.state).degraded
    }

    /// Read the current preference; an absent key means `Auto`
    pub fn preference(&self) -> ThemePreference {
        let mut state = lock(&self.state);
        if state.degraded || state.external {
            return state.current;
        }
        match self.storage.get(&self.key) {
            Ok(value) => {
                state.current = ThemePreference::from_stored(value.as_deref());
            }
            Err(err) => {
                tracing::warn!(
                    "theme storage read failed, using in-memory preference: {}",
                    err
                );
                state.degraded = true;
            }
        }
        state.current
    }

    /// Set the preference and notify every subscriber
    ///
    /// `Auto` clears the durable key. Storage is only written when the value
    /// actually changes (or an external change left it unsynced); subscribers
    /// are notified either way.
    pub fn set_preference(&self, preference: ThemePreference) {
        let previous = self.preference();
        {
            let mut state = lock(&self.state);
            if !state.degraded && (previous != preference || state.external) {
                let written = match preference.stored_value() {
                    Some(value) => self.storage.set(&self.key, value),
                    None => self.storage.remove(&self.key),
                };
                if let Err(err) = written {
                    tracing::warn!(
                        "theme storage write failed, keeping preference in memory: {}",
                        err
                    );
                    state.degraded = true;
                }
            }
            state.current = preference;
            state.external = false;
        }
        tracing::debug!("theme preference {} -> {}", previous, preference);
        self.notify(preference);
    }

    /// Apply a change made to the same slot elsewhere (another tab/process)
    ///
    /// Nothing is written back; the value is reported by [`Self::preference`]
    /// until the next [`Self::set_preference`]. Returns `false` if `key` is
    /// not this store's.
    pub fn apply_external_change(&self, key: &str, value: Option<&str>) -> bool {
        if key != self.key {
            return false;
        }
        let preference = ThemePreference::from_stored(value);
        {
            let mut state = lock(&self.state);
            state.current = preference;
            state.external = true;
        }
        tracing::debug!("theme preference changed externally to {}", preference);
        self.notify(preference);
        true
    }

    /// Register a subscriber
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(ThemePreference) + Send + Sync + 'static,
    {
        lock(&self.listeners).insert(Arc::new(listener))
    }

    /// Remove a subscriber; returns `false` if it was already removed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        lock(&self.listeners).remove(id).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.listeners).len()
    }

    fn notify(&self, preference: ThemePreference) {
        // Listeners may subscribe, unsubscribe or read the store re-entrantly
        let listeners: Vec<Listener> = lock(&self.listeners).values().cloned().collect();
        for listener in listeners {
            listener(preference);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, PreferenceStorage, UnavailableStorage};

    const KEY: &str = "theme";

    #[test]
    fn test_absent_key_is_auto() {
        let store = PreferenceStore::new(KEY, Box::new(MemoryStorage::new()));
        assert_eq!(store.preference(), ThemePreference::Auto);
    }

    #[test]
    fn test_reads_existing_value() {
        let storage = MemoryStorage::with_entry(KEY, "dark");
        let store = PreferenceStore::new(KEY, Box::new(storage));
        assert_eq!(store.preference(), ThemePreference::Dark);
    }

    #[test]
    fn test_set_writes_and_clears_key() {
        let storage = MemoryStorage::new();
        let store = PreferenceStore::new(KEY, Box::new(storage.clone()));

        store.set_preference(ThemePreference::Light);
        assert_eq!(storage.peek(KEY), Some("light".to_string()));

        store.set_preference(ThemePreference::Auto);
        assert_eq!(storage.peek(KEY), None);
    }

    #[test]
    fn test_subscribers_notified_in_order_of_calls() {
        let store = PreferenceStore::new(KEY, Box::new(MemoryStorage::new()));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let id = store.subscribe(move |p| seen_clone.lock().unwrap().push(p));

        store.set_preference(ThemePreference::Dark);
        store.set_preference(ThemePreference::Dark);
        assert!(store.unsubscribe(id));
        store.set_preference(ThemePreference::Light);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![ThemePreference::Dark, ThemePreference::Dark]
        );
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_listener_can_read_store() {
        let store = Arc::new(PreferenceStore::new(KEY, Box::new(MemoryStorage::new())));
        let seen = Arc::new(Mutex::new(None));

        let weak = Arc::downgrade(&store);
        let seen_clone = seen.clone();
        store.subscribe(move |_| {
            if let Some(store) = weak.upgrade() {
                *seen_clone.lock().unwrap() = Some(store.preference());
            }
        });

        store.set_preference(ThemePreference::Dark);
        assert_eq!(*seen.lock().unwrap(), Some(ThemePreference::Dark));
    }

    #[test]
    fn test_unavailable_storage_degrades_to_memory() {
        let store = PreferenceStore::new(KEY, Box::new(UnavailableStorage));

        assert_eq!(store.preference(), ThemePreference::Auto);
        assert!(store.is_degraded());

        store.set_preference(ThemePreference::Dark);
        assert_eq!(store.preference(), ThemePreference::Dark);

        store.set_preference(ThemePreference::Auto);
        assert_eq!(store.preference(), ThemePreference::Auto);
    }

    #[test]
    fn test_external_change() {
        let storage = MemoryStorage::new();
        let store = PreferenceStore::new(KEY, Box::new(storage.clone()));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        store.subscribe(move |p| seen_clone.lock().unwrap().push(p));

        assert!(!store.apply_external_change("unrelated", Some("dark")));
        assert!(store.apply_external_change(KEY, Some("dark")));

        assert_eq!(*seen.lock().unwrap(), vec![ThemePreference::Dark]);
        // The change came from elsewhere; nothing is written back here
        assert_eq!(storage.peek(KEY), None);
    }

    #[test]
    fn test_external_change_is_what_preference_reports() {
        let storage = MemoryStorage::new();
        let store = Arc::new(PreferenceStore::new(KEY, Box::new(storage.clone())));
        let read_back = Arc::new(Mutex::new(Vec::new()));

        let weak = Arc::downgrade(&store);
        let read_back_clone = read_back.clone();
        store.subscribe(move |notified| {
            if let Some(store) = weak.upgrade() {
                read_back_clone
                    .lock()
                    .unwrap()
                    .push((notified, store.preference()));
            }
        });

        store.apply_external_change(KEY, Some("dark"));
        assert_eq!(store.preference(), ThemePreference::Dark);
        assert_eq!(
            *read_back.lock().unwrap(),
            vec![(ThemePreference::Dark, ThemePreference::Dark)]
        );
        assert_eq!(storage.peek(KEY), None);
    }

    #[test]
    fn test_local_set_after_external_change_writes_through() {
        let storage = MemoryStorage::new();
        let store = PreferenceStore::new(KEY, Box::new(storage.clone()));

        store.apply_external_change(KEY, Some("dark"));
        // Same value as the external one, but storage still lacks it
        store.set_preference(ThemePreference::Dark);
        assert_eq!(storage.peek(KEY), Some("dark".to_string()));

        // Back to reading storage
        storage.set(KEY, "light").unwrap();
        assert_eq!(store.preference(), ThemePreference::Light);
    }
}
