use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lcs_store::{ConfigStore, StoreOptions};
use tracing::debug;

/// Thread name prefix for the commit workers of registry-owned stores.
const WORKER_PREFIX: &str = "lcs-commit";

#[derive(Default)]
struct Slots {
    default: Option<Arc<ConfigStore>>,
    named: HashMap<String, Arc<ConfigStore>>,
}

/// Keeper of the default store and of named stores.
///
/// All operations run under one registry-wide lock, independent of the
/// per-store locks.
#[derive(Default)]
pub struct Registry {
    slots: Mutex<Slots>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The default store, created on first call.
    pub fn get_default(&self) -> Arc<ConfigStore> {
        let mut slots = self.lock();
        let store = slots.default.get_or_insert_with(|| {
            debug!("default store created");
            Arc::new(ConfigStore::with_options(StoreOptions {
                worker_name: WORKER_PREFIX.to_string(),
            }))
        });
        Arc::clone(store)
    }

    /// The store registered under `name`, creating an empty one if absent.
    pub fn get_instance(&self, name: &str) -> Arc<ConfigStore> {
        let mut slots = self.lock();
        let store = slots.named.entry(name.to_string()).or_insert_with(|| {
            debug!(name, "named store created");
            Arc::new(ConfigStore::with_options(StoreOptions {
                worker_name: format!("{WORKER_PREFIX}-{name}"),
            }))
        });
        Arc::clone(store)
    }

    /// Unregister `name`. Returns `true` if it was registered.
    ///
    /// Existing handles to the store stay valid; the next
    /// [`get_instance`](Self::get_instance) for `name` creates a new store.
    pub fn remove_instance(&self, name: &str) -> bool {
        let removed = self.lock().named.remove(name).is_some();
        if removed {
            debug!(name, "named store removed");
        }
        removed
    }

    /// Returns `true` if `name` is currently registered.
    pub fn contains(&self, name: &str) -> bool {
        self.lock().named.contains_key(name)
    }

    /// Sorted names of all registered stores.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().named.keys().cloned().collect();
        names.sort();
        names
    }

    fn lock(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = self.lock();
        f.debug_struct("Registry")
            .field("has_default", &slots.default.is_some())
            .field("named_count", &slots.named.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lcs_types::Charset;
    use std::thread;

    // -----------------------------------------------------------------------
    // Default instance
    // -----------------------------------------------------------------------

    #[test]
    fn default_is_created_once() {
        let registry = Registry::new();
        let a = registry.get_default();
        let b = registry.get_default();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(a.is_empty());
    }

    #[test]
    fn default_is_not_a_named_instance() {
        let registry = Registry::new();
        registry.get_default().set_property("k", "v");
        assert!(registry.names().is_empty());
        assert!(registry.get_instance("").is_empty());
    }

    // -----------------------------------------------------------------------
    // Named instances
    // -----------------------------------------------------------------------

    #[test]
    fn same_name_returns_same_store() {
        let registry = Registry::new();
        let a = registry.get_instance("x");
        let b = registry.get_instance("x");
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn different_names_are_isolated() {
        let registry = Registry::new();
        registry.get_instance("a").set_property("k", 1);
        assert_eq!(registry.get_instance("b").get("k"), None);
        assert_eq!(registry.names(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn remove_then_get_yields_fresh_store() {
        let registry = Registry::new();
        let old = registry.get_instance("x");
        assert!(old.load("name=Roby\n".as_bytes(), Charset::Utf8));

        assert!(registry.remove_instance("x"));
        assert!(!registry.contains("x"));

        let fresh = registry.get_instance("x");
        assert!(!Arc::ptr_eq(&old, &fresh));
        assert!(fresh.is_empty());
        // The removed store keeps working for existing holders.
        assert_eq!(old.get_string("name", ""), "Roby");
        old.set_property("still", "usable");
        assert!(old.contains_key("still"));
    }

    #[test]
    fn remove_unknown_name_is_noop() {
        let registry = Registry::new();
        assert!(!registry.remove_instance("ghost"));
    }

    // -----------------------------------------------------------------------
    // Concurrency
    // -----------------------------------------------------------------------

    #[test]
    fn concurrent_get_instance_creates_one_store() {
        let registry = Arc::new(Registry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.get_instance("shared"))
            })
            .collect();
        let stores: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().expect("thread should not panic"))
            .collect();
        for s in &stores[1..] {
            assert!(Arc::ptr_eq(&stores[0], s));
        }
    }

    #[test]
    fn concurrent_get_default_creates_one_store() {
        let registry = Arc::new(Registry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.get_default())
            })
            .collect();
        let stores: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().expect("thread should not panic"))
            .collect();
        assert!(stores.iter().all(|s| Arc::ptr_eq(&stores[0], s)));
    }

    #[test]
    fn debug_format() {
        let registry = Registry::new();
        registry.get_instance("a");
        let debug = format!("{registry:?}");
        assert!(debug.contains("named_count: 1"));
        assert!(debug.contains("has_default: false"));
    }
}
