//! Name → store resolution.

use crate::error::{StoreError, StoreResult};
use crate::item_store::ItemStore;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Resolves item stores by name.
///
/// Names are matched case-insensitively, so a job recorded against
/// "Master" resolves the store registered as "master".
#[derive(Default, Clone)]
pub struct StoreRegistry {
    stores: HashMap<String, Arc<dyn ItemStore>>,
}

impl StoreRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a store under its own name, replacing any previous one.
    pub fn register(&mut self, store: Arc<dyn ItemStore>) {
        let key = store.name().to_ascii_lowercase();
        debug!("Registering item store {}", key);
        self.stores.insert(key, store);
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn ItemStore>) -> Self {
        self.register(store);
        self
    }

    /// Resolves a store by name.
    pub fn get(&self, name: &str) -> StoreResult<Arc<dyn ItemStore>> {
        self.stores
            .get(&name.to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| StoreError::UnknownStore(name.to_string()))
    }

    /// Returns the registered store names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.stores.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered stores.
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    /// Returns true if no store is registered.
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}
