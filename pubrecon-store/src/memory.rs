//! In-memory collaborators for tests and fixture-driven runs.

use crate::error::{StoreError, StoreResult};
use crate::history::HistoricalStore;
use crate::item_store::{ItemStore, StoredItem};
use crate::notify::NotificationSink;
use async_trait::async_trait;
use pubrecon_types::{ChangedItem, EntityId, HistoricalEntry, HistoricalStoreKind, TargetContext};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A read-only item store backed by a `HashMap`.
#[derive(Debug)]
pub struct MemoryItemStore {
    name: String,
    items: HashMap<EntityId, StoredItem>,
    failing: HashSet<EntityId>,
    lookups: AtomicUsize,
}

impl MemoryItemStore {
    /// Creates an empty store.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: HashMap::new(),
            failing: HashSet::new(),
            lookups: AtomicUsize::new(0),
        }
    }

    /// Adds an item.
    #[must_use]
    pub fn with_item(mut self, item: StoredItem) -> Self {
        self.items.insert(item.id, item);
        self
    }

    /// Makes every lookup of `id` fail with [`StoreError::Unavailable`].
    #[must_use]
    pub fn with_failing_id(mut self, id: EntityId) -> Self {
        self.failing.insert(id);
        self
    }

    /// Number of lookups served so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }

    /// Number of items held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the store holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_item(&self, id: &EntityId) -> StoreResult<Option<StoredItem>> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        if self.failing.contains(id) {
            return Err(StoreError::unavailable(&self.name, format!("lookup of {id} failed")));
        }
        Ok(self.items.get(id).cloned())
    }
}

/// Archive and recycle bin entries held in memory.
#[derive(Debug)]
pub struct MemoryHistoricalStore {
    entries: HashMap<HistoricalStoreKind, Vec<HistoricalEntry>>,
    disabled: HashSet<HistoricalStoreKind>,
    failing: HashSet<EntityId>,
}

impl Default for MemoryHistoricalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHistoricalStore {
    /// Creates a store with both archive and recycle bin configured and empty.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            disabled: HashSet::new(),
            failing: HashSet::new(),
        }
    }

    /// Records an entry in the given store.
    #[must_use]
    pub fn with_entry(mut self, kind: HistoricalStoreKind, entry: HistoricalEntry) -> Self {
        self.entries.entry(kind).or_default().push(entry);
        self
    }

    /// Removes a store from the configuration; lookups against it fail with
    /// [`StoreError::UnknownHistoricalStore`].
    #[must_use]
    pub fn without(mut self, kind: HistoricalStoreKind) -> Self {
        self.disabled.insert(kind);
        self
    }

    /// Makes every lookup of `id` fail with [`StoreError::Unavailable`].
    #[must_use]
    pub fn with_failing_id(mut self, id: EntityId) -> Self {
        self.failing.insert(id);
        self
    }
}

#[async_trait]
impl HistoricalStore for MemoryHistoricalStore {
    async fn entries(
        &self,
        kind: HistoricalStoreKind,
        id: &EntityId,
    ) -> StoreResult<Vec<HistoricalEntry>> {
        if self.disabled.contains(&kind) {
            return Err(StoreError::UnknownHistoricalStore(kind.name().to_string()));
        }
        if self.failing.contains(id) {
            return Err(StoreError::unavailable(kind.name(), format!("lookup of {id} failed")));
        }

        // Items archived together share one archival record; hand back the
        // whole group so callers see the same shape a real archive returns.
        let Some(entries) = self.entries.get(&kind) else {
            return Ok(Vec::new());
        };
        let groups: HashSet<&str> = entries
            .iter()
            .filter(|e| e.item_id == *id)
            .map(|e| e.original_location.as_str())
            .collect();

        Ok(entries
            .iter()
            .filter(|e| {
                e.item_id == *id
                    || groups
                        .iter()
                        .any(|loc| e.original_location.starts_with(&format!("{loc}/")))
            })
            .cloned()
            .collect())
    }
}

/// A notification sink that records every call.
#[derive(Debug, Default)]
pub struct RecordingSink {
    calls: Mutex<Vec<(TargetContext, Vec<ChangedItem>)>>,
    fail_with: Option<String>,
}

impl RecordingSink {
    /// Creates a sink that accepts every batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sink that records the call and then reports `reason` as a failure.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_with: Some(reason.into()),
        }
    }

    /// All recorded calls, oldest first.
    pub fn calls(&self) -> Vec<(TargetContext, Vec<ChangedItem>)> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn notify(&self, context: &TargetContext, items: &[ChangedItem]) -> StoreResult<()> {
        self.calls
            .lock()
            .map_err(|_| StoreError::Notification("recording sink poisoned".into()))?
            .push((context.clone(), items.to_vec()));

        match &self.fail_with {
            Some(reason) => Err(StoreError::Notification(reason.clone())),
            None => Ok(()),
        }
    }
}
