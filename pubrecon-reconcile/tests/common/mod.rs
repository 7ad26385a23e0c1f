//! Shared test helpers for reconciliation tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use pubrecon_reconcile::{ItemReconciler, ReconcilerConfig};
use pubrecon_store::memory::{MemoryHistoricalStore, MemoryItemStore};
use pubrecon_store::{ItemStore, StoreResult, StoredItem};
use pubrecon_types::EntityId;
use std::collections::HashMap;
use std::sync::Arc;

/// A fixed point in time plus `minutes`.
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap() + Duration::minutes(minutes)
}

/// Builds a reconciler over in-memory stores.
pub fn make_reconciler(
    source: MemoryItemStore,
    target: MemoryItemStore,
    history: MemoryHistoricalStore,
) -> ItemReconciler {
    ItemReconciler::builder()
        .source(Arc::new(source))
        .target(Arc::new(target))
        .history(Arc::new(history))
        .build()
        .unwrap()
}

/// Builds a reconciler with a custom concurrency limit.
pub fn make_reconciler_with_concurrency(
    source: Arc<dyn ItemStore>,
    target: Arc<dyn ItemStore>,
    history: MemoryHistoricalStore,
    max_concurrency: usize,
) -> ItemReconciler {
    ItemReconciler::builder()
        .source(source)
        .target(target)
        .history(Arc::new(history))
        .config(ReconcilerConfig { max_concurrency })
        .build()
        .unwrap()
}

/// An item store that answers each lookup after a per-item delay, so later
/// entities of a batch can finish before earlier ones.
pub struct SlowItemStore {
    name: String,
    items: HashMap<EntityId, (StoredItem, u64)>,
}

impl SlowItemStore {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            items: HashMap::new(),
        }
    }

    pub fn with_item(mut self, item: StoredItem, delay_ms: u64) -> Self {
        self.items.insert(item.id, (item, delay_ms));
        self
    }
}

#[async_trait]
impl ItemStore for SlowItemStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_item(&self, id: &EntityId) -> StoreResult<Option<StoredItem>> {
        match self.items.get(id) {
            Some((item, delay_ms)) => {
                tokio::time::sleep(std::time::Duration::from_millis(*delay_ms)).await;
                Ok(Some(item.clone()))
            }
            None => Ok(None),
        }
    }
}
