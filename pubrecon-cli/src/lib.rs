//! Fixture loading and output for the `pubrecon` binary.
//!
//! A fixture is a JSON snapshot of the stores a publish job touched:
//!
//! ```json
//! {
//!   "stores": [
//!     { "name": "master", "items": [ { "id": "…", "path": { … }, "variants": [] } ] },
//!     { "name": "web", "items": [] }
//!   ],
//!   "archive": [ { "item_id": "…", "original_location": "/home/old", "archived_at": "2024-05-01T10:00:00Z" } ],
//!   "recyclebin": []
//! }
//! ```
//!
//! Stored item paths may also be given as a plain string (`"path": "/home/a"`).

use anyhow::{Context, Result};
use async_trait::async_trait;
use pubrecon_reconcile::{BatchOutcome, BatchProcessor, ReconcilerBuilder, ReconcilerConfig};
use pubrecon_store::memory::{MemoryHistoricalStore, MemoryItemStore};
use pubrecon_store::{
    ItemVariant, NotificationSink, StoreError, StoreRegistry, StoreResult, StoredItem,
};
use pubrecon_types::{
    ChangedItem, EntityId, HistoricalEntry, HistoricalStoreKind, ItemPath, PublishBatch,
    TargetContext,
};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// A stored item as written in a fixture file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureItem {
    pub id: EntityId,
    pub path: FixturePath,
    #[serde(default)]
    pub variants: Vec<ItemVariant>,
}

/// Either a full path string or a structured path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FixturePath {
    Full(String),
    Structured(ItemPath),
}

impl From<FixtureItem> for StoredItem {
    fn from(item: FixtureItem) -> Self {
        let path = match item.path {
            FixturePath::Full(full) => ItemPath::from_full_path(full),
            FixturePath::Structured(path) => path,
        };
        Self {
            id: item.id,
            path,
            variants: item.variants,
        }
    }
}

/// One named store of a fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreFixture {
    pub name: String,
    #[serde(default)]
    pub items: Vec<FixtureItem>,
}

/// Snapshot of every store a reconciliation run may consult.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub stores: Vec<StoreFixture>,
    #[serde(default)]
    pub archive: Vec<HistoricalEntry>,
    #[serde(default)]
    pub recyclebin: Vec<HistoricalEntry>,
}

/// In-memory stores built from a fixture.
pub struct FixtureStores {
    pub registry: StoreRegistry,
    pub history: Arc<MemoryHistoricalStore>,
}

impl Fixture {
    /// Reads a fixture from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse fixture {}", path.display()))
    }

    /// Builds the item stores and the historical store.
    pub fn into_stores(self) -> FixtureStores {
        let mut registry = StoreRegistry::new();
        for store in self.stores {
            debug!("Loading store {} with {} items", store.name, store.items.len());
            let memory = store
                .items
                .into_iter()
                .fold(MemoryItemStore::new(store.name), |s, item| s.with_item(item.into()));
            registry.register(Arc::new(memory));
        }

        let history = self
            .archive
            .into_iter()
            .map(|e| (HistoricalStoreKind::Archive, e))
            .chain(self.recyclebin.into_iter().map(|e| (HistoricalStoreKind::RecycleBin, e)))
            .fold(MemoryHistoricalStore::new(), |h, (kind, entry)| h.with_entry(kind, entry));

        FixtureStores {
            registry,
            history: Arc::new(history),
        }
    }
}

/// Reads a publish batch from a JSON file.
pub fn load_batch(path: &Path) -> Result<PublishBatch> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read batch {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse batch {}", path.display()))
}

#[derive(Serialize)]
struct Notification<'a> {
    context: &'a TargetContext,
    items: &'a [ChangedItem],
}

/// A notification sink that writes each batch as pretty-printed JSON.
pub struct JsonSink<W: Write + Send + 'static> {
    writer: Mutex<W>,
}

impl<W: Write + Send + 'static> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl JsonSink<std::io::Stdout> {
    /// A sink writing to standard output.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl JsonSink<Vec<u8>> {
    /// A sink writing to an in-memory buffer.
    pub fn buffer() -> Self {
        Self::new(Vec::new())
    }

    /// Everything written so far.
    pub fn output(&self) -> String {
        let buf = self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        String::from_utf8_lossy(&buf).into_owned()
    }
}

#[async_trait]
impl<W: Write + Send + 'static> NotificationSink for JsonSink<W> {
    async fn notify(&self, context: &TargetContext, items: &[ChangedItem]) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(&Notification { context, items })
            .map_err(|e| StoreError::Notification(e.to_string()))?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| StoreError::Notification("output writer poisoned".into()))?;
        writeln!(writer, "{json}").map_err(|e| StoreError::Notification(e.to_string()))?;
        writer.flush().map_err(|e| StoreError::Notification(e.to_string()))
    }
}

/// Loads the fixture and batch, reconciles the batch and notifies `sink`.
pub async fn run(
    fixture: &Path,
    batch: &Path,
    config: ReconcilerConfig,
    sink: Arc<dyn NotificationSink>,
) -> Result<BatchOutcome> {
    let stores = Fixture::load(fixture)?.into_stores();
    let batch = load_batch(batch)?;
    info!(
        "Reconciling {} results of job {} ({} -> {})",
        batch.results.len(),
        batch.job.job_id,
        batch.job.source_database,
        batch.job.target_database
    );

    let reconciler = ReconcilerBuilder::from_registry(&stores.registry, &batch.job)
        .context("Failed to resolve stores for publish job")?
        .history(stores.history)
        .config(config)
        .build()
        .context("Failed to build reconciler")?;

    BatchProcessor::new(reconciler, sink)
        .process(&batch)
        .await
        .context("Batch reconciliation aborted")
}
