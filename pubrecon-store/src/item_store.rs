//! Live item lookup.

use crate::error::StoreResult;
use async_trait::async_trait;
use pubrecon_types::{EntityId, ItemPath};
use serde::{Deserialize, Serialize};

/// A language + version pair an item exists in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemVariant {
    pub language: String,
    pub version: u32,
}

impl ItemVariant {
    pub fn new(language: impl Into<String>, version: u32) -> Self {
        Self {
            language: language.into(),
            version,
        }
    }
}

/// An item as currently held by a live store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredItem {
    pub id: EntityId,
    pub path: ItemPath,
    /// Variants present in the store.
    #[serde(default)]
    pub variants: Vec<ItemVariant>,
}

impl StoredItem {
    /// Creates an item at `full_path` with no variants.
    pub fn new(id: EntityId, full_path: impl Into<String>) -> Self {
        Self {
            id,
            path: ItemPath::from_full_path(full_path),
            variants: Vec::new(),
        }
    }

    /// Adds a variant.
    #[must_use]
    pub fn with_variant(mut self, language: impl Into<String>, version: u32) -> Self {
        self.variants.push(ItemVariant::new(language, version));
        self
    }

    /// Returns true if the item exists in the given language and version.
    #[must_use]
    pub fn has_variant(&self, language: &str, version: u32) -> bool {
        self.variants
            .iter()
            .any(|v| v.version == version && v.language.eq_ignore_ascii_case(language))
    }

    /// The item's current full path.
    #[must_use]
    pub fn full_path(&self) -> &str {
        &self.path.full_path
    }
}

/// A named store that can resolve live items.
///
/// Implementations must tolerate concurrent calls; the reconciler issues
/// lookups for several entities of a batch at once.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// The store's name (e.g., "master", "web").
    fn name(&self) -> &str;

    /// Looks up an item by ID regardless of language and version.
    async fn get_item(&self, id: &EntityId) -> StoreResult<Option<StoredItem>>;

    /// Looks up a specific variant of an item.
    ///
    /// Returns `None` when the item exists but not in this language / version.
    async fn get_item_version(
        &self,
        id: &EntityId,
        language: &str,
        version: u32,
    ) -> StoreResult<Option<StoredItem>> {
        Ok(self
            .get_item(id)
            .await?
            .filter(|item| item.has_variant(language, version)))
    }
}
