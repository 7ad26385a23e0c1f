//! Historical lookup for removed items.

use crate::error::StoreResult;
use async_trait::async_trait;
use pubrecon_types::{EntityId, HistoricalEntry, HistoricalStoreKind};

/// Access to the archive and recycle bin of the publishing source.
///
/// Entries are read-only here. A lookup may return entries for other items
/// that were archived together with `id` (e.g., its descendants); callers
/// filter on [`HistoricalEntry::item_id`].
#[async_trait]
pub trait HistoricalStore: Send + Sync {
    /// Returns all entries recorded for `id` in the given store.
    ///
    /// Fails with [`crate::StoreError::UnknownHistoricalStore`] when the
    /// store is not configured for the underlying database.
    async fn entries(
        &self,
        kind: HistoricalStoreKind,
        id: &EntityId,
    ) -> StoreResult<Vec<HistoricalEntry>>;
}
