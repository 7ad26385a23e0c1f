use crate::error::StoreResult;
use async_trait::async_trait;
use pubrecon_types::{ChangedItem, TargetContext};

/// Receives the reconciled items of a batch, e.g. to raise events or feed
/// a cache-clearing pipeline.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Called once per batch with every resolved item, never with an empty slice.
    async fn notify(&self, context: &TargetContext, items: &[ChangedItem]) -> StoreResult<()>;
}
