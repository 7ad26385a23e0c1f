//! Error types for reconciliation.

use pubrecon_store::StoreError;
use pubrecon_types::EntityId;
use thiserror::Error;

/// Result type for reconciliation operations.
pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// Errors that abort construction or a whole batch.
///
/// Per-entity lookup failures are not errors at this level; they are
/// recorded in the batch report and the entity is skipped.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Invalid configuration or a missing collaborator.
    #[error("configuration error: {0}")]
    Config(String),

    /// A store named by the publish job could not be resolved.
    #[error("store resolution failed: {0}")]
    Store(#[from] StoreError),

    /// A store reported a wiring problem while reconciling an entity.
    #[error("store misconfigured while reconciling {entity_id}: {source}")]
    Misconfigured {
        entity_id: EntityId,
        source: StoreError,
    },
}
