//! Core type definitions for publish result reconciliation.
//!
//! This crate defines the plain data types shared by the store collaborators
//! and the reconciler:
//! - Entity identifiers (UUID)
//! - Per-entity operation results as reported by a publish batch
//! - Flattened `ChangedItem` records produced by reconciliation
//! - Historical (archive / recycle bin) entries for removed entities
//! - The batch envelope handed over by the host pipeline

mod changed_item;
mod history;
mod ids;
mod job;
mod operation;

pub use changed_item::{ChangedItem, ItemPath};
pub use history::{HistoricalEntry, HistoricalStoreKind};
pub use ids::EntityId;
pub use job::{PublishBatch, PublishJob, TargetContext};
pub use operation::{
    FieldChange, OperationResult, OperationResultType, ResultChangeType, ResultMetadata,
    VarianceChange,
};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("unknown historical store: {0}")]
    UnknownHistoricalStore(String),
}
