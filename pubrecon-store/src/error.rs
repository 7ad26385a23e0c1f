//! Error types for store collaborators.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that store collaborators can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not answer the lookup (connection lost, timeout, ...).
    #[error("store {store} unavailable: {reason}")]
    Unavailable { store: String, reason: String },

    /// No store is registered under this name.
    #[error("unknown store: {0}")]
    UnknownStore(String),

    /// The historical store is not configured for this database.
    #[error("unknown historical store: {0}")]
    UnknownHistoricalStore(String),

    /// The notification sink rejected the batch.
    #[error("notification failed: {0}")]
    Notification(String),
}

impl StoreError {
    /// Creates an [`StoreError::Unavailable`] error.
    pub fn unavailable(store: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            store: store.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if the error points at wiring rather than at the data.
    ///
    /// Misconfiguration affects every entity in a batch the same way, so the
    /// reconciler aborts the batch instead of skipping the entity.
    #[must_use]
    pub fn is_misconfiguration(&self) -> bool {
        matches!(self, Self::UnknownStore(_) | Self::UnknownHistoricalStore(_))
    }
}
