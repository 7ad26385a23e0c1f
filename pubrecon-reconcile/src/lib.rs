//! Publish result reconciliation.
//!
//! Turns the per-entity results of a publish batch into a flat list of
//! [`ChangedItem`](pubrecon_types::ChangedItem) records, recovering as much
//! context as possible for items that no longer exist on the target.
//!
//! # Components
//!
//! - **Classifier**: splits a batch into pure deletions and other changes
//! - **Reconciler**: resolves each result against the target store, or for
//!   deletions against the source store, archive and recycle bin
//! - **Processor**: aggregates the resolved items and notifies a sink
//!
//! # Example
//!
//! ```
//! use pubrecon_reconcile::{BatchProcessor, ItemReconciler};
//! use pubrecon_store::memory::{MemoryHistoricalStore, MemoryItemStore, RecordingSink};
//! use std::sync::Arc;
//!
//! let reconciler = ItemReconciler::builder()
//!     .source(Arc::new(MemoryItemStore::new("master")))
//!     .target(Arc::new(MemoryItemStore::new("web")))
//!     .history(Arc::new(MemoryHistoricalStore::new()))
//!     .build()
//!     .unwrap();
//!
//! let processor = BatchProcessor::new(reconciler, Arc::new(RecordingSink::new()));
//! assert_eq!(processor.reconciler().target_name(), "web");
//! ```

pub mod classifier;
mod config;
mod error;
pub mod history;
mod processor;
mod reconciler;
mod report;

pub use classifier::{classify, Classified};
pub use config::{ReconcilerConfig, DEFAULT_MAX_CONCURRENCY};
pub use error::{ReconcileError, ReconcileResult};
pub use processor::BatchProcessor;
pub use reconciler::{ItemReconciler, ReconcilerBuilder};
pub use report::{
    BatchOutcome, FailedEntity, NotificationStatus, ReconcileReport, Resolution, ResolutionOrigin,
};
