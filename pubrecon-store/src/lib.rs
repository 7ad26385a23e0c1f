//! Collaborator interfaces consumed by the reconciler.
//!
//! The reconciler never talks to a database directly. It goes through:
//! - [`ItemStore`]: live lookup of an item by ID (or ID + language + version)
//!   in a named store such as the publishing source or target
//! - [`HistoricalStore`]: entries for removed items kept in the archive or
//!   recycle bin of the source store
//! - [`NotificationSink`]: receives the reconciled items once per batch
//!
//! [`StoreRegistry`] resolves item stores by name, the way the host resolves
//! databases by the names recorded on a publish job.
//!
//! The [`memory`] module provides in-memory implementations of every trait,
//! used by tests and by the fixture-driven CLI.

mod error;
mod history;
mod item_store;
pub mod memory;
mod notify;
mod registry;

pub use error::{StoreError, StoreResult};
pub use history::HistoricalStore;
pub use item_store::{ItemStore, ItemVariant, StoredItem};
pub use notify::NotificationSink;
pub use registry::StoreRegistry;
