//! Historical entries for entities removed from a live store.

use crate::{EntityId, Error};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which historical store an entry lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoricalStoreKind {
    /// Items archived by an editor or a scheduled archive task.
    Archive,
    /// Items deleted by an editor and kept for restore.
    RecycleBin,
}

impl HistoricalStoreKind {
    /// All kinds, in the order the reconciler queries them.
    pub const ALL: [Self; 2] = [Self::Archive, Self::RecycleBin];

    /// Canonical store name used by hosts.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Archive => "archive",
            Self::RecycleBin => "recyclebin",
        }
    }
}

impl fmt::Display for HistoricalStoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HistoricalStoreKind {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "archive" => Ok(Self::Archive),
            "recyclebin" | "recycle-bin" => Ok(Self::RecycleBin),
            other => Err(Error::UnknownHistoricalStore(other.to_string())),
        }
    }
}

/// Snapshot of an entity taken when it was removed from the live store.
///
/// Entries are created by the host and are read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalEntry {
    /// The original ID of the removed item.
    pub item_id: EntityId,
    /// Full path of the item at the moment it was removed.
    pub original_location: String,
    /// When the item was moved into the historical store.
    pub archived_at: DateTime<Utc>,
}

impl HistoricalEntry {
    /// Creates a historical entry.
    pub fn new(
        item_id: EntityId,
        original_location: impl Into<String>,
        archived_at: DateTime<Utc>,
    ) -> Self {
        Self {
            item_id,
            original_location: original_location.into(),
            archived_at,
        }
    }
}
