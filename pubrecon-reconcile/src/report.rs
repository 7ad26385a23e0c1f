//! Per-entity resolutions and the per-batch report.

use pubrecon_store::StoreError;
use pubrecon_types::{ChangedItem, EntityId, HistoricalStoreKind};
use serde::Serialize;

/// Which store described a reconciled item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ResolutionOrigin {
    /// Live lookup in the publishing target.
    Target,
    /// Live lookup in the publishing source (item removed from target only).
    Source,
    Archive,
    RecycleBin,
}

impl From<HistoricalStoreKind> for ResolutionOrigin {
    fn from(kind: HistoricalStoreKind) -> Self {
        match kind {
            HistoricalStoreKind::Archive => Self::Archive,
            HistoricalStoreKind::RecycleBin => Self::RecycleBin,
        }
    }
}

/// The outcome of reconciling a single publish result.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Some store described the entity.
    Resolved {
        item: ChangedItem,
        origin: ResolutionOrigin,
    },
    /// No store holds a record of the entity.
    Unresolved,
    /// The result lacks the variance metadata its path needs.
    Malformed,
    /// A store lookup failed.
    Failed(StoreError),
}

impl Resolution {
    /// The resolved item, if any.
    pub fn into_item(self) -> Option<ChangedItem> {
        match self {
            Self::Resolved { item, .. } => Some(item),
            _ => None,
        }
    }
}

/// An entity whose lookup failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedEntity {
    pub entity_id: EntityId,
    pub error: String,
}

/// What happened to the notification for a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum NotificationStatus {
    /// Nothing was resolved (or the batch was skipped), so no notification was sent.
    #[default]
    Skipped,
    Delivered,
    Failed(String),
}

/// Summary of one reconciled batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Number of results in the batch.
    pub total: usize,
    pub from_target: usize,
    pub from_source: usize,
    pub from_archive: usize,
    pub from_recycle_bin: usize,
    /// Entities no store could describe.
    pub unresolved: Vec<EntityId>,
    /// Non-deletions that arrived without variance metadata.
    pub malformed: Vec<EntityId>,
    /// Entities that reported more than one variance change; only the first
    /// one is reflected in the output.
    pub multi_variance: Vec<EntityId>,
    pub failed: Vec<FailedEntity>,
    pub notification: NotificationStatus,
}

impl ReconcileReport {
    /// Records one resolution against `entity_id`.
    pub fn record(&mut self, entity_id: EntityId, resolution: &Resolution) {
        match resolution {
            Resolution::Resolved { origin, .. } => match origin {
                ResolutionOrigin::Target => self.from_target += 1,
                ResolutionOrigin::Source => self.from_source += 1,
                ResolutionOrigin::Archive => self.from_archive += 1,
                ResolutionOrigin::RecycleBin => self.from_recycle_bin += 1,
            },
            Resolution::Unresolved => self.unresolved.push(entity_id),
            Resolution::Malformed => self.malformed.push(entity_id),
            Resolution::Failed(err) => self.failed.push(FailedEntity {
                entity_id,
                error: err.to_string(),
            }),
        }
    }

    /// Number of results that produced a changed item.
    #[must_use]
    pub fn resolved(&self) -> usize {
        self.from_target + self.from_source + self.from_archive + self.from_recycle_bin
    }

    /// Number of results that produced nothing.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.total - self.resolved()
    }
}

/// The reconciled items of a batch together with its report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub items: Vec<ChangedItem>,
    pub report: ReconcileReport,
}
