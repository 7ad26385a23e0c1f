//! Item reconciler - resolves publish results into changed items.
//!
//! Results that did not remove the entity are looked up in the publishing
//! target. Pure deletions are looked up in the source first (the item may
//! only have been unpublished by a restriction), then in the archive and the
//! recycle bin, where the most recent removal wins.

use crate::classifier::classify;
use crate::config::ReconcilerConfig;
use crate::error::{ReconcileError, ReconcileResult};
use crate::history::{latest_entry, select_candidate};
use crate::report::{BatchOutcome, ReconcileReport, Resolution, ResolutionOrigin};
use futures::stream::{self, StreamExt};
use pubrecon_store::{HistoricalStore, ItemStore, StoreError, StoreRegistry};
use pubrecon_types::{
    ChangedItem, EntityId, HistoricalEntry, HistoricalStoreKind, OperationResult, PublishJob,
    ResultChangeType,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Builds an [`ItemReconciler`] from explicit collaborators.
#[derive(Default)]
pub struct ReconcilerBuilder {
    source: Option<Arc<dyn ItemStore>>,
    target: Option<Arc<dyn ItemStore>>,
    history: Option<Arc<dyn HistoricalStore>>,
    config: ReconcilerConfig,
}

impl ReconcilerBuilder {
    /// Creates a builder with no collaborators and the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the source and target stores named by `job`.
    pub fn from_registry(registry: &StoreRegistry, job: &PublishJob) -> ReconcileResult<Self> {
        Ok(Self::new()
            .source(registry.get(&job.source_database)?)
            .target(registry.get(&job.target_database)?))
    }

    /// The store items are published from.
    pub fn source(mut self, store: Arc<dyn ItemStore>) -> Self {
        self.source = Some(store);
        self
    }

    /// The store items are published to.
    pub fn target(mut self, store: Arc<dyn ItemStore>) -> Self {
        self.target = Some(store);
        self
    }

    /// Archive and recycle bin of the source store.
    pub fn history(mut self, history: Arc<dyn HistoricalStore>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn config(mut self, config: ReconcilerConfig) -> Self {
        self.config = config;
        self
    }

    /// Validates the configuration and builds the reconciler.
    pub fn build(self) -> ReconcileResult<ItemReconciler> {
        self.config.validate()?;
        let missing = |what: &str| ReconcileError::Config(format!("{what} is required"));

        Ok(ItemReconciler {
            source: self.source.ok_or_else(|| missing("source store"))?,
            target: self.target.ok_or_else(|| missing("target store"))?,
            history: self.history.ok_or_else(|| missing("historical store"))?,
            config: self.config,
        })
    }
}

/// Resolves publish results against live and historical stores.
///
/// Lookups are read-only, so one reconciler may serve concurrent batches.
pub struct ItemReconciler {
    source: Arc<dyn ItemStore>,
    target: Arc<dyn ItemStore>,
    history: Arc<dyn HistoricalStore>,
    config: ReconcilerConfig,
}

impl ItemReconciler {
    /// Shorthand for [`ReconcilerBuilder::new`].
    pub fn builder() -> ReconcilerBuilder {
        ReconcilerBuilder::new()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Name of the source store.
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Name of the target store.
    pub fn target_name(&self) -> &str {
        self.target.name()
    }

    /// Reconciles a whole batch.
    ///
    /// Pure deletions come first in the output, then every other result, each
    /// group in input order, so a batch of `[updated A, deleted B]` yields
    /// `[B, A]`. Results no store can describe are left out.
    /// Fails only when a store reports a misconfiguration.
    pub async fn reconcile_batch(&self, results: &[OperationResult]) -> ReconcileResult<BatchOutcome> {
        let classified = classify(results);
        debug!(
            "Reconciling batch of {} results ({} deleted, {} changed)",
            classified.len(),
            classified.deleted.len(),
            classified.changed.len()
        );

        let ordered: Vec<&OperationResult> = classified.in_order().collect();
        let resolutions: Vec<ReconcileResult<Resolution>> = stream::iter(
            ordered.iter().map(|result| self.reconcile(result)),
        )
        .buffered(self.config.max_concurrency)
        .collect()
        .await;

        let mut outcome = BatchOutcome {
            items: Vec::with_capacity(ordered.len()),
            report: ReconcileReport {
                total: ordered.len(),
                ..Default::default()
            },
        };

        for (result, resolution) in ordered.iter().zip(resolutions) {
            let resolution = resolution?;
            if !result.is_pure_deletion() && result.has_multiple_variances() {
                outcome.report.multi_variance.push(result.entity_id);
            }
            outcome.report.record(result.entity_id, &resolution);
            if let Some(item) = resolution.into_item() {
                outcome.items.push(item);
            }
        }

        let report = &outcome.report;
        info!(
            "Reconciled {} of {} results (target={}, source={}, archive={}, recyclebin={}, unresolved={}, failed={})",
            report.resolved(),
            report.total,
            report.from_target,
            report.from_source,
            report.from_archive,
            report.from_recycle_bin,
            report.unresolved.len(),
            report.failed.len()
        );
        Ok(outcome)
    }

    /// Reconciles one result along the path its classification selects.
    pub async fn reconcile(&self, result: &OperationResult) -> ReconcileResult<Resolution> {
        if result.is_pure_deletion() {
            self.reconcile_deleted(result).await
        } else {
            self.reconcile_changed(result).await
        }
    }

    /// Resolves a created or updated entity from the publishing target.
    ///
    /// The lookup is for the first reported variant; further variants are
    /// flagged but not looked up.
    pub async fn reconcile_changed(&self, result: &OperationResult) -> ReconcileResult<Resolution> {
        let id = result.entity_id;
        let Some(variance) = result.primary_variance() else {
            warn!("Item {} ({:?}) has no variance changes, skipping", id, result.result_type);
            return Ok(Resolution::Malformed);
        };
        if result.has_multiple_variances() {
            warn!(
                "Item {} reported {} variance changes, only {}#{} is reconciled",
                id,
                result.metadata.variance_changes.len(),
                variance.language,
                variance.version
            );
        }

        let lookup = self
            .target
            .get_item_version(&id, &variance.language, variance.version)
            .await;
        let item = match lookup {
            Ok(Some(item)) => item,
            Ok(None) => {
                debug!(
                    "Item {} ({} #{}) not found in target store {}",
                    id,
                    variance.language,
                    variance.version,
                    self.target.name()
                );
                return Ok(Resolution::Unresolved);
            }
            Err(err) => return lookup_failed(id, err),
        };

        debug!("Item {} found in target store {}", id, self.target.name());
        let changed = ChangedItem {
            item_id: id,
            language: Some(variance.language.clone()),
            version: Some(variance.version),
            path: item.path.full_path.clone(),
            item_path: Some(item.path),
            operation_result_type: result.result_type,
            result_change_type: Some(variance.change),
            field_changes: result.metadata.field_changes.clone(),
        };

        Ok(Resolution::Resolved {
            item: changed,
            origin: ResolutionOrigin::Target,
        })
    }

    /// Resolves an entity removed from the publishing target.
    pub async fn reconcile_deleted(&self, result: &OperationResult) -> ReconcileResult<Resolution> {
        let id = result.entity_id;

        // Unpublished by a restriction rather than deleted: the source still has it.
        match self.source.get_item(&id).await {
            Ok(Some(item)) => {
                debug!("Item {} found in source store {}", id, self.source.name());
                let mut changed =
                    ChangedItem::new(id, result.result_type, item.path.full_path.clone());
                changed.item_path = Some(item.path);
                changed.field_changes = result.metadata.field_changes.clone();
                return Ok(Resolution::Resolved {
                    item: changed,
                    origin: ResolutionOrigin::Source,
                });
            }
            Ok(None) => {}
            Err(err) => return lookup_failed(id, err),
        }

        let (archived, recycled) = futures::join!(
            self.latest_historical(HistoricalStoreKind::Archive, &id),
            self.latest_historical(HistoricalStoreKind::RecycleBin, &id)
        );
        // A misconfigured store outranks a transient failure of the other one.
        let (archived, recycled) = match (archived, recycled) {
            (Ok(a), Ok(r)) => (a, r),
            (Err(err), _) | (_, Err(err)) if err.is_misconfiguration() => {
                return lookup_failed(id, err);
            }
            (Err(err), _) | (_, Err(err)) => return lookup_failed(id, err),
        };

        let Some((kind, entry)) = select_candidate(archived, recycled) else {
            debug!("Item {} not found in source, archive or recycle bin", id);
            return Ok(Resolution::Unresolved);
        };

        debug!("Item {} found in {}", id, kind);
        let mut changed = ChangedItem::new(id, result.result_type, entry.original_location);
        changed.result_change_type = Some(ResultChangeType::Removed);

        Ok(Resolution::Resolved {
            item: changed,
            origin: kind.into(),
        })
    }

    async fn latest_historical(
        &self,
        kind: HistoricalStoreKind,
        id: &EntityId,
    ) -> Result<Option<HistoricalEntry>, StoreError> {
        let entries = self.history.entries(kind, id).await?;
        Ok(latest_entry(entries, id))
    }
}

/// Maps a store failure to a per-entity failure, or aborts the batch when the
/// store is misconfigured.
fn lookup_failed(entity_id: EntityId, err: StoreError) -> ReconcileResult<Resolution> {
    if err.is_misconfiguration() {
        return Err(ReconcileError::Misconfigured {
            entity_id,
            source: err,
        });
    }
    warn!("Lookup for item {} failed: {}", entity_id, err);
    Ok(Resolution::Failed(err))
}
