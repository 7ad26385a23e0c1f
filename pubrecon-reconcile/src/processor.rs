//! Batch processor - reconciles a publish batch and hands the result on.

use crate::error::ReconcileResult;
use crate::reconciler::ItemReconciler;
use crate::report::{BatchOutcome, NotificationStatus};
use pubrecon_store::NotificationSink;
use pubrecon_types::PublishBatch;
use std::sync::Arc;
use tracing::{debug, warn};

/// Runs once per publish batch: reconcile, then notify.
pub struct BatchProcessor {
    reconciler: ItemReconciler,
    sink: Arc<dyn NotificationSink>,
}

impl BatchProcessor {
    /// Creates a processor around a built reconciler.
    pub fn new(reconciler: ItemReconciler, sink: Arc<dyn NotificationSink>) -> Self {
        Self { reconciler, sink }
    }

    /// Returns the reconciler.
    pub fn reconciler(&self) -> &ItemReconciler {
        &self.reconciler
    }

    /// Processes one batch.
    ///
    /// Batches of a job that published nothing are skipped. The sink is only
    /// called when at least one item resolved; a sink failure is logged and
    /// reported but the reconciled items are still returned.
    pub async fn process(&self, batch: &PublishBatch) -> ReconcileResult<BatchOutcome> {
        if batch.total_result_count == 0 {
            debug!("Job {} published nothing, skipping batch", batch.job.job_id);
            return Ok(BatchOutcome::default());
        }

        debug!(
            "Processing {} published items of job {} into changed items",
            batch.results.len(),
            batch.job.job_id
        );
        let mut outcome = self.reconciler.reconcile_batch(&batch.results).await?;

        if outcome.items.is_empty() {
            debug!("No changed items resolved for job {}", batch.job.job_id);
            return Ok(outcome);
        }

        let context = batch.job.target_context();
        outcome.report.notification = match self.sink.notify(&context, &outcome.items).await {
            Ok(()) => NotificationStatus::Delivered,
            Err(err) => {
                warn!(
                    "Notification of {} changed items for job {} failed: {}",
                    outcome.items.len(),
                    batch.job.job_id,
                    err
                );
                NotificationStatus::Failed(err.to_string())
            }
        };

        Ok(outcome)
    }
}
