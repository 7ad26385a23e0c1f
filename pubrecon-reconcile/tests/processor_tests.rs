mod common;

use common::{at, make_reconciler, make_reconciler_with_concurrency, SlowItemStore};
use pretty_assertions::assert_eq;
use pubrecon_reconcile::{BatchProcessor, NotificationStatus, ReconcileError};
use pubrecon_store::memory::{MemoryHistoricalStore, MemoryItemStore, RecordingSink};
use pubrecon_store::{StoreError, StoredItem};
use pubrecon_types::{
    ChangedItem, EntityId, HistoricalEntry, HistoricalStoreKind, ItemPath, OperationResult,
    OperationResultType, PublishBatch, PublishJob, ResultChangeType,
};
use std::sync::Arc;

fn job() -> PublishJob {
    PublishJob::new("master", "web")
}

// ── Worked example ───────────────────────────────────────────────

#[tokio::test]
async fn updated_and_archived_items() {
    let a = EntityId::new();
    let b = EntityId::new();
    let target = MemoryItemStore::new("web")
        .with_item(StoredItem::new(a, "/home/a").with_variant("en", 2));
    let history = MemoryHistoricalStore::new()
        .with_entry(HistoricalStoreKind::Archive, HistoricalEntry::new(b, "/home/b-old", at(1)));
    let sink = Arc::new(RecordingSink::new());
    let processor = BatchProcessor::new(
        make_reconciler(MemoryItemStore::new("master"), target, history),
        sink.clone(),
    );

    let batch = PublishBatch::new(
        job(),
        vec![OperationResult::updated(a, "en", 2), OperationResult::deleted(b)],
    );
    let outcome = processor.process(&batch).await.unwrap();

    let mut expected_b = ChangedItem::new(b, OperationResultType::Deleted, "/home/b-old");
    expected_b.result_change_type = Some(ResultChangeType::Removed);
    let expected_a = ChangedItem {
        item_id: a,
        language: Some("en".into()),
        version: Some(2),
        path: "/home/a".into(),
        item_path: Some(ItemPath::from_full_path("/home/a")),
        operation_result_type: OperationResultType::Updated,
        result_change_type: Some(ResultChangeType::Updated),
        field_changes: None,
    };

    // Deletions are reported first.
    assert_eq!(outcome.items, vec![expected_b, expected_a]);
    assert_eq!(outcome.report.total, 2);
    assert_eq!(outcome.report.from_target, 1);
    assert_eq!(outcome.report.from_archive, 1);
    assert_eq!(outcome.report.notification, NotificationStatus::Delivered);

    let calls = sink.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, batch.job.target_context());
    assert_eq!(calls[0].1, outcome.items);
}

// ── Aggregation ──────────────────────────────────────────────────

#[tokio::test]
async fn unresolvable_results_are_dropped() {
    let known = EntityId::new();
    let gone = EntityId::new();
    let vanished = EntityId::new();
    let target = MemoryItemStore::new("web")
        .with_item(StoredItem::new(known, "/home/known").with_variant("en", 1));
    let processor = BatchProcessor::new(
        make_reconciler(MemoryItemStore::new("master"), target, MemoryHistoricalStore::new()),
        Arc::new(RecordingSink::new()),
    );

    let batch = PublishBatch::new(
        job(),
        vec![
            OperationResult::deleted(gone),
            OperationResult::created(known, "en", 1),
            OperationResult::updated(vanished, "en", 1),
        ],
    );
    let outcome = processor.process(&batch).await.unwrap();

    assert_eq!(outcome.items.len(), 1);
    assert_eq!(outcome.items[0].item_id, known);
    assert_eq!(outcome.report.unresolved, vec![gone, vanished]);
    assert_eq!(outcome.report.resolved(), 1);
    assert_eq!(outcome.report.dropped(), 2);
}

#[tokio::test]
async fn malformed_and_multi_variance_are_reported() {
    let plain = EntityId::new();
    let multi = EntityId::new();
    let target = MemoryItemStore::new("web")
        .with_item(StoredItem::new(plain, "/home/plain").with_variant("en", 1))
        .with_item(StoredItem::new(multi, "/home/multi").with_variant("en", 1));
    let processor = BatchProcessor::new(
        make_reconciler(MemoryItemStore::new("master"), target, MemoryHistoricalStore::new()),
        Arc::new(RecordingSink::new()),
    );

    let batch = PublishBatch::new(
        job(),
        vec![
            OperationResult::new(plain, OperationResultType::Updated),
            OperationResult::updated(multi, "en", 1).with_variance(
                pubrecon_types::VarianceChange::new("fr", 1, ResultChangeType::Added),
            ),
        ],
    );
    let outcome = processor.process(&batch).await.unwrap();

    assert_eq!(outcome.report.malformed, vec![plain]);
    assert_eq!(outcome.report.multi_variance, vec![multi]);
    assert_eq!(outcome.items.len(), 1);
    assert_eq!(outcome.items[0].item_id, multi);
}

#[tokio::test]
async fn store_failures_do_not_abort_the_batch() {
    let broken = EntityId::new();
    let fine = EntityId::new();
    let target = MemoryItemStore::new("web")
        .with_item(StoredItem::new(fine, "/home/fine").with_variant("en", 1))
        .with_failing_id(broken);
    let processor = BatchProcessor::new(
        make_reconciler(MemoryItemStore::new("master"), target, MemoryHistoricalStore::new()),
        Arc::new(RecordingSink::new()),
    );

    let batch = PublishBatch::new(
        job(),
        vec![OperationResult::updated(broken, "en", 1), OperationResult::updated(fine, "en", 1)],
    );
    let outcome = processor.process(&batch).await.unwrap();

    assert_eq!(outcome.items.len(), 1);
    assert_eq!(outcome.report.failed.len(), 1);
    assert_eq!(outcome.report.failed[0].entity_id, broken);
    assert!(outcome.report.failed[0].error.contains("unavailable"));
}

#[tokio::test]
async fn misconfiguration_aborts_the_batch() {
    let sink = Arc::new(RecordingSink::new());
    let history = MemoryHistoricalStore::new().without(HistoricalStoreKind::Archive);
    let processor = BatchProcessor::new(
        make_reconciler(MemoryItemStore::new("master"), MemoryItemStore::new("web"), history),
        sink.clone(),
    );

    let batch = PublishBatch::new(job(), vec![OperationResult::deleted(EntityId::new())]);
    let err = processor.process(&batch).await.unwrap_err();

    assert!(matches!(
        err,
        ReconcileError::Misconfigured {
            source: StoreError::UnknownHistoricalStore(_),
            ..
        }
    ));
    assert_eq!(sink.call_count(), 0);
}

// ── Handoff ──────────────────────────────────────────────────────

#[tokio::test]
async fn empty_outcome_does_not_notify() {
    let sink = Arc::new(RecordingSink::new());
    let processor = BatchProcessor::new(
        make_reconciler(
            MemoryItemStore::new("master"),
            MemoryItemStore::new("web"),
            MemoryHistoricalStore::new(),
        ),
        sink.clone(),
    );

    let batch = PublishBatch::new(job(), vec![OperationResult::deleted(EntityId::new())]);
    let outcome = processor.process(&batch).await.unwrap();

    assert!(outcome.items.is_empty());
    assert_eq!(outcome.report.notification, NotificationStatus::Skipped);
    assert_eq!(sink.call_count(), 0);
}

#[tokio::test]
async fn job_without_results_is_skipped() {
    let id = EntityId::new();
    let target = MemoryItemStore::new("web").with_item(StoredItem::new(id, "/home").with_variant("en", 1));
    let target = Arc::new(target);
    let sink = Arc::new(RecordingSink::new());
    let processor = BatchProcessor::new(
        make_reconciler_with_concurrency(
            Arc::new(MemoryItemStore::new("master")),
            target.clone(),
            MemoryHistoricalStore::new(),
            4,
        ),
        sink.clone(),
    );

    let mut batch = PublishBatch::new(job(), vec![OperationResult::updated(id, "en", 1)]);
    batch.total_result_count = 0;
    let outcome = processor.process(&batch).await.unwrap();

    assert!(outcome.items.is_empty());
    assert_eq!(outcome.report.total, 0);
    assert_eq!(target.lookups(), 0);
    assert_eq!(sink.call_count(), 0);
}

#[tokio::test]
async fn sink_failure_keeps_items() {
    let id = EntityId::new();
    let target = MemoryItemStore::new("web").with_item(StoredItem::new(id, "/home").with_variant("en", 1));
    let processor = BatchProcessor::new(
        make_reconciler(MemoryItemStore::new("master"), target, MemoryHistoricalStore::new()),
        Arc::new(RecordingSink::failing("event queue offline")),
    );

    let batch = PublishBatch::new(job(), vec![OperationResult::updated(id, "en", 1)]);
    let outcome = processor.process(&batch).await.unwrap();

    assert_eq!(outcome.items.len(), 1);
    match outcome.report.notification {
        NotificationStatus::Failed(reason) => assert!(reason.contains("event queue offline")),
        other => panic!("expected Failed, got {other:?}"),
    }
}

// ── Concurrency & determinism ────────────────────────────────────

#[tokio::test]
async fn concurrent_lookups_keep_batch_order() {
    let ids: Vec<EntityId> = (0..6).map(|_| EntityId::new()).collect();
    // Earlier items answer slower, so completion order is the reverse of input order.
    let target = ids.iter().enumerate().fold(SlowItemStore::new("web"), |store, (i, id)| {
        store.with_item(
            StoredItem::new(*id, format!("/home/item-{i}")).with_variant("en", 1),
            (6 - i as u64) * 10,
        )
    });
    let reconciler = make_reconciler_with_concurrency(
        Arc::new(MemoryItemStore::new("master")),
        Arc::new(target),
        MemoryHistoricalStore::new(),
        6,
    );

    let results: Vec<OperationResult> =
        ids.iter().map(|id| OperationResult::updated(*id, "en", 1)).collect();
    let outcome = reconciler.reconcile_batch(&results).await.unwrap();

    let order: Vec<EntityId> = outcome.items.iter().map(|i| i.item_id).collect();
    assert_eq!(order, ids);
}

#[tokio::test]
async fn reconciling_twice_yields_identical_output() {
    let a = EntityId::new();
    let b = EntityId::new();
    let c = EntityId::new();
    let source = MemoryItemStore::new("master").with_item(StoredItem::new(c, "/home/restricted"));
    let target = MemoryItemStore::new("web").with_item(StoredItem::new(a, "/home/a").with_variant("en", 1));
    let history = MemoryHistoricalStore::new()
        .with_entry(HistoricalStoreKind::Archive, HistoricalEntry::new(b, "/home/b", at(3)))
        .with_entry(HistoricalStoreKind::RecycleBin, HistoricalEntry::new(b, "/home/b", at(3)));
    let processor = BatchProcessor::new(
        make_reconciler(source, target, history),
        Arc::new(RecordingSink::new()),
    );

    let batch = PublishBatch::new(
        job(),
        vec![
            OperationResult::updated(a, "en", 1),
            OperationResult::deleted(b),
            OperationResult::deleted(c),
        ],
    );
    let first = processor.process(&batch).await.unwrap();
    let second = processor.process(&batch).await.unwrap();

    assert_eq!(first, second);
    let order: Vec<EntityId> = first.items.iter().map(|i| i.item_id).collect();
    assert_eq!(order, vec![b, c, a]);
    assert_eq!(first.report.from_recycle_bin, 1);
    assert_eq!(first.report.from_source, 1);
}
