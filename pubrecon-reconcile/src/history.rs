//! Choosing between archive and recycle bin entries.

use pubrecon_types::{EntityId, HistoricalEntry, HistoricalStoreKind};

/// Returns the most recently archived entry for `id`.
///
/// Entries for other items (e.g., descendants archived in the same
/// operation) are ignored. On equal timestamps the first entry wins.
pub fn latest_entry(entries: Vec<HistoricalEntry>, id: &EntityId) -> Option<HistoricalEntry> {
    entries
        .into_iter()
        .filter(|e| e.item_id == *id)
        .fold(None, |best, entry| match best {
            Some(current) if entry.archived_at <= current.archived_at => Some(current),
            _ => Some(entry),
        })
}

/// Picks the entry describing the item's last removal.
///
/// The archive entry only wins when it is strictly newer; on equal
/// timestamps the recycle bin entry is used.
pub fn select_candidate(
    archive: Option<HistoricalEntry>,
    recycle_bin: Option<HistoricalEntry>,
) -> Option<(HistoricalStoreKind, HistoricalEntry)> {
    match (archive, recycle_bin) {
        (Some(a), Some(r)) if a.archived_at > r.archived_at => {
            Some((HistoricalStoreKind::Archive, a))
        }
        (_, Some(r)) => Some((HistoricalStoreKind::RecycleBin, r)),
        (Some(a), None) => Some((HistoricalStoreKind::Archive, a)),
        (None, None) => None,
    }
}
