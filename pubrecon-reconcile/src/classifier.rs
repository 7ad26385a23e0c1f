//! Batch classification.

use pubrecon_types::OperationResult;

/// A batch split into pure deletions and everything else.
///
/// Both groups keep the input order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Classified<'a> {
    /// Entities removed outright from the target.
    pub deleted: Vec<&'a OperationResult>,
    /// Created and updated entities, plus deletions of individual variants.
    pub changed: Vec<&'a OperationResult>,
}

impl<'a> Classified<'a> {
    /// Iterates the batch in reconciliation order: deletions first.
    pub fn in_order(&self) -> impl Iterator<Item = &'a OperationResult> + '_ {
        self.deleted.iter().chain(self.changed.iter()).copied()
    }

    /// Total number of results across both groups.
    pub fn len(&self) -> usize {
        self.deleted.len() + self.changed.len()
    }

    /// Returns true if the batch was empty.
    pub fn is_empty(&self) -> bool {
        self.deleted.is_empty() && self.changed.is_empty()
    }
}

/// Partitions a batch of publish results.
///
/// A result is a deletion only when it is `Deleted` and carries no variance
/// metadata; a `Deleted` result with variance removed some variants but the
/// item itself is still on the target.
pub fn classify(results: &[OperationResult]) -> Classified<'_> {
    let (deleted, changed) = results.iter().partition(|r| r.is_pure_deletion());
    Classified { deleted, changed }
}
