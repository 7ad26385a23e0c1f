//! Per-entity operation results reported by a publish batch.
//!
//! A publish batch reports one `OperationResult` per entity. Results carry
//! optional variance metadata (which language / version changed and how) and
//! optional per-field change descriptors. Pure deletions carry no variance.

use crate::EntityId;
use serde::{Deserialize, Serialize};

/// What the publish operation did to an entity on the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationResultType {
    /// The entity was created on the target.
    Created,
    /// The entity (or one of its variants) was updated on the target.
    Updated,
    /// The entity (or one of its variants) was removed from the target.
    Deleted,
    /// Any other host-defined result type.
    #[serde(other)]
    Other,
}

/// Fine-grained classification of a single variant or field change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultChangeType {
    Added,
    Updated,
    Removed,
}

/// A per-language, per-version change attached to an operation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarianceChange {
    /// Language code of the variant (e.g., "en", "da-DK").
    pub language: String,
    /// Version number of the variant.
    pub version: u32,
    /// How the variant changed.
    pub change: ResultChangeType,
}

impl VarianceChange {
    /// Creates a variance change.
    pub fn new(language: impl Into<String>, version: u32, change: ResultChangeType) -> Self {
        Self {
            language: language.into(),
            version,
            change,
        }
    }
}

/// A change to a single field of an entity variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    /// ID of the field definition.
    pub field_id: EntityId,
    /// Language of the changed value, absent for shared fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Version of the changed value, absent for unversioned fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
    pub change: ResultChangeType,
}

/// Metadata attached to an operation result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultMetadata {
    /// Variant-level changes, in the order the host reported them.
    #[serde(default)]
    pub variance_changes: Vec<VarianceChange>,
    /// Field-level changes, when the host tracked them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_changes: Option<Vec<FieldChange>>,
}

/// The outcome of publishing a single entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    /// The entity this result applies to.
    pub entity_id: EntityId,
    /// What the publish did to the entity.
    pub result_type: OperationResultType,
    /// Variance and field change metadata.
    #[serde(default)]
    pub metadata: ResultMetadata,
}

impl OperationResult {
    /// Creates a result with empty metadata.
    #[must_use]
    pub fn new(entity_id: EntityId, result_type: OperationResultType) -> Self {
        Self {
            entity_id,
            result_type,
            metadata: ResultMetadata::default(),
        }
    }

    /// Creates a created result carrying a single variance change.
    #[must_use]
    pub fn created(entity_id: EntityId, language: impl Into<String>, version: u32) -> Self {
        Self::new(entity_id, OperationResultType::Created).with_variance(VarianceChange::new(
            language,
            version,
            ResultChangeType::Added,
        ))
    }

    /// Creates an updated result carrying a single variance change.
    #[must_use]
    pub fn updated(entity_id: EntityId, language: impl Into<String>, version: u32) -> Self {
        Self::new(entity_id, OperationResultType::Updated).with_variance(VarianceChange::new(
            language,
            version,
            ResultChangeType::Updated,
        ))
    }

    /// Creates a deleted result with no variance (a pure deletion).
    #[must_use]
    pub fn deleted(entity_id: EntityId) -> Self {
        Self::new(entity_id, OperationResultType::Deleted)
    }

    /// Appends a variance change.
    #[must_use]
    pub fn with_variance(mut self, variance: VarianceChange) -> Self {
        self.metadata.variance_changes.push(variance);
        self
    }

    /// Sets the field changes.
    #[must_use]
    pub fn with_field_changes(mut self, field_changes: Vec<FieldChange>) -> Self {
        self.metadata.field_changes = Some(field_changes);
        self
    }

    /// Returns true if this result removed the entity outright.
    ///
    /// A `Deleted` result that still carries variance metadata only removed
    /// some variants; the entity itself is still on the target.
    #[must_use]
    pub fn is_pure_deletion(&self) -> bool {
        self.result_type == OperationResultType::Deleted
            && self.metadata.variance_changes.is_empty()
    }

    /// The first reported variance change, if any.
    #[must_use]
    pub fn primary_variance(&self) -> Option<&VarianceChange> {
        self.metadata.variance_changes.first()
    }

    /// Returns true if more than one variant changed in this result.
    #[must_use]
    pub fn has_multiple_variances(&self) -> bool {
        self.metadata.variance_changes.len() > 1
    }
}
