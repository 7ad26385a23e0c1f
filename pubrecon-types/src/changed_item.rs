//! Flattened view of what a publish batch changed.

use crate::{EntityId, FieldChange, OperationResultType, ResultChangeType};
use serde::{Deserialize, Serialize};

/// Structured path information for an item that still exists in a store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemPath {
    /// Full path from the root, e.g. `/sitecore/content/home/about`.
    pub full_path: String,
    /// Path of the parent item; empty for root-level items.
    pub parent_path: String,
    /// Last path segment.
    pub name: String,
}

impl ItemPath {
    /// Builds a path from its full form, splitting off the last segment.
    pub fn from_full_path(full_path: impl Into<String>) -> Self {
        let full_path = full_path.into();
        let trimmed = full_path.trim_end_matches('/');
        let (parent_path, name) = match trimmed.rfind('/') {
            Some(idx) => (trimmed[..idx].to_string(), trimmed[idx + 1..].to_string()),
            None => (String::new(), trimmed.to_string()),
        };

        Self {
            full_path,
            parent_path,
            name,
        }
    }
}

/// One reconciled record describing what changed for an entity.
///
/// `language`, `version` and `result_change_type` are only known when the
/// publish result carried variance metadata. `item_path` and `field_changes`
/// are only known when a live store still holds the item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedItem {
    pub item_id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    /// Best known path: the live path, or the last location before removal.
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_path: Option<ItemPath>,
    pub operation_result_type: OperationResultType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_change_type: Option<ResultChangeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_changes: Option<Vec<FieldChange>>,
}

impl ChangedItem {
    /// Creates a record with only the mandatory fields set.
    pub fn new(
        item_id: EntityId,
        operation_result_type: OperationResultType,
        path: impl Into<String>,
    ) -> Self {
        Self {
            item_id,
            language: None,
            version: None,
            path: path.into(),
            item_path: None,
            operation_result_type,
            result_change_type: None,
            field_changes: None,
        }
    }
}
