use crate::error::{ReconcileError, ReconcileResult};
use serde::{Deserialize, Serialize};

/// Default number of entities reconciled at once.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Configuration for the item reconciler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Maximum number of entities whose store lookups run concurrently.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

fn default_max_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
        }
    }
}

impl ReconcilerConfig {
    /// Checks the configuration for values the reconciler cannot run with.
    pub fn validate(&self) -> ReconcileResult<()> {
        if self.max_concurrency == 0 {
            return Err(ReconcileError::Config(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
