//! The batch envelope handed over by the host pipeline.

use crate::OperationResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The publish job a batch belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishJob {
    pub job_id: Uuid,
    /// Name of the store items were published from (usually "master").
    pub source_database: String,
    /// Name of the store items were published to (usually "web").
    pub target_database: String,
}

impl PublishJob {
    /// Creates a job with a fresh ID.
    pub fn new(source_database: impl Into<String>, target_database: impl Into<String>) -> Self {
        Self {
            job_id: Uuid::new_v4(),
            source_database: source_database.into(),
            target_database: target_database.into(),
        }
    }

    /// The context passed to notification sinks for this job.
    #[must_use]
    pub fn target_context(&self) -> TargetContext {
        TargetContext {
            job_id: self.job_id,
            source_database: self.source_database.clone(),
            target_database: self.target_database.clone(),
        }
    }
}

/// Identifies where a batch of changed items was published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetContext {
    pub job_id: Uuid,
    pub source_database: String,
    pub target_database: String,
}

/// One batch of publish results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishBatch {
    pub job: PublishJob,
    /// Total number of results the job produced across all batches.
    /// Zero means the job published nothing and the batch is skipped.
    pub total_result_count: usize,
    pub results: Vec<OperationResult>,
}

impl PublishBatch {
    /// Creates a batch whose total count equals its own size.
    pub fn new(job: PublishJob, results: Vec<OperationResult>) -> Self {
        Self {
            job,
            total_result_count: results.len(),
            results,
        }
    }
}
