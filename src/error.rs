//! Error types for labelforge operations.
//!
//! Defines the error types shared across subsystems:
//! - Scheduling decisions (unknown annotators, exhausted pools)
//! - Data integrity of task views and ledger snapshots

use thiserror::Error;

use crate::model::{AnnotatorId, DocumentId, TaskId};

/// Errors returned by the scheduler.
///
/// Every variant is fatal to the call that raised it: the scheduler never
/// returns a partial selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("Annotator '{0}' is not part of the task")]
    UnknownAnnotator(AnnotatorId),

    #[error("Annotator '{0}' cannot review their own work")]
    SelfReview(AnnotatorId),

    /// Fewer eligible documents than requested. Expected in normal
    /// operation; callers should ask for fewer or wait for more completions.
    #[error("Insufficient pool: requested {requested} documents but only {available} are eligible")]
    InsufficientPool { requested: usize, available: usize },
}

impl SchedulerError {
    /// Returns true for the recoverable "not enough documents" condition.
    pub fn is_insufficient_pool(&self) -> bool {
        matches!(self, SchedulerError::InsufficientPool { .. })
    }
}

/// Integrity violations between a task, its annotations and its ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error("{context} references document '{document}' which is not part of task '{task}'")]
    UnknownDocument {
        task: TaskId,
        document: DocumentId,
        context: String,
    },

    #[error("{context} references annotator '{annotator}' who is not part of task '{task}'")]
    UnknownAnnotator {
        task: TaskId,
        annotator: AnnotatorId,
        context: String,
    },

    #[error("Assignment record belongs to task '{found}', expected '{expected}'")]
    TaskMismatch { expected: TaskId, found: TaskId },

    #[error("Duplicate {kind} id '{id}' in task '{task}'")]
    Duplicate {
        task: TaskId,
        kind: &'static str,
        id: String,
    },
}
