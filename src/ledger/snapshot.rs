//! In-memory snapshot of a task's assignment ledger.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::IntegrityError;
use crate::model::{AnnotatorId, DocumentId, TaskView};

use super::record::{AssignmentRecord, AssignmentStatus};

/// Read-only access to assignment history.
///
/// Implementors only expose the raw records; the named set queries are
/// derived from them so every ledger answers them the same way.
pub trait Ledger {
    /// All records, in the order they were appended.
    fn records(&self) -> &[AssignmentRecord];

    /// Documents for which `annotator` has a record in one of `statuses`.
    fn documents_with_status(
        &self,
        annotator: &AnnotatorId,
        statuses: &[AssignmentStatus],
    ) -> BTreeSet<DocumentId> {
        self.records()
            .iter()
            .filter(|r| &r.annotator_id == annotator && statuses.contains(&r.status))
            .map(|r| r.document_id.clone())
            .collect()
    }

    /// Documents the annotator has seen or has pending, of any type.
    fn touched_by(&self, annotator: &AnnotatorId) -> BTreeSet<DocumentId> {
        self.documents_with_status(
            annotator,
            &[AssignmentStatus::Assigned, AssignmentStatus::Completed],
        )
    }

    /// Documents the annotator has completed, of any type.
    fn completed_by(&self, annotator: &AnnotatorId) -> BTreeSet<DocumentId> {
        self.documents_with_status(annotator, &[AssignmentStatus::Completed])
    }
}

/// Point-in-time copy of the ledger for one task.
///
/// Serialized as a plain JSON array of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerSnapshot {
    records: Vec<AssignmentRecord>,
}

impl LedgerSnapshot {
    /// Creates a snapshot from existing records.
    pub fn new(records: Vec<AssignmentRecord>) -> Self {
        Self { records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing has ever been assigned.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over records in ledger order.
    pub fn iter(&self) -> impl Iterator<Item = &AssignmentRecord> {
        self.records.iter()
    }

    /// Appends new records at the end. Existing records are never touched.
    pub fn append(&mut self, records: impl IntoIterator<Item = AssignmentRecord>) {
        self.records.extend(records);
    }

    /// Checks every record against the task's documents and roster.
    ///
    /// # Errors
    ///
    /// Returns the first record that belongs to another task or references
    /// a document, annotator or reviewee outside the task.
    pub fn validate_against(&self, task: &impl TaskView) -> Result<(), IntegrityError> {
        let documents = task.document_ids();
        let annotators: HashSet<&AnnotatorId> = task.annotators().iter().map(|a| &a.id).collect();

        for record in &self.records {
            if &record.task_id != task.task_id() {
                return Err(IntegrityError::TaskMismatch {
                    expected: task.task_id().clone(),
                    found: record.task_id.clone(),
                });
            }

            let context = format!("Assignment '{}'", record.id);
            if !documents.contains(&record.document_id) {
                return Err(IntegrityError::UnknownDocument {
                    task: task.task_id().clone(),
                    document: record.document_id.clone(),
                    context,
                });
            }

            let people = std::iter::once(&record.annotator_id).chain(record.reviewee_id.as_ref());
            for annotator in people {
                if !annotators.contains(annotator) {
                    return Err(IntegrityError::UnknownAnnotator {
                        task: task.task_id().clone(),
                        annotator: annotator.clone(),
                        context,
                    });
                }
            }
        }

        Ok(())
    }
}

impl Ledger for LedgerSnapshot {
    fn records(&self) -> &[AssignmentRecord] {
        &self.records
    }
}

impl FromIterator<AssignmentRecord> for LedgerSnapshot {
    fn from_iter<I: IntoIterator<Item = AssignmentRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
