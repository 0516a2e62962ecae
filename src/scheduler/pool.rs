//! Eligibility pools as explicit set algebra.
//!
//! Each exclusion rule is a separate function so it can be checked in
//! isolation. Pools are ordered sets; their iteration order feeds the
//! sampler, which keeps seeded draws reproducible.

use std::collections::BTreeSet;

use crate::ledger::Ledger;
use crate::model::{AnnotatorId, DocumentId, TaskView};

/// Documents the reviewee completed that the reviewer has never touched.
///
/// `reviewee_completed - reviewer_touched`, where "touched" covers both
/// pending and completed work of any type.
pub fn review_pool(
    ledger: &impl Ledger,
    reviewer: &AnnotatorId,
    reviewee: &AnnotatorId,
) -> BTreeSet<DocumentId> {
    let reviewer_touched = ledger.touched_by(reviewer);
    let reviewee_completed = ledger.completed_by(reviewee);
    reviewee_completed
        .difference(&reviewer_touched)
        .cloned()
        .collect()
}

/// Documents with at least one submitted annotation in the task, by anyone.
pub fn annotated_documents(task: &impl TaskView) -> BTreeSet<DocumentId> {
    task.annotations()
        .iter()
        .map(|a| a.document_id.clone())
        .collect()
}

/// Task documents without any annotation yet.
pub fn fresh_documents(task: &impl TaskView) -> BTreeSet<DocumentId> {
    let annotated = annotated_documents(task);
    task.document_ids()
        .into_iter()
        .filter(|d| !annotated.contains(d))
        .collect()
}

/// Fresh documents the assignee has not already been given.
pub fn labeling_pool(
    task: &impl TaskView,
    ledger: &impl Ledger,
    assignee: &AnnotatorId,
) -> BTreeSet<DocumentId> {
    let assignee_touched = ledger.touched_by(assignee);
    fresh_documents(task)
        .difference(&assignee_touched)
        .cloned()
        .collect()
}
