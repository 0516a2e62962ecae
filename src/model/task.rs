//! Annotation tasks and the read-only view the scheduler consumes.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::IntegrityError;

use super::annotation::{Annotation, Annotator, Document};
use super::ids::{AnnotatorId, DocumentId, TaskId};

/// Read-only view of a task's universe.
///
/// This is everything the scheduler needs from the task side: who may work
/// on it, which documents are in scope, and which annotations exist.
pub trait TaskView {
    /// Identifier of the task.
    fn task_id(&self) -> &TaskId;

    /// Annotators allowed to work on the task, in roster order.
    fn annotators(&self) -> &[Annotator];

    /// Documents in scope, in corpus order.
    fn documents(&self) -> &[Document];

    /// Annotations already submitted against the task.
    fn annotations(&self) -> &[Annotation];

    /// Returns true if the annotator belongs to the task's roster.
    fn has_annotator(&self, id: &AnnotatorId) -> bool {
        self.annotators().iter().any(|a| &a.id == id)
    }

    /// Returns the set of document ids in scope.
    fn document_ids(&self) -> BTreeSet<DocumentId> {
        self.documents().iter().map(|d| d.id.clone()).collect()
    }
}

/// A unit of annotation work with its own documents, roster and history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier of the task.
    pub id: TaskId,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Annotators allowed to work on the task.
    #[serde(default)]
    pub annotators: Vec<Annotator>,
    /// Documents in scope.
    #[serde(default)]
    pub documents: Vec<Document>,
    /// Annotations submitted so far.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl Task {
    /// Creates an empty task.
    pub fn new(id: impl Into<TaskId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the annotator roster.
    pub fn with_annotators(mut self, annotators: Vec<Annotator>) -> Self {
        self.annotators = annotators;
        self
    }

    /// Sets the documents in scope.
    pub fn with_documents(mut self, documents: Vec<Document>) -> Self {
        self.documents = documents;
        self
    }

    /// Sets the submitted annotations.
    pub fn with_annotations(mut self, annotations: Vec<Annotation>) -> Self {
        self.annotations = annotations;
        self
    }

    /// Looks up a document by id.
    pub fn document(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| &d.id == id)
    }

    /// Checks that rosters are free of duplicates and that every annotation
    /// references a document and an annotator of this task.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), IntegrityError> {
        let mut annotators = HashSet::new();
        for annotator in &self.annotators {
            if !annotators.insert(&annotator.id) {
                return Err(IntegrityError::Duplicate {
                    task: self.id.clone(),
                    kind: "annotator",
                    id: annotator.id.to_string(),
                });
            }
        }

        let mut documents = HashSet::new();
        for document in &self.documents {
            if !documents.insert(&document.id) {
                return Err(IntegrityError::Duplicate {
                    task: self.id.clone(),
                    kind: "document",
                    id: document.id.to_string(),
                });
            }
        }

        for annotation in &self.annotations {
            let context = format!("Annotation '{}'", annotation.id);
            if !documents.contains(&annotation.document_id) {
                return Err(IntegrityError::UnknownDocument {
                    task: self.id.clone(),
                    document: annotation.document_id.clone(),
                    context,
                });
            }
            if !annotators.contains(&annotation.annotator_id) {
                return Err(IntegrityError::UnknownAnnotator {
                    task: self.id.clone(),
                    annotator: annotation.annotator_id.clone(),
                    context,
                });
            }
        }

        Ok(())
    }
}

impl TaskView for Task {
    fn task_id(&self) -> &TaskId {
        &self.id
    }

    fn annotators(&self) -> &[Annotator] {
        &self.annotators
    }

    fn documents(&self) -> &[Document] {
        &self.documents
    }

    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_task() -> Task {
        Task::new("t1", "sentiment")
            .with_annotators(vec![Annotator::new("u1", "Ada"), Annotator::new("u2", "Lin")])
            .with_documents(vec![Document::new("d1", "good"), Document::new("d2", "bad")])
    }

    #[test]
    fn test_task_view_accessors() {
        let task = create_test_task();
        assert_eq!(task.task_id(), &TaskId::from("t1"));
        assert!(task.has_annotator(&AnnotatorId::from("u2")));
        assert!(!task.has_annotator(&AnnotatorId::from("u3")));
        assert_eq!(task.document_ids().len(), 2);
        assert!(task.document(&DocumentId::from("d2")).is_some());
    }

    #[test]
    fn test_validate_accepts_consistent_task() {
        let task = create_test_task().with_annotations(vec![Annotation::new(
            "a1",
            "d1",
            "u1",
            serde_json::Value::Null,
        )]);
        assert!(task.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_foreign_document() {
        let task = create_test_task().with_annotations(vec![Annotation::new(
            "a1",
            "d9",
            "u1",
            serde_json::Value::Null,
        )]);
        let err = task.validate().expect_err("foreign document must be rejected");
        assert!(matches!(err, IntegrityError::UnknownDocument { .. }));
    }

    #[test]
    fn test_validate_rejects_foreign_annotator() {
        let task = create_test_task().with_annotations(vec![Annotation::new(
            "a1",
            "d1",
            "u9",
            serde_json::Value::Null,
        )]);
        let err = task.validate().expect_err("foreign annotator must be rejected");
        assert!(matches!(err, IntegrityError::UnknownAnnotator { .. }));
    }

    #[test]
    fn test_validate_rejects_duplicate_documents() {
        let mut task = create_test_task();
        task.documents.push(Document::new("d1", "again"));
        let err = task.validate().expect_err("duplicate document must be rejected");
        assert!(matches!(err, IntegrityError::Duplicate { kind: "document", .. }));
    }
}
