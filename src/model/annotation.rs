//! Annotators, documents and the annotations they produce.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{AnnotatorId, DocumentId};

/// A person or model allowed to work on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotator {
    /// Unique identifier on the hub.
    pub id: AnnotatorId,
    /// Display name.
    pub name: String,
}

impl Annotator {
    /// Creates a new annotator.
    pub fn new(id: impl Into<AnnotatorId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A document from the task's corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier of the document.
    pub id: DocumentId,
    /// Raw textual content.
    #[serde(default)]
    pub content: String,
}

impl Document {
    /// Creates a new document.
    pub fn new(id: impl Into<DocumentId>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }
}

/// A labeling output attached to a document by one annotator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Unique identifier of the annotation.
    pub id: String,
    /// Document the annotation belongs to.
    pub document_id: DocumentId,
    /// Annotator who produced it.
    pub annotator_id: AnnotatorId,
    /// Free-form label payload.
    #[serde(default)]
    pub body: serde_json::Value,
    /// When the annotation was submitted.
    pub created_at: DateTime<Utc>,
    /// Start character offset for span-level annotations.
    #[serde(default)]
    pub start: Option<usize>,
    /// End character offset (exclusive) for span-level annotations.
    #[serde(default)]
    pub end: Option<usize>,
}

impl Annotation {
    /// Creates a document-level annotation stamped with the current time.
    pub fn new(
        id: impl Into<String>,
        document_id: impl Into<DocumentId>,
        annotator_id: impl Into<AnnotatorId>,
        body: serde_json::Value,
    ) -> Self {
        Self {
            id: id.into(),
            document_id: document_id.into(),
            annotator_id: annotator_id.into(),
            body,
            created_at: Utc::now(),
            start: None,
            end: None,
        }
    }

    /// Restricts the annotation to the `[start, end)` character range.
    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Returns true when both span offsets are set.
    pub fn is_span(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Returns the text covered by the span, if the offsets fit the document.
    pub fn span_text(&self, document: &Document) -> Option<String> {
        let (start, end) = (self.start?, self.end?);
        if start > end || end > document.content.chars().count() {
            return None;
        }
        Some(
            document
                .content
                .chars()
                .skip(start)
                .take(end - start)
                .collect(),
        )
    }
}
