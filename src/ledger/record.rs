//! Assignment records: one allocated unit of labeling or review work.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{AnnotatorId, DocumentId, TaskId};

/// Progress of an assignment.
///
/// Serialized with the hub's single-letter codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignmentStatus {
    #[serde(rename = "A", alias = "assigned")]
    Assigned,
    #[serde(rename = "C", alias = "completed")]
    Completed,
}

impl AssignmentStatus {
    /// Wire code used by the hub.
    pub fn code(&self) -> &'static str {
        match self {
            AssignmentStatus::Assigned => "A",
            AssignmentStatus::Completed => "C",
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssignmentStatus::Assigned => "assigned",
            AssignmentStatus::Completed => "completed",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for AssignmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "a" | "assigned" => Ok(AssignmentStatus::Assigned),
            "c" | "completed" => Ok(AssignmentStatus::Completed),
            other => Err(format!("unknown assignment status '{}'", other)),
        }
    }
}

/// Kind of work an assignment represents.
///
/// The hub encodes labeling as `"A"` (annotate) and review as `"R"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignmentType {
    #[serde(rename = "A", alias = "label")]
    Label,
    #[serde(rename = "R", alias = "review")]
    Review,
}

impl AssignmentType {
    /// Wire code used by the hub.
    pub fn code(&self) -> &'static str {
        match self {
            AssignmentType::Label => "A",
            AssignmentType::Review => "R",
        }
    }
}

impl fmt::Display for AssignmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssignmentType::Label => "label",
            AssignmentType::Review => "review",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for AssignmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "a" | "label" => Ok(AssignmentType::Label),
            "r" | "review" => Ok(AssignmentType::Review),
            other => Err(format!("unknown assignment type '{}'", other)),
        }
    }
}

/// One entry of the assignment ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    /// Identifier of this ledger entry.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Document that was allocated.
    pub document_id: DocumentId,
    /// Annotator the document was allocated to.
    pub annotator_id: AnnotatorId,
    /// Task the allocation belongs to.
    pub task_id: TaskId,
    /// Current status.
    pub status: AssignmentStatus,
    /// Labeling or review.
    #[serde(rename = "type")]
    pub kind: AssignmentType,
    /// For reviews, the annotator whose work is audited.
    #[serde(default)]
    pub reviewee_id: Option<AnnotatorId>,
    /// When the record was written.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl AssignmentRecord {
    /// Creates an ASSIGNED labeling intent.
    pub fn label(
        task_id: impl Into<TaskId>,
        document_id: impl Into<DocumentId>,
        annotator_id: impl Into<AnnotatorId>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id: document_id.into(),
            annotator_id: annotator_id.into(),
            task_id: task_id.into(),
            status: AssignmentStatus::Assigned,
            kind: AssignmentType::Label,
            reviewee_id: None,
            created_at: Utc::now(),
        }
    }

    /// Creates an ASSIGNED review intent of `reviewee_id`'s work.
    pub fn review(
        task_id: impl Into<TaskId>,
        document_id: impl Into<DocumentId>,
        reviewer_id: impl Into<AnnotatorId>,
        reviewee_id: impl Into<AnnotatorId>,
    ) -> Self {
        Self {
            kind: AssignmentType::Review,
            reviewee_id: Some(reviewee_id.into()),
            ..Self::label(task_id, document_id, reviewer_id)
        }
    }

    /// Returns the COMPLETED successor of this record.
    ///
    /// The ledger is append-only, so completion is a new entry rather than
    /// an update of the existing one.
    pub fn complete(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            status: AssignmentStatus::Completed,
            created_at: Utc::now(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_uses_wire_codes() {
        let json = serde_json::to_string(&AssignmentStatus::Completed)
            .expect("serialization should succeed");
        assert_eq!(json, "\"C\"");

        let status: AssignmentStatus =
            serde_json::from_str("\"assigned\"").expect("alias should deserialize");
        assert_eq!(status, AssignmentStatus::Assigned);
    }

    #[test]
    fn test_type_codes_match_hub() {
        assert_eq!(AssignmentType::Label.code(), "A");
        assert_eq!(AssignmentType::Review.code(), "R");
        assert_eq!("R".parse::<AssignmentType>(), Ok(AssignmentType::Review));
        assert!("x".parse::<AssignmentType>().is_err());
    }

    #[test]
    fn test_review_intent_carries_reviewee() {
        let record = AssignmentRecord::review("t1", "d1", "reviewer", "reviewee");
        assert_eq!(record.status, AssignmentStatus::Assigned);
        assert_eq!(record.kind, AssignmentType::Review);
        assert_eq!(record.reviewee_id, Some(AnnotatorId::from("reviewee")));
        assert_eq!(record.annotator_id, AnnotatorId::from("reviewer"));
    }

    #[test]
    fn test_complete_appends_new_record() {
        let assigned = AssignmentRecord::label("t1", "d1", "u1");
        let completed = assigned.complete();
        assert_ne!(completed.id, assigned.id);
        assert_eq!(completed.status, AssignmentStatus::Completed);
        assert_eq!(completed.document_id, assigned.document_id);
        assert_eq!(assigned.status, AssignmentStatus::Assigned);
    }

    #[test]
    fn test_record_json_uses_type_field() {
        let json = r#"{
            "document_id": "d1",
            "annotator_id": "u1",
            "task_id": "t1",
            "status": "C",
            "type": "A"
        }"#;
        let record: AssignmentRecord = serde_json::from_str(json).expect("valid record");
        assert_eq!(record.kind, AssignmentType::Label);
        assert_eq!(record.status, AssignmentStatus::Completed);
        assert!(record.reviewee_id.is_none());
    }
}
