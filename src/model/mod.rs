//! Task-side data model: identifiers, rosters, documents and annotations.
//!
//! These types are supplied by the annotation hub; the scheduler only reads
//! them through [`TaskView`].

pub mod annotation;
pub mod ids;
pub mod task;

pub use annotation::{Annotation, Annotator, Document};
pub use ids::{AnnotatorId, DocumentId, TaskId};
pub use task::{Task, TaskView};
