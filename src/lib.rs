//! labelforge: assignment and review scheduling for document annotation.
//!
//! A pool of annotators labels or reviews the documents of a task. Given the
//! task and a snapshot of its assignment ledger, the scheduler decides which
//! documents each annotator should see next, never handing the same document
//! to someone twice and failing loudly when the eligible pool is too small.

// Core modules
pub mod cli;
pub mod config;
pub mod error;
pub mod ledger;
pub mod model;
pub mod scheduler;
pub mod storage;

// Re-export commonly used types
pub use config::{ConfigError, SchedulerConfig};
pub use error::{IntegrityError, SchedulerError};
pub use ledger::{AssignmentRecord, AssignmentStatus, AssignmentType, Ledger, LedgerSnapshot};
pub use model::{Annotation, Annotator, AnnotatorId, Document, DocumentId, Task, TaskId, TaskView};
pub use scheduler::{PoolSampler, PoolSummary, Scheduler, UniformSampler};
pub use storage::{FileTaskSource, StorageError, TaskSource};
