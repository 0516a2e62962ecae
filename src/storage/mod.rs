//! Loading and recording task snapshots.
//!
//! The scheduler never talks to the hub directly. A [`TaskSource`] hands it
//! a [`Task`](crate::model::Task) and a
//! [`LedgerSnapshot`](crate::ledger::LedgerSnapshot); recording the resulting
//! assignments is the caller's job.
//!
//! # Usage
//!
//! ```rust,ignore
//! use labelforge::storage::{FileTaskSource, TaskSource};
//!
//! let source = FileTaskSource::new("task.json", "ledger.json");
//! let task = source.load_task().await?;
//! let ledger = source.load_ledger().await?;
//! ```

pub mod source;

pub use source::{FileTaskSource, StorageError, TaskSource};
